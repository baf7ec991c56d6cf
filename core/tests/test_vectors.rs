//! Verify request building and response normalization against the JSON
//! vectors in `test-vectors/`.
//!
//! Request bodies are compared as raw strings: field order on the wire is
//! part of the contract.

use jsonv2_core::{
    ApiError, ClientConfig, DisplayOptions, HttpMethod, HttpRequest, HttpResponse,
    InsertPayload, Record, RecordClient, RecordRef, TransportError,
};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn as_record(value: &Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn flag(case: &Value, key: &str) -> bool {
    case.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn build(client: &RecordClient, case: &Value) -> HttpRequest {
    let table = case["table"].as_str().unwrap();
    let query = case.get("query").and_then(Value::as_str).unwrap_or("");
    let opts = DisplayOptions::new(flag(case, "display_value"), flag(case, "display_variables"));

    match case["operation"].as_str().unwrap() {
        "getKeys" => client.build_get_keys(table, query),
        "get" => client.build_get(table, case["id"].as_str().unwrap(), opts),
        "getRecords" => client.build_get_records(table, query, opts),
        "update" => client
            .build_update(table, query, &as_record(&case["fields"]))
            .unwrap(),
        "insert" => {
            let payload = match case.get("records") {
                Some(batch) => InsertPayload::Batch(
                    batch.as_array().unwrap().iter().map(as_record).collect(),
                ),
                None => InsertPayload::Single(as_record(&case["record"])),
            };
            client.build_insert(table, &payload).unwrap()
        }
        "deleteRecord" => {
            let target = match case.get("id") {
                Some(id) => RecordRef::from(id.as_str().unwrap()),
                None => RecordRef::from(as_record(&case["record"])),
            };
            client.build_delete_record(table, &target).unwrap()
        }
        "deleteMultiple" => client.build_delete_multiple(table, query),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let instance = vectors["instance"].as_str().unwrap();
    let client = RecordClient::new(&ClientConfig::new(
        instance,
        vectors["username"].as_str().unwrap(),
        vectors["password"].as_str().unwrap(),
    ));
    let expected_headers: Vec<(String, String)> = vectors["expected_headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];

        let req = build(&client, case);
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{instance}{}", expected["url"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(req.body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = RecordClient::new(&ClientConfig::new("https://dev.example.com", "a", "b"));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let outcome = match case.get("transport_error") {
            Some(message) => Err(TransportError::new(message.as_str().unwrap())),
            None => {
                let sim = &case["simulated_response"];
                Ok(HttpResponse {
                    status: sim["status"].as_u64().unwrap() as u16,
                    headers: Vec::new(),
                    body: sim["body"].as_str().unwrap().to_string(),
                })
            }
        };
        let result = client.parse_response(outcome);

        let Some(expected_error) = case.get("expected_error") else {
            let body = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            assert_eq!(body, case["expected_result"], "{name}: parsed result");
            continue;
        };

        let err = match result {
            Ok(body) => panic!("{name}: expected error, got {body}"),
            Err(err) => err,
        };
        let payload = &case["expected_payload"];
        match (expected_error.as_str().unwrap(), err) {
            ("Transport", ApiError::Transport(e)) => assert_eq!(e.message, payload.as_str().unwrap(), "{name}"),
            ("HttpStatus", ApiError::HttpStatus { body, .. }) => {
                assert_eq!(body, payload.as_str().unwrap(), "{name}")
            }
            ("Parse", ApiError::Parse(_)) => {}
            ("Service", ApiError::Service(value)) => assert_eq!(&value, payload, "{name}"),
            ("RecordErrors", ApiError::RecordErrors(markers)) => {
                assert_eq!(&Value::Array(markers), payload, "{name}")
            }
            (expected, other) => panic!("{name}: expected {expected}, got {other:?}"),
        }
    }
}
