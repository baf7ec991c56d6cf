//! Classifies the outcome of one HTTP exchange into `Result<Value, ApiError>`.

use serde_json::Value;

use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;

/// Field carrying a service-level failure on an otherwise successful response.
pub const ERROR_FIELD: &str = "error";
/// Collection of records in batch responses.
pub const RECORDS_FIELD: &str = "records";
/// Per-record failure marker inside `records`.
pub const RECORD_ERROR_FIELD: &str = "__error";

/// Turn a transport outcome into the caller-facing result.
///
/// Checks run in order and the first hit wins; on any error the parsed body
/// is withheld, even when part of a batch succeeded.
///
/// The `error` field and each record's `__error` marker only count when
/// they are set: `null`, `false`, `0` and `""` are treated as absent, the
/// same way the service's own clients test them.
pub fn normalize(outcome: Result<HttpResponse, TransportError>) -> Result<Value, ApiError> {
    let response = outcome?;

    if response.status != 200 {
        tracing::warn!(status = response.status, "non-200 response");
        return Err(ApiError::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }

    let body: Value =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))?;

    if let Some(error) = body.get(ERROR_FIELD).filter(|e| is_set(e)) {
        tracing::warn!(%error, "service reported an error");
        return Err(ApiError::Service(error.clone()));
    }

    let record_errors = collect_record_errors(&body);
    if !record_errors.is_empty() {
        tracing::warn!(count = record_errors.len(), "batch contains failed records");
        return Err(ApiError::RecordErrors(record_errors));
    }

    Ok(body)
}

/// The `__error` marker of each failed record, in record order.
fn collect_record_errors(body: &Value) -> Vec<Value> {
    let Some(records) = body.get(RECORDS_FIELD).and_then(Value::as_array) else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| record.get(RECORD_ERROR_FIELD))
        .filter(|marker| is_set(marker))
        .cloned()
        .collect()
}

/// `false` for `null`, `false`, zero and the empty string.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
