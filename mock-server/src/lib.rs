use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";

pub type Record = Map<String, Value>;

pub type Tables = HashMap<String, Vec<Record>>;

pub struct Instance {
    authorization: String,
    tables: RwLock<Tables>,
}

pub type Db = Arc<Instance>;

pub fn app() -> Router {
    app_with_credentials(DEFAULT_USERNAME, DEFAULT_PASSWORD)
}

pub fn app_with_credentials(username: &str, password: &str) -> Router {
    let db: Db = Arc::new(Instance {
        authorization: format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))),
        tables: RwLock::new(HashMap::new()),
    });
    Router::new()
        .route("/{resource}", get(handle).post(handle))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn handle(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == db.authorization);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "User Not Authenticated").into_response();
    }

    let Some(table) = resource.strip_suffix(".do") else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };
    if !params.contains_key("JSONv2") {
        return (StatusCode::BAD_REQUEST, "JSONv2 parameter required").into_response();
    }

    let payload = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    };

    let action = params.get("sysparm_action").map(String::as_str).unwrap_or("");
    tracing::info!(table, action, "request");

    let mut tables = db.tables.write().await;
    Json(dispatch(&mut tables, table, action, &params, payload)).into_response()
}

/// Run one action against the in-memory tables and produce the 200 body.
pub fn dispatch(
    tables: &mut Tables,
    table: &str,
    action: &str,
    params: &HashMap<String, String>,
    payload: Value,
) -> Value {
    let query = params.get("sysparm_query").map(String::as_str).unwrap_or("");
    let filter = match Filter::parse(query) {
        Ok(filter) => filter,
        Err(term) => return service_error("Invalid query", &format!("unsupported term: {term}")),
    };
    let rows = tables.entry(table.to_string()).or_default();

    match action {
        "getKeys" => {
            let ids: Vec<Value> = rows
                .iter()
                .filter(|r| filter.matches(r))
                .filter_map(|r| r.get("sys_id").cloned())
                .collect();
            json!({ "records": ids })
        }
        "get" => {
            let id = params.get("sysparm_sys_id").map(String::as_str).unwrap_or("");
            let found: Vec<&Record> = rows.iter().filter(|r| sys_id(r) == Some(id)).collect();
            json!({ "records": found })
        }
        "getRecords" => {
            let found: Vec<&Record> = rows.iter().filter(|r| filter.matches(r)).collect();
            json!({ "records": found })
        }
        "update" => {
            let Value::Object(fields) = payload else {
                return service_error("Invalid update", "body must be an object");
            };
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|r| filter.matches(r)) {
                for (key, value) in &fields {
                    if key != "sys_id" {
                        row.insert(key.clone(), value.clone());
                    }
                }
                updated.push(Value::Object(row.clone()));
            }
            json!({ "records": updated })
        }
        "insert" => {
            let incoming = match payload {
                Value::Object(mut obj) => match obj.remove("records") {
                    Some(Value::Array(batch)) => batch,
                    Some(other) => {
                        obj.insert("records".to_string(), other);
                        vec![Value::Object(obj)]
                    }
                    None => vec![Value::Object(obj)],
                },
                _ => return service_error("Invalid insert", "body must be an object"),
            };
            let results: Vec<Value> = incoming
                .into_iter()
                .map(|value| insert_one(rows, value))
                .collect();
            json!({ "records": results })
        }
        "deleteRecord" => {
            let id = payload
                .get("sysparm_sys_id")
                .and_then(Value::as_str)
                .unwrap_or("");
            let removed = take_where(rows, |r| sys_id(r) == Some(id));
            json!({ "records": removed })
        }
        "deleteMultiple" => {
            let removed = take_where(rows, |r| filter.matches(r));
            json!({ "records": removed })
        }
        other => service_error("Invalid action", &format!("unknown sysparm_action: {other}")),
    }
}

fn insert_one(rows: &mut Vec<Record>, value: Value) -> Value {
    let Value::Object(mut record) = value else {
        return json!({ "__error": { "message": "Operation Failed", "reason": "record must be an object" } });
    };
    match record.get("sys_id").and_then(Value::as_str) {
        Some(id) if rows.iter().any(|r| sys_id(r) == Some(id)) => {
            let reason = format!("Duplicate sys_id {id}");
            json!({ "__error": { "message": "Operation Failed", "reason": reason } })
        }
        Some(_) => {
            rows.push(record.clone());
            Value::Object(record)
        }
        None => {
            record.insert(
                "sys_id".to_string(),
                Value::String(Uuid::new_v4().simple().to_string()),
            );
            rows.push(record.clone());
            Value::Object(record)
        }
    }
}

fn take_where(rows: &mut Vec<Record>, pred: impl Fn(&Record) -> bool) -> Vec<Record> {
    let (removed, kept): (Vec<Record>, Vec<Record>) =
        std::mem::take(rows).into_iter().partition(|r| pred(r));
    *rows = kept;
    removed
}

fn sys_id(record: &Record) -> Option<&str> {
    record.get("sys_id").and_then(Value::as_str)
}

fn service_error(message: &str, reason: &str) -> Value {
    json!({ "error": { "message": message, "reason": reason } })
}

/// Subset of the encoded query syntax: `field=value` and `field!=value`
/// terms joined by `^`. An empty query matches everything.
#[derive(Debug)]
pub struct Filter {
    terms: Vec<Term>,
}

#[derive(Debug)]
struct Term {
    field: String,
    value: String,
    negated: bool,
}

impl Filter {
    pub fn parse(query: &str) -> Result<Self, String> {
        let mut terms = Vec::new();
        for raw in query.split('^').filter(|t| !t.is_empty()) {
            let term = if let Some((field, value)) = raw.split_once("!=") {
                Term {
                    field: field.to_string(),
                    value: value.to_string(),
                    negated: true,
                }
            } else if let Some((field, value)) = raw.split_once('=') {
                Term {
                    field: field.to_string(),
                    value: value.to_string(),
                    negated: false,
                }
            } else {
                return Err(raw.to_string());
            };
            terms.push(term);
        }
        Ok(Self { terms })
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.terms.iter().all(|term| {
            let actual = match record.get(&term.field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            (actual == term.value) != term.negated
        })
    }
}
