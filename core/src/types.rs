//! Domain values passed to `RecordClient`.
//!
//! # Design
//! Records stay opaque: a field-name-to-value map in the order the caller or
//! the service wrote it. The two call sites that accept "one thing or
//! another" (`deleteRecord` and `insert`) take explicit enums instead of
//! inspecting the value at runtime.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the service's unique record identifier field.
pub const SYS_ID: &str = "sys_id";

/// A single record as the service represents it.
pub type Record = Map<String, Value>;

/// Remote operation named in `sysparm_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetKeys,
    Get,
    GetRecords,
    Update,
    Insert,
    DeleteRecord,
    DeleteMultiple,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetKeys => "getKeys",
            Action::Get => "get",
            Action::GetRecords => "getRecords",
            Action::Update => "update",
            Action::Insert => "insert",
            Action::DeleteRecord => "deleteRecord",
            Action::DeleteMultiple => "deleteMultiple",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags for `get` and `getRecords`. Both default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Resolve reference fields to their display text.
    pub display_value: bool,
    /// Include variable sub-records.
    pub display_variables: bool,
}

impl DisplayOptions {
    pub fn new(display_value: bool, display_variables: bool) -> Self {
        Self {
            display_value,
            display_variables,
        }
    }
}

/// Target of `deleteRecord`: a bare identifier or a record holding one.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRef {
    Identifier(String),
    Record(Record),
}

impl RecordRef {
    /// The identifier to send as `sysparm_sys_id`.
    ///
    /// A record without a string `sys_id` resolves to `null`; the service
    /// answers that with its own error.
    pub fn resolve(&self) -> Value {
        match self {
            RecordRef::Identifier(id) => Value::String(id.clone()),
            RecordRef::Record(record) => match record.get(SYS_ID) {
                Some(Value::String(id)) => Value::String(id.clone()),
                _ => Value::Null,
            },
        }
    }
}

impl From<&str> for RecordRef {
    fn from(id: &str) -> Self {
        RecordRef::Identifier(id.to_string())
    }
}

impl From<String> for RecordRef {
    fn from(id: String) -> Self {
        RecordRef::Identifier(id)
    }
}

impl From<Record> for RecordRef {
    fn from(record: Record) -> Self {
        RecordRef::Record(record)
    }
}

/// Body of an `insert`: one record, or several behind the `records` wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertPayload {
    Single(Record),
    Batch(Vec<Record>),
}

impl Serialize for InsertPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InsertPayload::Single(record) => record.serialize(serializer),
            InsertPayload::Batch(records) => {
                #[derive(Serialize)]
                struct Wrapper<'a> {
                    records: &'a [Record],
                }
                Wrapper { records }.serialize(serializer)
            }
        }
    }
}

impl From<Record> for InsertPayload {
    fn from(record: Record) -> Self {
        InsertPayload::Single(record)
    }
}

impl From<Vec<Record>> for InsertPayload {
    fn from(records: Vec<Record>) -> Self {
        InsertPayload::Batch(records)
    }
}
