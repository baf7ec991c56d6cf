//! Stateless request builder and response normalizer for the JSONv2 endpoint.
//!
//! # Design
//! `RecordClient` holds the base URL and the per-client `RequestDefaults`,
//! and nothing that changes between calls. Each remote operation has a
//! `build_*` method producing an `HttpRequest`; every response goes through
//! the same `parse_response`. The caller executes the round-trip in between,
//! which keeps this layer deterministic and free of I/O.

use serde::Serialize;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestDefaults};
use crate::normalize::normalize;
use crate::query::{endpoint_url, QueryParams};
use crate::types::{Action, DisplayOptions, InsertPayload, Record, RecordRef};

/// Synchronous, stateless client for one instance.
#[derive(Debug, Clone)]
pub struct RecordClient {
    base_url: String,
    defaults: RequestDefaults,
}

impl RecordClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            defaults: RequestDefaults::from_config(config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Identifiers of the records matching `query`.
    pub fn build_get_keys(&self, table: &str, query: &str) -> HttpRequest {
        let params = QueryParams::new(Action::GetKeys).query(query);
        self.read(table, &params)
    }

    /// One record by identifier.
    pub fn build_get(&self, table: &str, id: &str, opts: DisplayOptions) -> HttpRequest {
        let params = QueryParams::new(Action::Get).sys_id(id).display(opts);
        self.read(table, &params)
    }

    /// Every record matching `query`.
    pub fn build_get_records(&self, table: &str, query: &str, opts: DisplayOptions) -> HttpRequest {
        let params = QueryParams::new(Action::GetRecords)
            .query(query)
            .display(opts);
        self.read(table, &params)
    }

    /// Apply `fields` to every record matching `query`.
    pub fn build_update(
        &self,
        table: &str,
        query: &str,
        fields: &Record,
    ) -> Result<HttpRequest, ApiError> {
        let params = QueryParams::new(Action::Update).query(query);
        self.write(table, &params, fields)
    }

    /// Create one record, or several when given a batch.
    pub fn build_insert(&self, table: &str, payload: &InsertPayload) -> Result<HttpRequest, ApiError> {
        let params = QueryParams::new(Action::Insert);
        self.write(table, &params, payload)
    }

    /// Delete one record. The body is always `{"sysparm_sys_id": <id>}`.
    pub fn build_delete_record(
        &self,
        table: &str,
        target: &RecordRef,
    ) -> Result<HttpRequest, ApiError> {
        let params = QueryParams::new(Action::DeleteRecord);
        let body = json!({ "sysparm_sys_id": target.resolve() });
        self.write(table, &params, &body)
    }

    /// Delete every record matching `query`.
    pub fn build_delete_multiple(&self, table: &str, query: &str) -> HttpRequest {
        let params = QueryParams::new(Action::DeleteMultiple).query(query);
        self.read(table, &params)
    }

    /// Classify the outcome of executing any request built above.
    pub fn parse_response(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<serde_json::Value, ApiError> {
        normalize(outcome)
    }

    fn read(&self, table: &str, params: &QueryParams<'_>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: endpoint_url(&self.base_url, table, params),
            headers: self.defaults.headers(),
            body: None,
        }
    }

    fn write<B: Serialize + ?Sized>(
        &self,
        table: &str,
        params: &QueryParams<'_>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: endpoint_url(&self.base_url, table, params),
            headers: self.defaults.headers(),
            body: Some(body),
        })
    }
}
