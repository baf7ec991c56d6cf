//! Async execution of built requests.
//!
//! # Design
//! `Transport` is the only seam that does I/O. `Client` pairs a
//! `RecordClient` with a transport and exposes one async method per remote
//! operation: build the request, execute it exactly once, normalize the
//! outcome. There are no retries and no state shared between calls, so one
//! `Client` can serve any number of concurrent tasks.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::RecordClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Action, DisplayOptions, InsertPayload, Record, RecordRef};

/// Executes one `HttpRequest`. Non-200 statuses are returned as data.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by `reqwest`. Connection pooling and TLS are reqwest's.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async client for one instance.
///
/// Every method resolves to either the parsed response body or an
/// `ApiError`, never both.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    config: ClientConfig,
    inner: RecordClient,
    transport: T,
}

impl Client<ReqwestTransport> {
    /// Client using the bundled reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let inner = RecordClient::new(&config);
        Self {
            config,
            inner,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get_keys(&self, table: &str, query: &str) -> Result<Value, ApiError> {
        let request = self.inner.build_get_keys(table, query);
        self.send(Action::GetKeys, table, request).await
    }

    pub async fn get(&self, table: &str, id: &str, opts: DisplayOptions) -> Result<Value, ApiError> {
        let request = self.inner.build_get(table, id, opts);
        self.send(Action::Get, table, request).await
    }

    pub async fn get_records(
        &self,
        table: &str,
        query: &str,
        opts: DisplayOptions,
    ) -> Result<Value, ApiError> {
        let request = self.inner.build_get_records(table, query, opts);
        self.send(Action::GetRecords, table, request).await
    }

    pub async fn update(&self, table: &str, query: &str, fields: &Record) -> Result<Value, ApiError> {
        let request = self.inner.build_update(table, query, fields)?;
        self.send(Action::Update, table, request).await
    }

    pub async fn insert(
        &self,
        table: &str,
        payload: impl Into<InsertPayload>,
    ) -> Result<Value, ApiError> {
        let request = self.inner.build_insert(table, &payload.into())?;
        self.send(Action::Insert, table, request).await
    }

    pub async fn delete_record(
        &self,
        table: &str,
        target: impl Into<RecordRef>,
    ) -> Result<Value, ApiError> {
        let request = self.inner.build_delete_record(table, &target.into())?;
        self.send(Action::DeleteRecord, table, request).await
    }

    pub async fn delete_multiple(&self, table: &str, query: &str) -> Result<Value, ApiError> {
        let request = self.inner.build_delete_multiple(table, query);
        self.send(Action::DeleteMultiple, table, request).await
    }

    async fn send(
        &self,
        action: Action,
        table: &str,
        request: HttpRequest,
    ) -> Result<Value, ApiError> {
        tracing::debug!(
            %action,
            table,
            method = request.method.as_str(),
            "issuing request"
        );
        let outcome = self.transport.execute(request).await;
        self.inner.parse_response(outcome)
    }
}
