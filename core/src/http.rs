//! HTTP requests and responses as plain data.
//!
//! # Design
//! `RecordClient` builds `HttpRequest` values and normalizes `HttpResponse`
//! values without touching the network. Whoever executes the request (the
//! bundled `ReqwestTransport`, or any host transport) only has to move bytes.
//!
//! `RequestDefaults` is the per-client transport configuration: the Basic
//! credential and the JSON content type are computed once at construction and
//! stamped onto every request, so the credential goes out pre-emptively
//! instead of waiting for a 401 challenge.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::ClientConfig;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP method for a request. The legacy endpoint only speaks GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Headers attached to every request issued by one client.
#[derive(Clone)]
pub struct RequestDefaults {
    headers: Vec<(String, String)>,
}

impl RequestDefaults {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            headers: vec![
                (
                    "authorization".to_string(),
                    basic_auth(&config.username, &config.password),
                ),
                ("content-type".to_string(), CONTENT_TYPE_JSON.to_string()),
            ],
        }
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}

impl std::fmt::Debug for RequestDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestDefaults").field("headers", &names).finish()
    }
}

/// `Basic base64(username:password)`.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
