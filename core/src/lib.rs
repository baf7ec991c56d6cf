//! Client for the legacy JSONv2 record web service.
//!
//! # Overview
//! Every remote operation is a single HTTP call against
//! `<instance>/<table>.do?JSONv2=&sysparm_action=...`, authenticated with
//! HTTP Basic credentials sent up front. Responses come back in several
//! shapes (raw error bodies, a top-level `error` field, per-record
//! `__error` markers); all of them are folded into one `Result`.
//!
//! # Design
//! - `RecordClient` builds `HttpRequest` values and normalizes
//!   `HttpResponse` values without touching the network (host-does-IO).
//! - `Client` pairs it with a `Transport` (reqwest by default) and exposes
//!   one async method per operation.
//! - Records are opaque `serde_json` maps with insertion order preserved, so
//!   a record sent to `insert` is serialized exactly as given.
//!
//! ```no_run
//! use jsonv2_core::{Client, ClientConfig, DisplayOptions};
//!
//! # async fn run() -> Result<(), jsonv2_core::ApiError> {
//! let client = Client::new(ClientConfig::new("https://dev.example.com", "admin", "secret"))?;
//! let open = client
//!     .get_records("incident", "active=true", DisplayOptions::default())
//!     .await?;
//! println!("{open}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod query;
pub mod transport;
pub mod types;

pub use client::RecordClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDefaults};
pub use normalize::normalize;
pub use transport::{Client, ReqwestTransport, Transport};
pub use types::{Action, DisplayOptions, InsertPayload, Record, RecordRef};
