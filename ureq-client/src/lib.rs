//! Blocking `ureq` transport for pipeclient pipelines.
//!
//! # Overview
//! [`ureq_client`] adapts a `ureq::Agent` to the core's `HttpClient`
//! contract. The agent is blocking, so each exchange runs on tokio's
//! blocking pool and the returned future only awaits its completion.
//!
//! # Design
//! - HTTP error statuses are data. The agent is configured with
//!   `http_status_as_error(false)` and a 404 reaches the result handlers
//!   like any other response.
//! - Only failures to complete the exchange (connect, TLS, timeout, body
//!   read) become `http-client-error`.

mod client;
mod config;

pub use client::ureq_client;
pub use config::UreqConfig;
