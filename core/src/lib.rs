//! Typed HTTP API client pipelines.
//!
//! # Overview
//! An API call is a chain of stages: request policies turn a typed request
//! into one a transport can send, the transport performs the exchange, and
//! a result handler turns the response into a typed value. Stages are plain
//! functions returning `SdkResult`, composed with [`pipe`] and
//! [`pipe_async`]; the first failing stage ends the call.
//!
//! # Design
//! - The core never touches the network. The transport is injected as an
//!   [`HttpClient`] and deals only in [`UnstructuredData`].
//! - Serialization is injected too: [`Marshaller`] and [`Unmarshaller`] are
//!   implemented for closures, with `serde_json` implementations provided
//!   for JSON.
//! - Value objects are immutable from a stage's point of view. Each stage
//!   takes ownership and returns a new value.
//! - Non-2xx responses are results, not errors. Use
//!   [`is_successful_result`] to branch on them.

pub mod accessors;
pub mod client;
pub mod error;
pub mod headers;
pub mod http;
pub mod marshal;
pub mod pipe;
pub mod predicates;
pub mod request;
pub mod result;
pub mod unmarshal;

pub use accessors::{extract_http_body, get_header, get_http_body, get_http_response, parse_int_header};
pub use client::{
    header_factory, http_client, token_supplier, HttpClient, RequestHeaderFactory,
    RequestHeadersFactory, TokenSupplier,
};
pub use error::{ErrorKind, SdkError, SdkResult};
pub use headers::{bearer_token, bearer_token_as, constant_headers, create_headers};
pub use http::{
    HttpHeaders, HttpParams, HttpRequest, HttpRequestMethod, HttpRequestUrl, HttpResponse,
    HttpResult, UnstructuredData,
};
pub use marshal::{json_marshaller, marshaller_for, JsonMarshaller, Marshaller, JSON_MIME_TYPE};
pub use pipe::{pipe, pipe_async};
pub use predicates::{has_content_type, is_successful_response, is_successful_result};
pub use request::{add_headers, build_url, create_query_string, replace_path_params, resolve_url};
pub use result::ResultExt;
pub use unmarshal::{
    json_unmarshaller, unmarshaller, unmarshaller_for, JsonUnmarshaller, Negotiated,
    ResponseUnmarshaller, Unmarshaller,
};
