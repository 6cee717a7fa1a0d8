//! Response unmarshalling with content negotiation.
//!
//! # Design
//! An `Unmarshaller` converts `UnstructuredData` into a typed value for one
//! media type. `unmarshaller_for` wraps it into a `ResponseUnmarshaller`
//! that may decline a response whose `content-type` it does not handle;
//! declining is not an error. `unmarshaller` folds an ordered list of
//! candidates into a result handler: the first candidate that claims the
//! response wins, and a response nobody claims becomes an
//! "unrecognised content type" error naming the header value.
//!
//! Servers behind misconfigured gateways often answer with HTML where JSON
//! was expected; the error makes that visible instead of failing inside a
//! JSON parser.

use std::sync::Arc;

use futures::future::{ready, Ready};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::accessors::get_header;
use crate::error::{SdkError, SdkResult};
use crate::http::{HttpResponse, HttpResult, UnstructuredData};
use crate::marshal::{CONTENT_TYPE_HEADER, JSON_MIME_TYPE};
use crate::predicates::has_content_type;

/// Converts `UnstructuredData` into a value of type `T`.
///
/// Implemented for any `Fn(&UnstructuredData) -> SdkResult<T>`.
pub trait Unmarshaller<T>: Send + Sync {
    fn unmarshall(&self, data: &UnstructuredData) -> SdkResult<T>;
}

impl<T, F> Unmarshaller<T> for F
where
    F: Fn(&UnstructuredData) -> SdkResult<T> + Send + Sync,
{
    fn unmarshall(&self, data: &UnstructuredData) -> SdkResult<T> {
        self(data)
    }
}

/// Unmarshals JSON text into any `DeserializeOwned` type.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonUnmarshaller;

impl<T> Unmarshaller<T> for JsonUnmarshaller
where
    T: DeserializeOwned,
{
    fn unmarshall(&self, data: &UnstructuredData) -> SdkResult<T> {
        match data {
            UnstructuredData::String(json) => serde_json::from_str(json)
                .map_err(|e| SdkError::unmarshalling(e.to_string()).with_cause(e)),
        }
    }
}

/// Outcome of offering a response to one candidate unmarshaller.
#[derive(Debug, Clone, PartialEq)]
pub enum Negotiated<T> {
    /// The candidate does not handle this content type; the response is
    /// returned untouched for the next candidate.
    Unchanged(HttpResponse<UnstructuredData>),

    /// The body was unmarshalled (or there was no body to unmarshall).
    Unmarshalled(HttpResponse<T>),
}

/// A candidate in content negotiation, built by [`unmarshaller_for`].
pub type ResponseUnmarshaller<T> = Arc<
    dyn Fn(HttpResponse<UnstructuredData>) -> SdkResult<Negotiated<T>> + Send + Sync,
>;

/// Wrap `unmarshaller` as a candidate for responses of `content_type`.
///
/// - No body: `Unmarshalled` with the body left absent.
/// - Media type (before any `;` parameter, trimmed) equal to
///   `content_type`: the body is unmarshalled and unmarshaller errors are
///   returned.
/// - Anything else: `Unchanged`.
pub fn unmarshaller_for<T, U>(content_type: &str, unmarshaller: U) -> ResponseUnmarshaller<T>
where
    T: 'static,
    U: Unmarshaller<T> + 'static,
{
    let content_type = content_type.to_string();
    Arc::new(
        move |response: HttpResponse<UnstructuredData>| -> SdkResult<Negotiated<T>> {
            let Some(body) = &response.body else {
                return Ok(Negotiated::Unmarshalled(response.with_body(None)));
            };

            if !has_content_type(&content_type, &response) {
                trace!(expected = %content_type, "content type not handled by this unmarshaller");
                return Ok(Negotiated::Unchanged(response));
            }

            let value = unmarshaller
                .unmarshall(body)
                .inspect_err(|e| debug!(error = %e, content_type = %content_type, "unmarshalling failed"))?;
            Ok(Negotiated::Unmarshalled(response.with_body(Some(value))))
        },
    )
}

/// Result handler that offers the response to each candidate in order.
///
/// The first candidate that unmarshals the response wins; candidates are not
/// consulted once one has. If none claims a response with a body the
/// result is an unmarshalling error naming the response's content type.
/// The request half of the result is kept as sent.
pub fn unmarshaller<Req, T>(
    candidates: Vec<ResponseUnmarshaller<T>>,
) -> impl Fn(HttpResult<Req, UnstructuredData>) -> Ready<SdkResult<HttpResult<Req, T>>> + Clone + Send + Sync
{
    let candidates: Arc<[ResponseUnmarshaller<T>]> = candidates.into();
    move |result| ready(negotiate(&candidates, result))
}

/// [`unmarshaller`] with a single JSON candidate for `application/json`.
pub fn json_unmarshaller<Req, T>(
) -> impl Fn(HttpResult<Req, UnstructuredData>) -> Ready<SdkResult<HttpResult<Req, T>>> + Clone + Send + Sync
where
    T: DeserializeOwned + 'static,
{
    unmarshaller(vec![unmarshaller_for(JSON_MIME_TYPE, JsonUnmarshaller)])
}

fn negotiate<Req, T>(
    candidates: &[ResponseUnmarshaller<T>],
    result: HttpResult<Req, UnstructuredData>,
) -> SdkResult<HttpResult<Req, T>> {
    let HttpResult { request, response } = result;

    let negotiated = candidates
        .iter()
        .try_fold(Negotiated::Unchanged(response), |acc, candidate| match acc {
            Negotiated::Unchanged(response) => candidate(response),
            unmarshalled => Ok(unmarshalled),
        })?;

    match negotiated {
        Negotiated::Unmarshalled(response) => Ok(HttpResult::new(request, response)),
        Negotiated::Unchanged(response) if response.body.is_none() => {
            Ok(HttpResult::new(request, response.with_body(None)))
        }
        Negotiated::Unchanged(response) => {
            let message = match get_header(&response.headers, CONTENT_TYPE_HEADER) {
                Some(content_type) => format!("Unrecognised content type '{content_type}'"),
                None => "Unrecognised content type (no content-type header)".to_string(),
            };
            debug!(status = response.status_code, "{message}");
            Err(SdkError::unmarshalling(message))
        }
    }
}
