//! Request body marshalling.
//!
//! A `Marshaller` converts a structured body into `UnstructuredData`.
//! `marshaller_for` turns one into a request policy that swaps the body
//! and tags the request with a content type. Which library does the
//! conversion is up to the caller; `JsonMarshaller` wraps `serde_json`.

use std::sync::Arc;

use futures::future::{ready, Ready};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{SdkError, SdkResult};
use crate::http::{HttpRequest, UnstructuredData};

/// Default media type for JSON bodies.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Name of the header that declares a body's media type.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Converts a structured value into `UnstructuredData`.
///
/// Implemented for any `Fn(&T) -> SdkResult<UnstructuredData>`, so a closure
/// wrapping a serialization library works directly.
pub trait Marshaller<T: ?Sized>: Send + Sync {
    fn marshall(&self, value: &T) -> SdkResult<UnstructuredData>;
}

impl<T, F> Marshaller<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> SdkResult<UnstructuredData> + Send + Sync,
{
    fn marshall(&self, value: &T) -> SdkResult<UnstructuredData> {
        self(value)
    }
}

/// Marshals any `Serialize` value to a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller;

impl<T> Marshaller<T> for JsonMarshaller
where
    T: Serialize + ?Sized,
{
    fn marshall(&self, value: &T) -> SdkResult<UnstructuredData> {
        serde_json::to_string(value)
            .map(UnstructuredData::String)
            .map_err(|e| SdkError::marshalling(e.to_string()).with_cause(e))
    }
}

/// Request policy that marshals the body with `marshaller`.
///
/// A request without a body passes through with its body cleared and no
/// `content-type` added. Otherwise the body is replaced by the marshalled
/// data and `content-type` is set to `content_type`, replacing any earlier
/// value. Marshaller errors are returned unchanged.
pub fn marshaller_for<T, M>(
    content_type: &str,
    marshaller: M,
) -> impl Fn(HttpRequest<T>) -> Ready<SdkResult<HttpRequest<UnstructuredData>>> + Clone + Send + Sync
where
    M: Marshaller<T> + 'static,
{
    let content_type: Arc<str> = content_type.into();
    let marshaller = Arc::new(marshaller);
    move |request| ready(marshall_body(&content_type, marshaller.as_ref(), request))
}

/// [`marshaller_for`] with [`JsonMarshaller`] and `application/json`.
pub fn json_marshaller<T>(
) -> impl Fn(HttpRequest<T>) -> Ready<SdkResult<HttpRequest<UnstructuredData>>> + Clone + Send + Sync
where
    T: Serialize,
{
    marshaller_for(JSON_MIME_TYPE, JsonMarshaller)
}

fn marshall_body<T, M>(
    content_type: &str,
    marshaller: &M,
    request: HttpRequest<T>,
) -> SdkResult<HttpRequest<UnstructuredData>>
where
    M: Marshaller<T> + ?Sized,
{
    let Some(body) = &request.body else {
        trace!("no request body to marshall");
        return Ok(request.with_body(None));
    };

    let data = marshaller
        .marshall(body)
        .inspect_err(|e| debug!(error = %e, content_type, "marshalling failed"))?;

    let mut request = request.with_body(Some(data));
    request
        .headers
        .retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER));
    request
        .headers
        .insert(CONTENT_TYPE_HEADER.to_string(), content_type.to_string());
    Ok(request)
}
