use std::sync::Arc;

use pipeclient_core::marshal::CONTENT_TYPE_HEADER;
use pipeclient_core::{
    build_url, get_header, http_client, HttpClient, HttpHeaders, HttpRequest, HttpRequestMethod,
    HttpResponse, HttpResult, SdkError, SdkResult, UnstructuredData,
};
use tracing::{debug, trace, warn};
use ureq::http::{self, HeaderMap};
use ureq::Agent;

use crate::config::UreqConfig;

const USER_AGENT_HEADER: &str = "user-agent";

/// Build an `HttpClient` that sends requests with a `ureq` agent.
///
/// Must be driven by a tokio runtime: the blocking exchange is moved to
/// `spawn_blocking` when the returned future is first polled.
pub fn ureq_client(config: UreqConfig) -> HttpClient {
    let agent: Agent = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(config.timeout))
        .max_redirects(config.max_redirects)
        .build()
        .new_agent();
    let user_agent: Arc<str> = config.user_agent.into();
    let max_body_size = config.max_body_size;

    http_client(move |request: HttpRequest<UnstructuredData>| {
        let agent = agent.clone();
        let user_agent = Arc::clone(&user_agent);
        async move {
            tokio::task::spawn_blocking(move || {
                execute(&agent, &user_agent, max_body_size, request)
            })
            .await
            .unwrap_or_else(|e| {
                Err(SdkError::http_client("Transport task did not complete").with_cause(e))
            })
        }
    })
}

fn execute(
    agent: &Agent,
    user_agent: &str,
    max_body_size: u64,
    request: HttpRequest<UnstructuredData>,
) -> SdkResult<HttpResult<UnstructuredData, UnstructuredData>> {
    let url = build_url(&request)?;
    let body = request_body(&request)?;

    let mut builder = http::Request::builder()
        .method(request.method.as_str())
        .uri(url.as_str());
    for (name, value) in &request.headers {
        if body.is_none() && name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    if get_header(&request.headers, USER_AGENT_HEADER).is_none() {
        builder = builder.header(USER_AGENT_HEADER, user_agent);
    }

    debug!(method = %request.method, %url, has_body = body.is_some(), "sending request");
    let mut response = match body {
        Some(body) => agent.run(builder.body(body).map_err(invalid_request)?),
        None => agent.run(builder.body(()).map_err(invalid_request)?),
    }
    .map_err(transport_error)
    .inspect_err(|e| warn!(method = %request.method, %url, error = %e, "request failed"))?;

    let status = response.status();
    let headers = response_headers(response.headers());
    let bytes = response
        .body_mut()
        .with_config()
        .limit(max_body_size)
        .read_to_vec()
        .map_err(transport_error)?;
    trace!(status = status.as_u16(), bytes = bytes.len(), "received response");

    let body = decode_body(&bytes);
    let mut response =
        HttpResponse::new(status.as_u16(), status.canonical_reason().unwrap_or_default())
            .with_headers(headers);
    response.body = body;

    Ok(HttpResult::new(request, response))
}

/// The body to send, if any.
///
/// GET and HEAD never carry a body. A body without a declared content type
/// is rejected.
fn request_body(request: &HttpRequest<UnstructuredData>) -> SdkResult<Option<String>> {
    if matches!(request.method, HttpRequestMethod::Get | HttpRequestMethod::Head) {
        return Ok(None);
    }

    let Some(body) = &request.body else {
        return Ok(None);
    };

    if get_header(&request.headers, CONTENT_TYPE_HEADER).is_none() {
        return Err(SdkError::illegal_argument("Missing content-type"));
    }

    match body {
        UnstructuredData::String(data) => Ok(Some(data.clone())),
        _ => Err(SdkError::illegal_state("Unrecognised unstructured data type")),
    }
}

/// Response bytes as text. Invalid UTF-8 is replaced rather than rejected so
/// that binary bodies still reach content negotiation.
fn decode_body(bytes: &[u8]) -> Option<UnstructuredData> {
    if bytes.is_empty() {
        return None;
    }
    Some(UnstructuredData::String(
        String::from_utf8_lossy(bytes).into_owned(),
    ))
}

/// Header names are lower-cased; repeated headers are joined with `", "`.
fn response_headers(map: &HeaderMap) -> HttpHeaders {
    let mut headers = HttpHeaders::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    headers
}

fn invalid_request(e: http::Error) -> SdkError {
    SdkError::illegal_argument(format!("Invalid request: {e}")).with_cause(e)
}

fn transport_error(e: ureq::Error) -> SdkError {
    SdkError::http_client(e.to_string()).with_cause(e)
}
