//! Accessors over the HTTP value objects.

use tracing::trace;

use crate::error::{SdkError, SdkResult};
use crate::http::{HttpHeaders, HttpResponse, HttpResult};

pub fn get_http_response<Req, Resp>(result: &HttpResult<Req, Resp>) -> &HttpResponse<Resp> {
    &result.response
}

pub fn get_http_body<B>(response: &HttpResponse<B>) -> Option<&B> {
    response.body.as_ref()
}

/// The response body of `result`. An absent body is `None`, not an error.
pub fn extract_http_body<Req, Resp>(result: HttpResult<Req, Resp>) -> Option<Resp> {
    result.response.body
}

/// Look up a header value, ignoring ASCII case in the header name.
pub fn get_header<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .or_else(|| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

/// Parse a header value as an integer.
///
/// A missing header is `Ok(None)`: not every header is sent under every
/// server configuration (e.g. `content-length`). Callers that need the
/// header must turn `None` into an error themselves.
pub fn parse_int_header(name: &str, headers: &HttpHeaders) -> SdkResult<Option<i64>> {
    let Some(value) = get_header(headers, name) else {
        trace!(header = name, "header not present");
        return Ok(None);
    };

    value.trim().parse::<i64>().map(Some).map_err(|e| {
        SdkError::invalid_number(format!("Header '{name}' is not a number: '{value}'")).with_cause(e)
    })
}
