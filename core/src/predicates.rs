//! Predicates over the HTTP value objects.

use crate::accessors::{get_header, get_http_response};
use crate::http::{HttpResponse, HttpResult};
use crate::marshal::CONTENT_TYPE_HEADER;

/// True for a 2xx status code.
pub fn is_successful_response<B>(response: &HttpResponse<B>) -> bool {
    (200..=299).contains(&response.status_code)
}

pub fn is_successful_result<Req, Resp>(result: &HttpResult<Req, Resp>) -> bool {
    is_successful_response(get_http_response(result))
}

/// True when the response's media type is `content_type`.
///
/// Parameters after `;` are ignored and the media type is trimmed; the
/// comparison itself is exact. A response without `content-type` never
/// matches.
pub fn has_content_type<B>(content_type: &str, response: &HttpResponse<B>) -> bool {
    get_header(&response.headers, CONTENT_TYPE_HEADER)
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim() == content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpRequestMethod};

    #[test]
    fn success_range_is_inclusive() {
        for status in [200, 201, 204, 299] {
            assert!(is_successful_response(&HttpResponse::<()>::new(status, "")), "{status}");
        }
    }

    #[test]
    fn other_statuses_are_not_successful() {
        for status in [100, 199, 300, 304, 404, 500] {
            assert!(!is_successful_response(&HttpResponse::<()>::new(status, "")), "{status}");
        }
    }

    #[test]
    fn content_type_ignores_parameters_and_header_case() {
        let response = HttpResponse::<()>::new(200, "OK")
            .with_header("Content-Type", " application/json ; charset=utf-8");
        assert!(has_content_type("application/json", &response));
        assert!(!has_content_type("text/plain", &response));
    }

    #[test]
    fn content_type_comparison_is_exact() {
        let response = HttpResponse::<()>::new(200, "OK").with_header("content-type", "Text/Plain");
        assert!(!has_content_type("text/plain", &response));
        assert!(has_content_type("Text/Plain", &response));
    }

    #[test]
    fn missing_content_type_never_matches() {
        let response = HttpResponse::<()>::new(204, "No Content");
        assert!(!has_content_type("application/json", &response));
    }

    #[test]
    fn result_checks_its_response() {
        let request: HttpRequest<()> = HttpRequest::new(HttpRequestMethod::Get, "/");
        let ok = HttpResult::new(request.clone(), HttpResponse::<()>::new(204, "No Content"));
        let not_found = HttpResult::new(request, HttpResponse::<()>::new(404, "Not Found"));

        assert!(is_successful_result(&ok));
        assert!(!is_successful_result(&not_found));
    }
}
