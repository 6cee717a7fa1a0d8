//! Header factories and their composition.
//!
//! A header factory receives the headers built so far and returns headers to
//! merge in; it may need I/O, such as fetching an access token, so factories
//! are asynchronous. `create_headers` folds an ordered list of factories into
//! one `RequestHeadersFactory`.

use std::sync::Arc;

use futures::future::ready;
use futures::FutureExt;
use tracing::debug;

use crate::client::{header_factory, RequestHeaderFactory, RequestHeadersFactory, TokenSupplier};
use crate::error::SdkError;
use crate::http::HttpHeaders;

/// Default name of the header carrying a bearer token.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Fold `factories` left to right into a single headers factory.
///
/// Each factory is handed the headers accumulated so far; its output is
/// merged over them, so later factories win on name collisions. The first
/// error is returned and the remaining factories are not invoked.
pub fn create_headers(factories: Vec<RequestHeaderFactory>) -> RequestHeadersFactory {
    let factories: Arc<[RequestHeaderFactory]> = factories.into();
    Arc::new(move || {
        let factories = Arc::clone(&factories);
        async move {
            let mut headers = HttpHeaders::new();
            for (index, factory) in factories.iter().enumerate() {
                let extra = factory(headers.clone()).await.inspect_err(|e| {
                    debug!(index, error = %e, "header factory failed");
                })?;
                headers.extend(extra);
            }
            Ok::<_, SdkError>(headers)
        }
        .boxed()
    })
}

/// A factory that always contributes the same headers.
pub fn constant_headers(headers: HttpHeaders) -> RequestHeaderFactory {
    let headers = Arc::new(headers);
    header_factory(move |_: HttpHeaders| ready(Ok(HttpHeaders::clone(&headers))))
}

/// A factory that adds `authorization: Bearer <token>`.
pub fn bearer_token(supplier: TokenSupplier) -> RequestHeaderFactory {
    bearer_token_as(AUTHORIZATION_HEADER, supplier)
}

/// Like [`bearer_token`], with a custom header name for servers that expect
/// exact casing (e.g. `Authorization`).
pub fn bearer_token_as(header: &str, supplier: TokenSupplier) -> RequestHeaderFactory {
    let header: Arc<str> = header.into();
    header_factory(move |_: HttpHeaders| {
        let header = Arc::clone(&header);
        let token = supplier();
        async move {
            let token = token.await?;
            Ok::<_, SdkError>(HttpHeaders::from([(
                header.to_string(),
                format!("Bearer {token}"),
            )]))
        }
    })
}
