//! Contracts for the collaborators a pipeline is assembled from.
//!
//! # Design
//! Every collaborator is a function. Closures are the usual way to supply
//! one, but a closure type cannot be named, so each contract also has a
//! boxed form (`Arc<dyn Fn ...>`) for storing stages in structs or lists.
//! The helpers below erase a closure into that form.
//!
//! The transport (`HttpClient`) deals only in `UnstructuredData`. It returns
//! an error only when the exchange itself failed; 4xx and 5xx responses are
//! successful results so handlers further down the pipeline can inspect
//! them.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::SdkResult;
use crate::http::{HttpHeaders, HttpRequest, HttpResult, UnstructuredData};

/// Sends a request over the wire and pairs it with the response.
pub type HttpClient = Arc<
    dyn Fn(
            HttpRequest<UnstructuredData>,
        ) -> BoxFuture<'static, SdkResult<HttpResult<UnstructuredData, UnstructuredData>>>
        + Send
        + Sync,
>;

/// Contributes headers given the headers accumulated so far.
pub type RequestHeaderFactory =
    Arc<dyn Fn(HttpHeaders) -> BoxFuture<'static, SdkResult<HttpHeaders>> + Send + Sync>;

/// Produces the full set of headers for a request.
pub type RequestHeadersFactory =
    Arc<dyn Fn() -> BoxFuture<'static, SdkResult<HttpHeaders>> + Send + Sync>;

/// Supplies an access token, e.g. from a cache or an OAuth endpoint.
pub type TokenSupplier = Arc<dyn Fn() -> BoxFuture<'static, SdkResult<String>> + Send + Sync>;

/// Box a transport function as an [`HttpClient`].
pub fn http_client<F, Fut>(send: F) -> HttpClient
where
    F: Fn(HttpRequest<UnstructuredData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SdkResult<HttpResult<UnstructuredData, UnstructuredData>>> + Send + 'static,
{
    Arc::new(move |request| send(request).boxed())
}

/// Box a header-contributing function as a [`RequestHeaderFactory`].
pub fn header_factory<F, Fut>(factory: F) -> RequestHeaderFactory
where
    F: Fn(HttpHeaders) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SdkResult<HttpHeaders>> + Send + 'static,
{
    Arc::new(move |headers| factory(headers).boxed())
}

/// Box a token-producing function as a [`TokenSupplier`].
pub fn token_supplier<F, Fut>(supplier: F) -> TokenSupplier
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SdkResult<String>> + Send + 'static,
{
    Arc::new(move || supplier().boxed())
}
