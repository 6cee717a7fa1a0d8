//! Left-to-right composition of `Result`-returning stages.
//!
//! `pipe(f, g)` runs `f` and, only if it succeeded, feeds its value to `g`.
//! The first error is returned as is and no later stage runs. `pipe_async`
//! is the same operator for stages that return futures; each future is
//! awaited before its result is inspected, so stages of one pipeline never
//! overlap.
//!
//! Both operators return stages of the same shape as their inputs, so they
//! nest freely and are associative:
//! `pipe(pipe(f, g), h)` behaves as `pipe(f, pipe(g, h))`.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

/// Compose two synchronous stages.
pub fn pipe<A, B, C, E, F, G>(f: F, g: G) -> impl Fn(A) -> Result<C, E> + Clone
where
    F: Fn(A) -> Result<B, E> + Clone,
    G: Fn(B) -> Result<C, E> + Clone,
{
    move |a| f(a).and_then(&g)
}

/// Compose two asynchronous stages.
///
/// The composed stage owns both inputs behind an `Arc` and returns a boxed
/// `Send` future, so it can be cloned into other pipelines and handed to a
/// multi-threaded runtime. Dropping the future abandons the stage in flight.
pub fn pipe_async<A, B, C, E, F, G, FutB, FutC>(
    f: F,
    g: G,
) -> impl Fn(A) -> BoxFuture<'static, Result<C, E>> + Clone + Send + Sync
where
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> FutB + Send + Sync + 'static,
    G: Fn(B) -> FutC + Send + Sync + 'static,
    FutB: Future<Output = Result<B, E>> + Send + 'static,
    FutC: Future<Output = Result<C, E>> + Send + 'static,
{
    let f = Arc::new(f);
    let g = Arc::new(g);
    move |a| {
        let first = (*f)(a);
        let g = Arc::clone(&g);
        async move {
            let b = first.await?;
            (*g)(b).await
        }
        .boxed()
    }
}
