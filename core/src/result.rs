//! Combinators over `Result` used when unwrapping a pipeline's outcome.
//!
//! `map` and `and_then` are inherent on `Result`; `fold` collapses both
//! branches into a single value so callers handle the error and the success
//! case in one expression.

/// Extension methods for `Result`.
pub trait ResultExt<T, E> {
    /// Collapse both branches into one type.
    fn fold<R>(self, on_err: impl FnOnce(E) -> R, on_ok: impl FnOnce(T) -> R) -> R;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn fold<R>(self, on_err: impl FnOnce(E) -> R, on_ok: impl FnOnce(T) -> R) -> R {
        match self {
            Ok(value) => on_ok(value),
            Err(error) => on_err(error),
        }
    }
}
