//! Request-lifecycle helpers shared by every page: loading, error and retry
//! bookkeeping around a request function.
//!
//! Each helper is a cheap-to-clone handle over shared state. Errors never
//! escape a helper; they are stored as user-facing strings.

mod api;
mod paginated;
mod submit;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::Params;

pub use api::{ApiOptions, ApiQuery, QueryState};
pub use paginated::{PageState, PaginatedQuery};
pub use submit::{ApiSubmit, SubmitOptions, SubmitState};

/// Callback run with a successful result
pub type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Callback run with the stored error message
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Request without arguments, as used by [`ApiQuery`]
pub type RequestFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Request taking the current query params, as used by [`PaginatedQuery`]
pub type PagedRequestFn =
    Arc<dyn Fn(Params) -> BoxFuture<'static, Result<ApiResponse<serde_json::Value>>> + Send + Sync>;

/// Request taking a payload, as used by [`ApiSubmit`]
pub type SubmitFn<P, T> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Box an async closure into a [`RequestFn`]
pub fn request_fn<T, F, Fut>(f: F) -> RequestFn<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Box an async closure into a [`PagedRequestFn`]
pub fn paged_request_fn<F, Fut>(f: F) -> PagedRequestFn
where
    F: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ApiResponse<serde_json::Value>>> + Send + 'static,
{
    Arc::new(move |params| f(params).boxed())
}

/// Box an async closure into a [`SubmitFn`]
pub fn submit_fn<P, T, F, Fut>(f: F) -> SubmitFn<P, T>
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move |payload| f(payload).boxed())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
