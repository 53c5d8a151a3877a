//! Query wrapper for a single read: `{data, loading, error}` plus re-runs
//! when the caller's dependencies change.

use log::debug;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::{lock, ErrorCallback, RequestFn, SuccessCallback};

/// Options for [`ApiQuery`]
pub struct ApiOptions<T> {
    /// Run automatically on mount and whenever the dependencies change
    pub immediate: bool,
    pub on_success: Option<SuccessCallback<T>>,
    pub on_error: Option<ErrorCallback>,
}

impl<T> Default for ApiOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> ApiOptions<T> {
    /// Defaults: run on mount, no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `mount` and dependency changes trigger a run
    pub fn with_immediate(mut self, value: bool) -> Self {
        self.immediate = value;
        self
    }

    /// Called with the data of every applied success
    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Called with the user-facing message of every applied failure
    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

/// Snapshot of an [`ApiQuery`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

struct Inner<T> {
    state: QueryState<T>,
    latest: u64,
    dependencies: Option<Value>,
}

/// `{data, loading, error}` around one request function.
///
/// `execute` may be called while an earlier call is still in flight; both run
/// to completion, but only the most recently started call is allowed to write
/// its result.
pub struct ApiQuery<T> {
    request: RequestFn<T>,
    options: Arc<ApiOptions<T>>,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for ApiQuery<T> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            options: self.options.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> ApiQuery<T> {
    /// Wrap `request`; nothing runs until `mount` or `execute`
    pub fn new(request: RequestFn<T>, options: ApiOptions<T>) -> Self {
        Self {
            request,
            options: Arc::new(options),
            inner: Arc::new(Mutex::new(Inner {
                state: QueryState::default(),
                latest: 0,
                dependencies: None,
            })),
        }
    }

    /// Record the initial dependencies and run once if `immediate`
    pub async fn mount(&self, dependencies: Value) -> Option<T> {
        lock(&self.inner).dependencies = Some(dependencies);
        if self.options.immediate {
            self.execute().await
        } else {
            None
        }
    }

    /// Re-run when `dependencies` differ from the last ones seen and `immediate` is set
    pub async fn set_dependencies(&self, dependencies: Value) -> Option<T> {
        {
            let mut inner = lock(&self.inner);
            if inner.dependencies.as_ref() == Some(&dependencies) {
                return None;
            }
            inner.dependencies = Some(dependencies);
        }
        if self.options.immediate {
            self.execute().await
        } else {
            None
        }
    }

    /// Run the request. Returns the data if this call's result was applied.
    pub async fn execute(&self) -> Option<T> {
        let seq = {
            let mut inner = lock(&self.inner);
            inner.latest += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.latest
        };

        let result = (self.request)().await;

        let mut inner = lock(&self.inner);
        if inner.latest != seq {
            debug!("discarding stale result of request #{} (latest is #{})", seq, inner.latest);
            return None;
        }
        inner.state.loading = false;
        match result {
            Ok(data) => {
                inner.state.data = Some(data.clone());
                drop(inner);
                if let Some(callback) = &self.options.on_success {
                    callback(&data);
                }
                Some(data)
            }
            Err(err) => {
                let message = err.user_message();
                inner.state.error = Some(message.clone());
                drop(inner);
                if let Some(callback) = &self.options.on_error {
                    callback(&message);
                }
                None
            }
        }
    }

    /// Back to the initial state; in-flight calls will not apply their results
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.latest += 1;
        inner.state = QueryState::default();
    }

    /// Copy of the current state
    pub fn state(&self) -> QueryState<T> {
        lock(&self.inner).state.clone()
    }

    /// Data of the last applied success
    pub fn data(&self) -> Option<T> {
        lock(&self.inner).state.data.clone()
    }

    /// True while the most recent call is in flight
    pub fn loading(&self) -> bool {
        lock(&self.inner).state.loading
    }

    /// Message of the last applied failure, cleared on the next run
    pub fn error(&self) -> Option<String> {
        lock(&self.inner).state.error.clone()
    }
}
