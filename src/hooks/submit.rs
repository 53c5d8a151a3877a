//! Submission wrapper for create, update and transition calls.

use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{lock, ErrorCallback, SubmitFn, SuccessCallback};

/// Options for [`ApiSubmit`]
pub struct SubmitOptions<T> {
    /// Lower the `success` flag again after `reset_delay`
    pub reset_on_success: bool,
    pub reset_delay: Duration,
    pub on_success: Option<SuccessCallback<T>>,
    pub on_error: Option<ErrorCallback>,
}

impl<T> Default for SubmitOptions<T> {
    fn default() -> Self {
        Self {
            reset_on_success: true,
            reset_delay: Duration::from_millis(3000),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> SubmitOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the success flag after `reset_delay`
    pub fn with_reset_on_success(mut self, value: bool) -> Self {
        self.reset_on_success = value;
        self
    }

    /// How long the success flag stays set
    pub fn with_reset_delay(mut self, value: Duration) -> Self {
        self.reset_delay = value;
        self
    }

    /// Called with the response of every applied success
    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

/// Snapshot of an [`ApiSubmit`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

struct Inner {
    state: SubmitState,
    generation: u64,
}

/// Form submission wrapper: `{loading, error, success}` around a write request
pub struct ApiSubmit<P, T> {
    request: SubmitFn<P, T>,
    options: Arc<SubmitOptions<T>>,
    inner: Arc<Mutex<Inner>>,
}

impl<P, T> Clone for ApiSubmit<P, T> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            options: self.options.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<P: Send + 'static, T: Send + 'static> ApiSubmit<P, T> {
    /// Wrap `request`; nothing is sent until `submit`
    pub fn new(request: SubmitFn<P, T>, options: SubmitOptions<T>) -> Self {
        Self {
            request,
            options: Arc::new(options),
            inner: Arc::new(Mutex::new(Inner {
                state: SubmitState::default(),
                generation: 0,
            })),
        }
    }

    /// Send `payload`. The response is returned even if a newer submission
    /// has since taken over the state.
    pub async fn submit(&self, payload: P) -> Option<T> {
        let generation = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = SubmitState {
                loading: true,
                error: None,
                success: false,
            };
            inner.generation
        };

        let result = (self.request)(payload).await;

        let current = {
            let mut inner = lock(&self.inner);
            let current = inner.generation == generation;
            if current {
                inner.state.loading = false;
                match &result {
                    Ok(_) => inner.state.success = true,
                    Err(err) => inner.state.error = Some(err.user_message()),
                }
            } else {
                debug!("submission #{} superseded by #{}", generation, inner.generation);
            }
            current
        };

        match result {
            Ok(data) => {
                if current && self.options.reset_on_success {
                    self.schedule_reset(generation);
                }
                if let Some(callback) = &self.options.on_success {
                    callback(&data);
                }
                Some(data)
            }
            Err(err) => {
                if let Some(callback) = &self.options.on_error {
                    callback(&err.user_message());
                }
                None
            }
        }
    }

    fn schedule_reset(&self, generation: u64) {
        let inner = self.inner.clone();
        let delay = self.options.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = lock(&inner);
            if inner.generation == generation {
                inner.state.success = false;
            }
        });
    }

    /// Clear flags and cancel any pending auto-reset
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        inner.state = SubmitState::default();
    }

    /// Copy of the current flags
    pub fn state(&self) -> SubmitState {
        lock(&self.inner).state.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.inner).state.loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.inner).state.error.clone()
    }

    /// True after a successful submit until reset
    pub fn success(&self) -> bool {
        lock(&self.inner).state.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hooks::submit_fn;
    use serde_json::{json, Value};

    fn echo(options: SubmitOptions<Value>) -> ApiSubmit<Value, Value> {
        ApiSubmit::new(submit_fn(|payload: Value| async move { Ok(payload) }), options)
    }

    #[tokio::test(start_paused = true)]
    async fn success_flag_resets_after_three_seconds() {
        let submit = echo(SubmitOptions::new());

        let response = submit.submit(json!({"plate": "ABC-123"})).await;
        assert_eq!(response, Some(json!({"plate": "ABC-123"})));
        assert!(submit.success());
        assert!(!submit.loading());

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(submit.success());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!submit.success());
    }

    #[tokio::test(start_paused = true)]
    async fn success_flag_sticks_when_reset_disabled() {
        let submit = echo(SubmitOptions::new().with_reset_on_success(false));
        submit.submit(json!(1)).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(submit.success());

        submit.reset();
        assert_eq!(submit.state(), SubmitState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_submission_keeps_its_own_success() {
        let submit = echo(SubmitOptions::new());
        submit.submit(json!(1)).await;

        tokio::time::sleep(Duration::from_millis(2000)).await;
        submit.submit(json!(2)).await;

        // first timer fires at 3000ms but belongs to an older submission
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(submit.success());

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(!submit.success());
    }

    #[tokio::test]
    async fn failures_land_in_error() {
        let submit: ApiSubmit<Value, Value> = ApiSubmit::new(
            submit_fn(|_payload: Value| async { Err(Error::general("Plate already registered")) }),
            SubmitOptions::new(),
        );

        assert_eq!(submit.submit(json!({})).await, None);
        let state = submit.state();
        assert!(!state.success);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Plate already registered"));
    }
}
