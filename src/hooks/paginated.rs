//! Paged list wrapper: tracks params, the current page and the backend's
//! pagination block.

use log::debug;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

use super::{lock, PagedRequestFn};
use crate::envelope::{extract_list, Pagination};
use crate::error::Error;
use crate::fetch::Params;

/// Snapshot of a [`PaginatedQuery`]
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub params: Params,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner<T> {
    state: PageState<T>,
    latest: u64,
}

/// A list endpoint with page navigation.
///
/// The request receives the current params and must answer with a
/// `{data: {<anyKey>: [...], pagination}}` envelope; the list is read from
/// whichever key is not `pagination`.
pub struct PaginatedQuery<T> {
    request: PagedRequestFn,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for PaginatedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: DeserializeOwned + Clone + Send + 'static> PaginatedQuery<T> {
    /// Wrap `request`, starting from `initial_params`
    pub fn new(request: PagedRequestFn, initial_params: Params) -> Self {
        let mut pagination = Pagination::default();
        if let Some(limit) = initial_params.limit_number() {
            pagination.limit = limit;
        }
        Self {
            request,
            inner: Arc::new(Mutex::new(Inner {
                state: PageState {
                    data: Vec::new(),
                    pagination,
                    params: initial_params,
                    loading: false,
                    error: None,
                },
                latest: 0,
            })),
        }
    }

    /// First load
    pub async fn mount(&self) -> bool {
        self.refetch().await
    }

    /// Re-run with the current params. Returns whether the result was applied.
    pub async fn refetch(&self) -> bool {
        let (seq, params) = {
            let mut inner = lock(&self.inner);
            inner.latest += 1;
            inner.state.loading = true;
            inner.state.error = None;
            (inner.latest, inner.state.params.clone())
        };

        let result = (self.request)(params).await.and_then(|response| {
            if !response.success {
                return Err(Error::general(
                    response.message.unwrap_or_else(|| "Request failed".to_string()),
                ));
            }
            let data = response.data.ok_or_else(|| Error::envelope("list response has no data"))?;
            let page = extract_list(&data)?;
            let items = page
                .items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<T>, _>>()?;
            Ok((items, page.pagination))
        });

        let mut inner = lock(&self.inner);
        if inner.latest != seq {
            debug!("discarding stale page #{} (latest is #{})", seq, inner.latest);
            return false;
        }
        inner.state.loading = false;
        match result {
            Ok((items, pagination)) => {
                inner.state.data = items;
                inner.state.pagination = pagination;
            }
            Err(err) => inner.state.error = Some(err.user_message()),
        }
        true
    }

    /// Merge `params` into the current ones and reload; back to page 1 unless a page is given
    pub async fn update_params(&self, params: Params) -> bool {
        {
            let mut inner = lock(&self.inner);
            let page_given = params.get("page").is_some();
            inner.state.params.merge(&params);
            if !page_given {
                inner.state.params.set("page", 1);
            }
        }
        self.refetch().await
    }

    /// Load the next page; a no-op without a request when there is none
    pub async fn next_page(&self) -> bool {
        let target = {
            let inner = lock(&self.inner);
            let pagination = &inner.state.pagination;
            if !pagination.has_next_page {
                return false;
            }
            pagination.current_page + 1
        };
        self.load_page(target).await
    }

    /// Load the previous page; a no-op without a request when there is none
    pub async fn prev_page(&self) -> bool {
        let target = {
            let inner = lock(&self.inner);
            let pagination = &inner.state.pagination;
            if !pagination.has_prev_page || pagination.current_page <= 1 {
                return false;
            }
            pagination.current_page - 1
        };
        self.load_page(target).await
    }

    /// Jump to `page`; pages outside `1..=total_pages` are ignored
    pub async fn go_to_page(&self, page: u32) -> bool {
        {
            let inner = lock(&self.inner);
            if page < 1 || page > inner.state.pagination.total_pages.max(1) {
                return false;
            }
        }
        self.load_page(page).await
    }

    async fn load_page(&self, page: u32) -> bool {
        lock(&self.inner).state.params.set("page", page);
        self.refetch().await
    }

    /// Copy of the current state
    pub fn state(&self) -> PageState<T> {
        lock(&self.inner).state.clone()
    }

    /// Records of the current page
    pub fn data(&self) -> Vec<T> {
        lock(&self.inner).state.data.clone()
    }

    /// Pagination block from the last applied page
    pub fn pagination(&self) -> Pagination {
        lock(&self.inner).state.pagination.clone()
    }

    /// Params the next request will send
    pub fn params(&self) -> Params {
        lock(&self.inner).state.params.clone()
    }

    /// True while the most recent load is in flight
    pub fn loading(&self) -> bool {
        lock(&self.inner).state.loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.inner).state.error.clone()
    }
}
