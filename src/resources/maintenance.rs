//! Maintenance record endpoints

use serde::Serialize;
use serde_json::Value;

use super::{Resource, ResourceClient};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;

/// Client for `/maintenance`
#[derive(Clone)]
pub struct MaintenanceApi {
    inner: ResourceClient,
}

impl MaintenanceApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Maintenance),
        }
    }

    crud_methods!();

    pub async fn start(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "start", None).await
    }

    /// Close a record, e.g. with the final cost and work notes
    pub async fn complete<T: Serialize + ?Sized>(
        &self,
        id: &str,
        data: &T,
    ) -> Result<ApiResponse<Value>> {
        let data = serde_json::to_value(data)?;
        self.inner.transition(id, "complete", Some(data)).await
    }

    pub async fn approve(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "approve", None).await
    }
}
