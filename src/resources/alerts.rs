//! Alert endpoints

use serde_json::{json, Value};

use super::{Resource, ResourceClient};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;

/// Client for `/alerts`
#[derive(Clone)]
pub struct AlertsApi {
    inner: ResourceClient,
}

impl AlertsApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Alerts),
        }
    }

    crud_methods!();

    pub async fn acknowledge(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "acknowledge", None).await
    }

    pub async fn resolve(&self, id: &str, notes: &str) -> Result<ApiResponse<Value>> {
        self.inner
            .transition(id, "resolve", Some(json!({ "resolutionNotes": notes })))
            .await
    }

    pub async fn dismiss(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "dismiss", None).await
    }
}
