//! Fuel log endpoints

use serde_json::Value;

use super::{Resource, ResourceClient};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;

/// Client for `/fuel`
#[derive(Clone)]
pub struct FuelApi {
    inner: ResourceClient,
}

impl FuelApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Fuel),
        }
    }

    crud_methods!();

    pub async fn verify(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "verify", None).await
    }

    pub async fn approve(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "approve", None).await
    }
}
