//! Trip endpoints

use serde::Serialize;
use serde_json::{json, Value};

use super::{Resource, ResourceClient};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;

/// Client for `/trips`
#[derive(Clone)]
pub struct TripsApi {
    inner: ResourceClient,
}

impl TripsApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Trips),
        }
    }

    crud_methods!();

    /// Mark a trip as started, e.g. with the odometer reading
    pub async fn start<T: Serialize + ?Sized>(
        &self,
        id: &str,
        data: &T,
    ) -> Result<ApiResponse<Value>> {
        let data = serde_json::to_value(data)?;
        self.inner.transition(id, "start", Some(data)).await
    }

    /// Mark a trip as completed, e.g. with end mileage and fuel used
    pub async fn complete<T: Serialize + ?Sized>(
        &self,
        id: &str,
        data: &T,
    ) -> Result<ApiResponse<Value>> {
        let data = serde_json::to_value(data)?;
        self.inner.transition(id, "complete", Some(data)).await
    }

    pub async fn cancel(&self, id: &str, reason: &str) -> Result<ApiResponse<Value>> {
        self.inner.transition(id, "cancel", Some(json!({ "reason": reason }))).await
    }
}
