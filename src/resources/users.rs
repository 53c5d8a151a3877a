//! User administration endpoints

use serde_json::{json, Value};

use super::{Resource, ResourceClient};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;

/// Client for `/users`
#[derive(Clone)]
pub struct UsersApi {
    inner: ResourceClient,
}

impl UsersApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Users),
        }
    }

    crud_methods!();

    /// Activate or deactivate an account
    pub async fn update_status(&self, id: &str, active: bool) -> Result<ApiResponse<Value>> {
        self.inner
            .transition(id, "status", Some(json!({ "isActive": active })))
            .await
    }
}
