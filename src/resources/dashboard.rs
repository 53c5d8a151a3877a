//! Dashboard endpoints

use serde_json::Value;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::{HttpClient, Params};

/// Client for `/dashboard`
#[derive(Clone)]
pub struct DashboardApi {
    http: HttpClient,
}

impl DashboardApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /dashboard/overview`
    pub async fn overview(&self, params: &Params) -> Result<ApiResponse<Value>> {
        self.http.get("/dashboard/overview").query(params).execute().await
    }

    /// `GET /dashboard/activity`, e.g. with a `limit`
    pub async fn activity(&self, params: &Params) -> Result<ApiResponse<Value>> {
        self.http.get("/dashboard/activity").query(params).execute().await
    }
}
