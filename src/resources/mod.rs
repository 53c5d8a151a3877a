//! One thin client per REST resource.
//!
//! Every function maps to exactly one call: no retries, no caching and no
//! checks on the state-transition verbs. Failures come back unchanged from
//! [`HttpClient`].

/// Implements the shared CRUD surface on a resource wrapper by delegating to its `ResourceClient`.
macro_rules! crud_methods {
    () => {
        pub async fn get_all(
            &self,
            params: &$crate::fetch::Params,
        ) -> $crate::resources::RecordResult {
            self.inner.get_all(params).await
        }

        pub async fn get_by_id(&self, id: &str) -> $crate::resources::RecordResult {
            self.inner.get_by_id(id).await
        }

        pub async fn create<T: serde::Serialize + ?Sized>(
            &self,
            record: &T,
        ) -> $crate::resources::RecordResult {
            self.inner.create(record).await
        }

        pub async fn update<T: serde::Serialize + ?Sized>(
            &self,
            id: &str,
            record: &T,
        ) -> $crate::resources::RecordResult {
            self.inner.update(id, record).await
        }

        pub async fn delete(&self, id: &str) -> $crate::resources::RecordResult {
            self.inner.delete(id).await
        }

        pub async fn stats(&self) -> $crate::resources::RecordResult {
            self.inner.stats().await
        }
    };
}

mod alerts;
mod dashboard;
mod drivers;
mod fuel;
mod maintenance;
mod trips;
mod users;
mod vehicles;

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::{HttpClient, Params};

pub use alerts::AlertsApi;
pub use dashboard::DashboardApi;
pub use drivers::DriversApi;
pub use fuel::FuelApi;
pub use maintenance::MaintenanceApi;
pub use trips::TripsApi;
pub use users::UsersApi;
pub use vehicles::VehiclesApi;

/// What every resource call resolves to
pub type RecordResult = Result<ApiResponse<Value>>;

/// The CRUD resources the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vehicles,
    Drivers,
    Trips,
    Fuel,
    Maintenance,
    Alerts,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Vehicles,
        Resource::Drivers,
        Resource::Trips,
        Resource::Fuel,
        Resource::Maintenance,
        Resource::Alerts,
        Resource::Users,
    ];

    /// Route under the API root
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Vehicles => "/vehicles",
            Resource::Drivers => "/drivers",
            Resource::Trips => "/trips",
            Resource::Fuel => "/fuel",
            Resource::Maintenance => "/maintenance",
            Resource::Alerts => "/alerts",
            Resource::Users => "/users",
        }
    }

    /// Key list responses nest their records under
    pub fn list_key(&self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicles",
            Resource::Drivers => "drivers",
            Resource::Trips => "trips",
            Resource::Fuel => "fuelLogs",
            Resource::Maintenance => "maintenanceRecords",
            Resource::Alerts => "alerts",
            Resource::Users => "users",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// Generic CRUD client for one resource
#[derive(Clone)]
pub struct ResourceClient {
    http: HttpClient,
    resource: Resource,
}

impl ResourceClient {
    pub fn new(http: HttpClient, resource: Resource) -> Self {
        Self { http, resource }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// `GET /<resource>?<params>`; params are passed through verbatim
    pub async fn get_all(&self, params: &Params) -> Result<ApiResponse<Value>> {
        self.http.get(self.resource.path()).query(params).execute().await
    }

    /// `GET /<resource>/<id>`
    pub async fn get_by_id(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.http
            .get(self.resource.path())
            .segment(id)
            .execute()
            .await
    }

    /// `POST /<resource>` with `record` as the JSON body
    pub async fn create<T: Serialize + ?Sized>(&self, record: &T) -> Result<ApiResponse<Value>> {
        self.http.post(self.resource.path()).json(record)?.execute().await
    }

    /// `PUT /<resource>/<id>` with `record` as the JSON body
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        id: &str,
        record: &T,
    ) -> Result<ApiResponse<Value>> {
        self.http
            .put(self.resource.path())
            .segment(id)
            .json(record)?
            .execute()
            .await
    }

    /// `DELETE /<resource>/<id>`, no body
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.http
            .delete(self.resource.path())
            .segment(id)
            .execute()
            .await
    }

    /// `GET /<resource>/stats`
    pub async fn stats(&self) -> Result<ApiResponse<Value>> {
        self.http
            .get(self.resource.path())
            .segment("stats")
            .execute()
            .await
    }

    /// `PATCH /<resource>/<id>/<verb>` with an optional body
    pub(crate) async fn transition(
        &self,
        id: &str,
        verb: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse<Value>> {
        let fetch = self
            .http
            .patch(self.resource.path())
            .segment(id)
            .segment(verb);
        let fetch = match body {
            Some(body) => fetch.json(&body)?,
            None => fetch.json(&json!({}))?,
        };
        fetch.execute().await
    }
}
