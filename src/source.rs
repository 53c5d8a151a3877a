//! Where list pages come from: the live API or built-in demo records.
//!
//! Pages pick a [`DataSource`] once at the composition root instead of
//! swapping in sample data when a live call fails.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::envelope::{ApiResponse, Pagination};
use crate::error::{Error, Result};
use crate::fetch::{HttpClient, Params};
use crate::hooks::{paged_request_fn, PagedRequestFn};
use crate::resources::{Resource, ResourceClient};

/// Read access to resource records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// One page of `resource`, in the backend's list envelope
    async fn list(&self, resource: Resource, params: &Params) -> Result<ApiResponse<Value>>;

    /// One record of `resource`
    async fn get(&self, resource: Resource, id: &str) -> Result<ApiResponse<Value>>;
}

/// Records from the REST API
#[derive(Clone)]
pub struct LiveSource {
    http: HttpClient,
}

impl LiveSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RecordSource for LiveSource {
    async fn list(&self, resource: Resource, params: &Params) -> Result<ApiResponse<Value>> {
        ResourceClient::new(self.http.clone(), resource)
            .get_all(params)
            .await
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<ApiResponse<Value>> {
        ResourceClient::new(self.http.clone(), resource)
            .get_by_id(id)
            .await
    }
}

/// Built-in sample records for offline demos
#[derive(Clone)]
pub struct DemoSource {
    records: Arc<HashMap<Resource, Vec<Value>>>,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::with_records(sample_records())
    }
}

impl DemoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` instead of the built-in samples
    pub fn with_records(records: HashMap<Resource, Vec<Value>>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn records(&self, resource: Resource) -> &[Value] {
        self.records.get(&resource).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[async_trait]
impl RecordSource for DemoSource {
    async fn list(&self, resource: Resource, params: &Params) -> Result<ApiResponse<Value>> {
        let search = params
            .get("search")
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());
        let status = params.get("status").filter(|s| !s.is_empty() && *s != "all");

        let matching: Vec<&Value> = self
            .records(resource)
            .iter()
            .filter(|record| {
                status.map_or(true, |s| record.get("status").and_then(Value::as_str) == Some(s))
            })
            .filter(|record| search.as_deref().map_or(true, |s| mentions(record, s)))
            .collect();

        let pagination = Pagination::compute(
            params.page_number().unwrap_or(1),
            params.limit_number().unwrap_or(10),
            matching.len() as u64,
        );
        let start = ((pagination.current_page - 1) * pagination.limit) as usize;
        let page: Vec<Value> = matching
            .into_iter()
            .skip(start)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        let mut data = serde_json::Map::new();
        data.insert(resource.list_key().to_string(), Value::Array(page));
        data.insert("pagination".to_string(), serde_json::to_value(&pagination)?);
        Ok(ApiResponse::ok(Value::Object(data)))
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<ApiResponse<Value>> {
        self.records(resource)
            .iter()
            .find(|record| {
                record.get("id").and_then(Value::as_str) == Some(id)
                    || record.get("_id").and_then(Value::as_str) == Some(id)
            })
            .map(|record| ApiResponse::ok(record.clone()))
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("{} {} not found", resource, id),
                errors: Vec::new(),
            })
    }
}

fn mentions(record: &Value, needle: &str) -> bool {
    match record {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Object(map) => map.values().any(|v| mentions(v, needle)),
        Value::Array(items) => items.iter().any(|v| mentions(v, needle)),
        _ => false,
    }
}

/// The data source chosen at startup
#[derive(Clone)]
pub enum DataSource {
    Live(LiveSource),
    Demo(DemoSource),
}

impl DataSource {
    pub fn live(http: HttpClient) -> Self {
        DataSource::Live(LiveSource::new(http))
    }

    pub fn demo() -> Self {
        DataSource::Demo(DemoSource::new())
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, DataSource::Demo(_))
    }

    fn source(&self) -> &dyn RecordSource {
        match self {
            DataSource::Live(source) => source,
            DataSource::Demo(source) => source,
        }
    }

    pub async fn list(&self, resource: Resource, params: &Params) -> Result<ApiResponse<Value>> {
        self.source().list(resource, params).await
    }

    pub async fn get(&self, resource: Resource, id: &str) -> Result<ApiResponse<Value>> {
        self.source().get(resource, id).await
    }

    /// A page request for [`PaginatedQuery`](crate::hooks::PaginatedQuery) backed by this source
    pub fn paged_request(&self, resource: Resource) -> PagedRequestFn {
        let source = self.clone();
        paged_request_fn(move |params: Params| {
            let source = source.clone();
            async move { source.list(resource, &params).await }
        })
    }
}

fn sample_records() -> HashMap<Resource, Vec<Value>> {
    let mut records = HashMap::new();

    records.insert(
        Resource::Vehicles,
        vec![
            json!({"id": "veh-001", "licensePlate": "FLT-1001", "make": "Ford", "model": "Transit",
                   "year": 2021, "type": "van", "status": "active", "fuelType": "diesel", "mileage": 48250}),
            json!({"id": "veh-002", "licensePlate": "FLT-1002", "make": "Volvo", "model": "FH16",
                   "year": 2019, "type": "truck", "status": "maintenance", "fuelType": "diesel", "mileage": 182400}),
            json!({"id": "veh-003", "licensePlate": "FLT-1003", "make": "Toyota", "model": "Hilux",
                   "year": 2022, "type": "pickup", "status": "active", "fuelType": "petrol", "mileage": 21030}),
            json!({"id": "veh-004", "licensePlate": "FLT-1004", "make": "Mercedes-Benz", "model": "Sprinter",
                   "year": 2020, "type": "van", "status": "inactive", "fuelType": "diesel", "mileage": 97310}),
        ],
    );

    records.insert(
        Resource::Drivers,
        vec![
            json!({"id": "drv-001", "firstName": "Maria", "lastName": "Santos", "email": "maria.santos@fleet.com",
                   "phone": "+1 555 0101", "licenseNumber": "DL-448120", "status": "active"}),
            json!({"id": "drv-002", "firstName": "James", "lastName": "Okafor", "email": "james.okafor@fleet.com",
                   "phone": "+1 555 0102", "licenseNumber": "DL-553901", "status": "on_trip"}),
            json!({"id": "drv-003", "firstName": "Lena", "lastName": "Fischer", "email": "lena.fischer@fleet.com",
                   "phone": "+1 555 0103", "licenseNumber": "DL-610277", "status": "inactive"}),
        ],
    );

    records.insert(
        Resource::Trips,
        vec![
            json!({"id": "trip-001", "vehicle": "veh-001", "driver": "drv-002", "origin": "Central Depot",
                   "destination": "North Warehouse", "status": "in_progress", "distance": 84.5}),
            json!({"id": "trip-002", "vehicle": "veh-003", "driver": "drv-001", "origin": "North Warehouse",
                   "destination": "Harbor Terminal", "status": "completed", "distance": 132.0}),
        ],
    );

    records.insert(
        Resource::Fuel,
        vec![
            json!({"id": "fuel-001", "vehicle": "veh-001", "driver": "drv-002", "date": "2024-03-02",
                   "liters": 62.4, "pricePerLiter": 1.62, "totalCost": 101.09, "odometer": 48010,
                   "station": "Shell Main St", "status": "verified"}),
            json!({"id": "fuel-002", "vehicle": "veh-002", "driver": "drv-001", "date": "2024-03-04",
                   "liters": 310.0, "pricePerLiter": 1.58, "totalCost": 489.8, "odometer": 182150,
                   "station": "BP Highway 9", "status": "pending"}),
            json!({"id": "fuel-003", "vehicle": "veh-003", "driver": "drv-001", "date": "2024-03-05",
                   "liters": 48.0, "pricePerLiter": 1.71, "totalCost": 82.08, "odometer": 20990,
                   "station": "Esso Harbor", "status": "approved"}),
        ],
    );

    records.insert(
        Resource::Maintenance,
        vec![
            json!({"id": "mnt-001", "vehicle": "veh-002", "type": "repair", "description": "Brake pad replacement",
                   "scheduledDate": "2024-03-10", "cost": 640.0, "priority": "high", "status": "in_progress"}),
            json!({"id": "mnt-002", "vehicle": "veh-001", "type": "preventive", "description": "Oil and filter change",
                   "scheduledDate": "2024-03-18", "cost": 120.0, "priority": "medium", "status": "scheduled"}),
            json!({"id": "mnt-003", "vehicle": "veh-004", "type": "inspection", "description": "Annual safety inspection",
                   "scheduledDate": "2024-02-26", "cost": 85.0, "priority": "low", "status": "completed"}),
        ],
    );

    records.insert(
        Resource::Alerts,
        vec![
            json!({"id": "alt-001", "type": "maintenance_due", "severity": "warning",
                   "message": "FLT-1001 oil change due in 250 km", "status": "active"}),
            json!({"id": "alt-002", "type": "fuel_anomaly", "severity": "critical",
                   "message": "FLT-1002 fuel consumption 40% above average", "status": "acknowledged"}),
        ],
    );

    records.insert(Resource::Users, Vec::new());
    records
}
