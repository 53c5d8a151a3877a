//! Vehicle endpoints

use super::{Resource, ResourceClient};
use crate::fetch::HttpClient;

/// Client for `/vehicles`
#[derive(Clone)]
pub struct VehiclesApi {
    inner: ResourceClient,
}

impl VehiclesApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Vehicles),
        }
    }

    crud_methods!();
}
