//! Driver endpoints

use super::{Resource, ResourceClient};
use crate::fetch::HttpClient;

/// Client for `/drivers`
#[derive(Clone)]
pub struct DriversApi {
    inner: ResourceClient,
}

impl DriversApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: ResourceClient::new(http, Resource::Drivers),
        }
    }

    crud_methods!();
}
