//! Fleet Management API Client
//!
//! A Rust client for the fleet-management REST API: authenticated requests,
//! per-resource clients for vehicles, drivers, trips, fuel logs, maintenance,
//! alerts and users, a session/auth store, role permissions and the
//! request-lifecycle helpers the console pages are built on.

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod export;
pub mod fetch;
pub mod hooks;
pub mod permissions;
pub mod resources;
pub mod source;
pub mod validation;

use std::sync::Arc;

use crate::auth::{
    AuthStore, FileStorage, MemoryStorage, RouteState, SessionContext, SessionStorage,
};
use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::HttpClient;
use crate::hooks::SubmitOptions;
use crate::resources::{
    AlertsApi, DashboardApi, DriversApi, FuelApi, MaintenanceApi, Resource, ResourceClient,
    TripsApi, UsersApi, VehiclesApi,
};
use crate::source::DataSource;

/// The main entry point for the fleet client
#[derive(Clone)]
pub struct FleetClient {
    /// Client options
    pub options: ClientOptions,
    /// HTTP client shared by every resource client
    pub http: HttpClient,
    /// Auth store for login, logout and the current session
    pub auth: AuthStore,
}

impl FleetClient {
    /// Create a new fleet client.
    ///
    /// The session is kept in the file at `options.storage_path` when set,
    /// in memory otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use fleet_client::{FleetClient, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:5000/api");
    /// let fleet = FleetClient::new(options).unwrap();
    /// let vehicles = fleet.vehicles();
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = match &options.storage_path {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        let session = SessionContext::new(storage, Arc::new(RouteState::default()));
        Self::with_session(options, Arc::new(session))
    }

    /// Create a fleet client over an existing session context
    pub fn with_session(options: ClientOptions, session: Arc<SessionContext>) -> Result<Self> {
        let http = HttpClient::new(&options, session)?;
        let auth = AuthStore::new(http.clone(), &options);
        Ok(Self { options, http, auth })
    }

    /// Get a reference to the auth store
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.http.session()
    }

    /// Generic CRUD client for any resource
    pub fn resource(&self, resource: Resource) -> ResourceClient {
        ResourceClient::new(self.http.clone(), resource)
    }

    pub fn vehicles(&self) -> VehiclesApi {
        VehiclesApi::new(self.http.clone())
    }

    pub fn drivers(&self) -> DriversApi {
        DriversApi::new(self.http.clone())
    }

    pub fn trips(&self) -> TripsApi {
        TripsApi::new(self.http.clone())
    }

    pub fn fuel(&self) -> FuelApi {
        FuelApi::new(self.http.clone())
    }

    pub fn maintenance(&self) -> MaintenanceApi {
        MaintenanceApi::new(self.http.clone())
    }

    pub fn alerts(&self) -> AlertsApi {
        AlertsApi::new(self.http.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.http.clone())
    }

    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(self.http.clone())
    }

    /// List data from the live API
    pub fn live_source(&self) -> DataSource {
        DataSource::live(self.http.clone())
    }

    /// Submit options carrying the configured success reset delay
    pub fn submit_options<T>(&self) -> SubmitOptions<T> {
        SubmitOptions::new().with_reset_delay(self.options.submit_reset_delay)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthResult, AuthState, Credentials, Role, User};
    pub use crate::config::ClientOptions;
    pub use crate::envelope::{ApiResponse, Pagination};
    pub use crate::error::{Error, Result};
    pub use crate::fetch::Params;
    pub use crate::resources::Resource;
    pub use crate::source::DataSource;
    pub use crate::FleetClient;
}
