//! Route state the session layer can force a redirect on

use log::info;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Views the session layer needs to name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    Other(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Other(path) => path,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Anything that can move the UI to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records where the app is
#[derive(Debug)]
pub struct RouteState {
    current: RwLock<Route>,
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl RouteState {
    pub fn new(initial: Route) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn current(&self) -> Route {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RouteState {
    fn navigate(&self, route: Route) {
        info!("navigating to {}", route);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = route;
    }
}
