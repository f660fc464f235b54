//! Application state for the web server.

use std::sync::Arc;

use bikeshare::Dashboard;

/// Shared application state.
///
/// The dashboard only hands out immutable snapshots, so requests share it
/// without a lock.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }
}
