//! Application state for the HTTP server.

use std::sync::Arc;

use crate::query::LaunchQuery;
use crate::refresh::SchedulerMonitor;

/// Default seconds between browser auto-reloads of the page.
pub const DEFAULT_PAGE_REFRESH_SECS: u64 = 300;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read side of the snapshot store
    pub query: LaunchQuery,
    /// Scheduler state and refresh counters
    pub monitor: Arc<SchedulerMonitor>,
    /// Meta-refresh interval of the HTML page
    pub page_refresh_secs: u64,
}

impl AppState {
    pub fn new(query: LaunchQuery, monitor: Arc<SchedulerMonitor>) -> Self {
        Self {
            query,
            monitor,
            page_refresh_secs: DEFAULT_PAGE_REFRESH_SECS,
        }
    }

    pub fn with_page_refresh(mut self, secs: u64) -> Self {
        self.page_refresh_secs = secs;
        self
    }
}
