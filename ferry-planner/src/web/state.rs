//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::repository::LegRepository;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Planner limits and defaults
    pub config: Arc<PlannerConfig>,

    /// Legs loaded at startup, used by requests that bring no data of their own
    pub dataset: Option<Arc<LegRepository>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config: Arc::new(config),
            dataset: None,
        }
    }

    /// Serve a preloaded dataset.
    pub fn with_dataset(mut self, repo: LegRepository) -> Self {
        self.dataset = Some(Arc::new(repo));
        self
    }
}
