//! Application State

use std::sync::Arc;

use finance_strategist::StrategyPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider plus economic and market analysts
    pub pipeline: Arc<StrategyPipeline>,
}

impl AppState {
    pub fn new(pipeline: StrategyPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
