use crate::config::Config;
use crate::evaluation::service::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Evaluator with its completion backend, or none if no credential was configured.
    pub evaluator: Evaluator,
    pub config: Config,
}
