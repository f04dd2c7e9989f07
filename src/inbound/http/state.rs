//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend on
//! domain ports only and remain testable without wiring persistence.

use std::sync::Arc;

use crate::domain::ports::RelationshipManager;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub relationships: Arc<dyn RelationshipManager>,
}

impl HttpState {
    pub fn new(relationships: Arc<dyn RelationshipManager>) -> Self {
        Self { relationships }
    }
}
