use std::sync::Arc;

use crate::database::DocumentStore;

/// Shared handler state. Holds the one store handle opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}
