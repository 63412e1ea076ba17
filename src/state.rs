use std::sync::Arc;

use crate::database::MessageStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }
}
