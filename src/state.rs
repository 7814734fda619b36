//! Shared application state for all routes.

use crate::store::ContactStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new<S: ContactStore + 'static>(store: S) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
