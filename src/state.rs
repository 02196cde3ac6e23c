//! Shared application state for all routes: one handle per backing store, injected at startup.

use crate::error::{AppError, StoreError};
use crate::store::{ObjectStore, ProductStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub objects: Arc<dyn ObjectStore>,
    /// Whether 500 responses carry the raw store error text.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        AppState {
            users,
            products,
            objects,
            expose_error_details: true,
        }
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Map a store failure to a logged 500 carrying `message`.
    pub fn fail(&self, message: &str) -> impl FnOnce(StoreError) -> AppError {
        let message = message.to_string();
        let expose = self.expose_error_details;
        move |err| AppError::internal(message, err, expose)
    }
}
