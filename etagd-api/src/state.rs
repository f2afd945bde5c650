//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use etagd_core::{ConditionalResource, ValidatorGenerator};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ApiConfig;

/// State of the conditional resource, shared by its routes and middleware.
#[derive(Clone)]
pub struct ResourceState {
    pub resource: Arc<ConditionalResource>,
    /// Exchange gate. Held from precheck until the response is finalized so
    /// that no other request can replace the validator in between.
    gate: Arc<Mutex<()>>,
    /// Largest response body buffered for validator generation.
    pub max_body_bytes: usize,
}

impl ResourceState {
    pub fn new(resource: ConditionalResource, max_body_bytes: usize) -> Self {
        Self {
            resource: Arc::new(resource),
            gate: Arc::new(Mutex::new(())),
            max_body_bytes,
        }
    }

    /// Build the resource described by `config`.
    pub fn from_config(config: &ApiConfig) -> Self {
        let resource = ConditionalResource::new()
            .with_refresh_window(config.refresh_window)
            .with_generator(ValidatorGenerator::with_hex_len(config.validator_hex_len));
        Self::new(resource, config.max_body_bytes)
    }

    /// Wait for exclusive use of the resource for one exchange.
    pub async fn begin_exchange(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

/// Application-wide state.
#[derive(Clone)]
pub struct AppState {
    pub resource: ResourceState,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(resource: ResourceState) -> Self {
        Self {
            resource,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(ResourceState, resource);
crate::impl_from_ref!(Instant, start_time);
