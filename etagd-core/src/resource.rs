//! The conditional resource service object.
//!
//! Bundles the resource store, the live validator and the generator behind
//! one owned value so both halves of the pipeline see the same state.
//! Callers that dispatch requests concurrently must hold a single lock from
//! [`ConditionalResource::precheck`] until [`ConditionalResource::finalize`]
//! returns, otherwise a decision can be made against a validator that is
//! replaced before the response goes out.

use std::time::Duration;

use http::Method;

use crate::error::PreconditionError;
use crate::generator::{Finalized, ResponseDraft, ValidatorGenerator};
use crate::guard::{evaluate_preconditions, ConditionalContext, Preconditions};
use crate::store::{ResourceStore, ResourceValue};
use crate::validator::{Validator, ValidatorState};
use crate::Timestamp;

#[derive(Debug, Default)]
pub struct ConditionalResource {
    store: ResourceStore,
    validators: ValidatorState,
    generator: ValidatorGenerator,
}

impl ConditionalResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource whose default value is derived from `now`.
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            store: ResourceStore::starting_at(now),
            validators: ValidatorState::new(),
            generator: ValidatorGenerator::new(),
        }
    }

    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.store = self.store.with_refresh_window(window);
        self
    }

    pub fn with_generator(mut self, generator: ValidatorGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn read(&self) -> ResourceValue {
        self.store.read()
    }

    pub fn read_at(&self, now: Timestamp) -> ResourceValue {
        self.store.read_at(now)
    }

    pub fn write(&self, value: i64) -> ResourceValue {
        self.store.write(value)
    }

    pub fn snapshot(&self) -> ResourceValue {
        self.store.snapshot()
    }

    pub fn current_validator(&self) -> Option<Validator> {
        self.validators.current()
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn generator(&self) -> &ValidatorGenerator {
        &self.generator
    }

    /// Pre-handler stage.
    pub fn precheck(
        &self,
        method: &Method,
        preconditions: &Preconditions,
    ) -> Result<ConditionalContext, PreconditionError> {
        let current = self.validators.current();
        evaluate_preconditions(method, preconditions, current.as_ref())
    }

    /// Post-handler stage.
    pub fn finalize(&self, context: &ConditionalContext, draft: ResponseDraft<'_>) -> Finalized {
        self.generator.finalize(&self.validators, context, draft)
    }
}
