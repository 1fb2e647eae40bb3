//! Host-side dispatcher: one named operation over N ordered inputs, with
//! exactly-once per-index delivery and call-level abort semantics.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use refbridge_errors::{BridgeError, ErrorDetail};
use refbridge_handles::{HandleRegistry, Ownership, RawHandle};

use crate::manager::{ManagerFactory, ManagerInterface};
use crate::sink::CallbackSink;
use crate::types::{ElementError, ElementOutcome, EntityReference, Operation, Settings, TraitsData};

/// Wraps a manager, issuing payload handles for its results and enforcing
/// the delivery contract of the batch protocol.
///
/// The canonical dispatcher is sequential: the calling thread blocks until
/// every index is resolved or a call-level failure aborts the call.
pub struct Dispatcher {
    manager: Arc<dyn ManagerInterface>,
    payloads: Arc<HandleRegistry<TraitsData>>,
}

impl Dispatcher {
    /// Wrap an already-initialized manager.
    pub fn new(manager: Arc<dyn ManagerInterface>, payloads: Arc<HandleRegistry<TraitsData>>) -> Self {
        Self { manager, payloads }
    }

    /// Instantiate `identifier` through `factory` and initialize it with
    /// `settings`. Factory and initialization failures surface as the
    /// call-level errors those collaborators report.
    pub fn connect(
        factory: &dyn ManagerFactory,
        identifier: &str,
        settings: &Settings,
        payloads: Arc<HandleRegistry<TraitsData>>,
    ) -> Result<Self, BridgeError> {
        let manager = factory.instantiate(identifier)?;
        manager.initialize(settings)?;
        debug!(identifier, name = %manager.display_name(), "connected manager");
        Ok(Self::new(manager, payloads))
    }

    pub fn manager(&self) -> &Arc<dyn ManagerInterface> {
        &self.manager
    }

    /// Registry issuing the result payload handles, for `from_handle` and
    /// `release` on the host side.
    pub fn payloads(&self) -> &Arc<HandleRegistry<TraitsData>> {
        &self.payloads
    }

    /// Canonical callback form.
    ///
    /// On success, exactly one of `on_success`/`on_error` was invoked for
    /// every index in `0..inputs.len()`. On a call-level error, indices the
    /// callee had not resolved received no callback and the absence of a
    /// callback carries no meaning.
    pub fn invoke(
        &self,
        operation: &Operation,
        inputs: &[EntityReference],
        sink: &mut dyn CallbackSink,
    ) -> Result<(), BridgeError> {
        self.validate(operation, inputs)?;
        if inputs.is_empty() {
            return Ok(());
        }

        let mut delivered = vec![false; inputs.len()];
        let mut violation: Option<String> = None;
        {
            let payloads = &self.payloads;
            let delivered = &mut delivered;
            let violation = &mut violation;
            let mut deliver = |index: usize, outcome: Result<Arc<TraitsData>, ElementError>| {
                let Some(seen) = delivered.get_mut(index) else {
                    violation.get_or_insert_with(|| {
                        format!("callee delivered an outcome for out-of-range index {index}")
                    });
                    return;
                };
                if *seen {
                    violation.get_or_insert_with(|| {
                        format!("callee delivered more than one outcome for index {index}")
                    });
                    return;
                }
                *seen = true;
                match outcome {
                    Ok(payload) => {
                        let handle = payloads.to_handle(&payload, Ownership::Owning);
                        sink.on_success(index, handle);
                    }
                    Err(err) => {
                        sink.on_error(
                            index,
                            ErrorDetail::batch_element(index, err.code, err.message),
                        );
                    }
                }
            };
            self.manager.invoke(operation, inputs, &mut deliver)?;
        }

        if let Some(message) = violation {
            warn!(operation = operation.name(), %message, "batch protocol violation");
            return Err(BridgeError::Unhandled(message));
        }
        if let Some(missing) = delivered.iter().position(|seen| !seen) {
            let message = format!(
                "callee '{}' returned without resolving index {missing}",
                self.manager.identifier()
            );
            warn!(operation = operation.name(), %message, "batch protocol violation");
            return Err(BridgeError::Unhandled(message));
        }
        Ok(())
    }

    /// Error-collecting adapter: N outcomes aligned 1:1 with input index.
    /// Never raises for per-element failures, only call-level ones. On a
    /// call-level error, handles issued for indices the callee had already
    /// resolved are released before the error propagates.
    pub fn invoke_collecting(
        &self,
        operation: &Operation,
        inputs: &[EntityReference],
    ) -> Result<Vec<ElementOutcome>, BridgeError> {
        let mut sink = CollectingSink {
            outcomes: vec![None; inputs.len()],
        };
        if let Err(err) = self.invoke(operation, inputs, &mut sink) {
            self.release_issued(sink.outcomes.iter().flatten());
            return Err(err);
        }
        // `invoke` guarantees every slot was filled exactly once.
        Ok(sink.outcomes.into_iter().flatten().collect())
    }

    /// Error-converting adapter: the first per-element failure (lowest index,
    /// as dispatch is sequential) is re-raised as a call-level error. Handles
    /// issued for every other index, before and after the failing one, are
    /// released; no result is returned for any index.
    pub fn invoke_converting(
        &self,
        operation: &Operation,
        inputs: &[EntityReference],
    ) -> Result<Vec<RawHandle>, BridgeError> {
        let outcomes = self.invoke_collecting(operation, inputs)?;
        if let Some(detail) = outcomes.iter().find_map(|outcome| match outcome {
            ElementOutcome::Failure(detail) => Some(detail.clone()),
            ElementOutcome::Success(_) => None,
        }) {
            self.release_issued(&outcomes);
            return Err(BridgeError::from_detail(&detail));
        }
        Ok(outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ElementOutcome::Success(handle) => Some(handle),
                ElementOutcome::Failure(_) => None,
            })
            .collect())
    }

    fn release_issued<'a>(&self, outcomes: impl IntoIterator<Item = &'a ElementOutcome>) {
        for outcome in outcomes {
            if let ElementOutcome::Success(handle) = outcome {
                if let Err(err) = self.payloads.release(*handle) {
                    warn!(error = %err, "failed to release payload handle");
                }
            }
        }
    }

    /// Single-element convenience over the converting adapter.
    pub fn invoke_single(
        &self,
        operation: &Operation,
        input: &EntityReference,
    ) -> Result<RawHandle, BridgeError> {
        let handles = self.invoke_converting(operation, std::slice::from_ref(input))?;
        handles.into_iter().next().ok_or_else(|| {
            BridgeError::Unhandled("single-element invocation produced no result".to_string())
        })
    }

    fn validate(
        &self,
        operation: &Operation,
        inputs: &[EntityReference],
    ) -> Result<(), BridgeError> {
        if operation.result_tag() != self.payloads.tag() {
            return Err(BridgeError::Configuration(format!(
                "operation '{}' declares result tag {:?} but the payload registry holds {:?}",
                operation.name(),
                operation.result_tag(),
                self.payloads.tag(),
            )));
        }
        if !self.manager.has_capability(operation.name()) {
            return Err(BridgeError::NotImplemented(format!(
                "manager '{}' does not implement '{}'",
                self.manager.identifier(),
                operation.name(),
            )));
        }
        if let Some(bad) = inputs.iter().find(|reference| !reference.is_valid()) {
            return Err(BridgeError::InputValidation(format!(
                "malformed entity reference '{}'",
                bad.as_str(),
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("manager", &self.manager.identifier())
            .field("payloads", &self.payloads)
            .finish()
    }
}

/// Sink recording outcomes in input order for the collecting adapter.
struct CollectingSink {
    outcomes: Vec<Option<ElementOutcome>>,
}

impl CallbackSink for CollectingSink {
    fn on_success(&mut self, index: usize, payload: RawHandle) {
        if let Some(slot) = self.outcomes.get_mut(index) {
            *slot = Some(ElementOutcome::Success(payload));
        }
    }

    fn on_error(&mut self, index: usize, error: ErrorDetail) {
        if let Some(slot) = self.outcomes.get_mut(index) {
            *slot = Some(ElementOutcome::Failure(error));
        }
    }
}
