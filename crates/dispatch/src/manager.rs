//! Callee-side interfaces: the manager implementing operations and the
//! factory that discovers it.

use std::collections::HashMap;
use std::sync::Arc;

use refbridge_errors::BridgeError;

use crate::types::{ElementError, EntityReference, Operation, Settings, TraitsData};

/// Delivery function handed to a callee: one invocation per resolved index,
/// carrying either the result payload or an expected per-element failure.
pub type Deliver<'a> = dyn FnMut(usize, Result<Arc<TraitsData>, ElementError>) + 'a;

/// Implementation of operations, supplied by a plugin.
///
/// Expected per-element failures flow through `deliver`; the call-level
/// `Result` is reserved for failures that abort the whole batch (malformed
/// arguments, unreachable backend, misconfiguration).
pub trait ManagerInterface: Send + Sync {
    /// Stable identifier, e.g. `org.example.manager`.
    fn identifier(&self) -> String;

    /// Human-readable name for UI and log output.
    fn display_name(&self) -> String;

    /// Free-form descriptive metadata.
    fn info(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Prepare the manager with host-supplied settings.
    fn initialize(&self, settings: &Settings) -> Result<(), BridgeError>;

    /// Whether the named operation is implemented.
    fn has_capability(&self, operation: &str) -> bool;

    /// Apply `operation` to `inputs`, delivering one outcome per index.
    fn invoke(
        &self,
        operation: &Operation,
        inputs: &[EntityReference],
        deliver: &mut Deliver<'_>,
    ) -> Result<(), BridgeError>;
}

/// Discovers and instantiates manager implementations.
///
/// How implementations are located (plugin paths, entry points) is out of
/// scope for the bridge; the dispatcher consumes this interface only.
pub trait ManagerFactory: Send + Sync {
    /// Identifiers of all discoverable managers.
    fn identifiers(&self) -> Vec<String>;

    /// Instantiate the manager registered under `identifier`.
    fn instantiate(&self, identifier: &str) -> Result<Arc<dyn ManagerInterface>, BridgeError>;
}
