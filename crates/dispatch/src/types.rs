//! Boundary value types for batch invocation.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use refbridge_errors::{ElementErrorCode, ErrorDetail};
use refbridge_handles::{RawHandle, TypeTag};

/// Reference to an entity held by a callee, e.g. `ref://shots/042`.
///
/// The string is opaque to the bridge apart from the scheme-prefix format
/// check; its meaning belongs to the manager that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference(String);

impl EntityReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A reference must carry a scheme prefix (`<scheme>://<body>`).
    pub fn is_valid(&self) -> bool {
        match self.0.split_once("://") {
            Some((scheme, body)) => {
                !scheme.is_empty()
                    && !body.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            }
            None => false,
        }
    }
}

/// Trait-keyed property container carried as the result payload and as
/// operation parameters.
///
/// The bridge never inspects the contents; hosts and managers agree on the
/// trait vocabulary out of band. Property access is internally synchronized
/// so a payload may be shared across callback threads.
#[derive(Debug, Default)]
pub struct TraitsData {
    properties: RwLock<HashMap<String, HashMap<String, serde_json::Value>>>,
}

impl TraitsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, trait_id: &str, property: &str, value: serde_json::Value) {
        self.properties
            .write()
            .entry(trait_id.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    pub fn get(&self, trait_id: &str, property: &str) -> Option<serde_json::Value> {
        self.properties
            .read()
            .get(trait_id)
            .and_then(|props| props.get(property))
            .cloned()
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.properties.read().contains_key(trait_id)
    }

    pub fn trait_ids(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }
}

/// Stateless descriptor of a named capability and its declared result tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    result_tag: TypeTag,
}

impl Operation {
    pub fn new(name: impl Into<String>, result_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            result_tag,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result_tag(&self) -> TypeTag {
        self.result_tag
    }
}

/// Manager configuration supplied at connection time.
pub type Settings = HashMap<String, String>;

/// Expected per-element failure reported by a callee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementError {
    pub code: ElementErrorCode,
    pub message: String,
}

impl ElementError {
    pub fn new(code: ElementErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Per-index result as seen by the caller, aligned 1:1 with input index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    Success(RawHandle),
    Failure(ErrorDetail),
}
