//! Batch invocation protocol for the refbridge interop layer.
//!
//! A host invokes one named operation over N ordered inputs. Each element
//! succeeds or fails independently and is delivered through a caller-supplied
//! callback sink, exactly once per index; failures not tied to one element
//! abort the whole call and leave unresolved indices untouched. Result
//! payloads cross the boundary as owning handles issued by the payload
//! registry, never as raw references.

pub mod dispatcher;
pub mod manager;
pub mod sink;
pub mod types;

pub use dispatcher::Dispatcher;
pub use manager::{Deliver, ManagerFactory, ManagerInterface};
pub use sink::{CallbackSink, FnSink};
pub use types::{ElementError, ElementOutcome, EntityReference, Operation, Settings, TraitsData};
