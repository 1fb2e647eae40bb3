//! Opaque handle bridge for the refbridge interop layer.
//!
//! Native objects cross the runtime boundary as fixed-size tokens holding a
//! type tag and an identity, never as raw pointers. Every conversion back to
//! a typed reference is a checked table lookup, so layout exposure and type
//! confusion are impossible by construction.

pub mod errors;
pub mod registry;
pub mod types;

pub use errors::HandleError;
pub use registry::HandleRegistry;
pub use types::{Ownership, RawHandle, TypeTag};
