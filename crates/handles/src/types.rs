//! Token types for the handle bridge.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Immutable tag identifying the object kind a registry exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag(u32);

static NEXT_TAG: AtomicU32 = AtomicU32::new(1);

impl TypeTag {
    /// Tag with an explicitly chosen value, for kinds with a stable ABI tag.
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Allocate a process-unique tag.
    pub fn next() -> Self {
        Self(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Fixed-size opaque token referring to exactly one native object.
///
/// Identity and equality are stable for the referenced object's lifetime;
/// identity 0 is never issued and never refers to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawHandle {
    pub type_tag: TypeTag,
    pub identity: u64,
}

impl RawHandle {
    /// Token that refers to no object.
    pub const fn null(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            identity: 0,
        }
    }

    pub fn is_null(self) -> bool {
        self.identity == 0
    }
}

/// Who is responsible for keeping the referenced object alive.
///
/// Fixed at handle creation and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    /// The registry retains the object while any owning reference exists.
    Owning,
    /// The registry performs no retention; validity is the issuer's problem.
    Borrowed,
}
