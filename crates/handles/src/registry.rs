//! Handle registry: checked conversion between native objects and tokens.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use crate::errors::{HandleError, Result};
use crate::types::{Ownership, RawHandle, TypeTag};

enum Slot<T: ?Sized> {
    Owning { object: Arc<T>, retain: usize },
    Borrowed { object: Weak<T> },
    /// Tombstone kept after the final release so a further release is
    /// reported as a double release instead of an unknown handle.
    Released,
}

/// Converts between native object references and opaque tokens for one
/// exposed object kind.
///
/// All operations are atomic per handle and safe under concurrent invocation
/// from multiple threads. Identities are allocated monotonically and never
/// reused within a registry.
pub struct HandleRegistry<T: ?Sized> {
    tag: TypeTag,
    next_identity: AtomicU64,
    slots: RwLock<HashMap<u64, Slot<T>>>,
}

impl<T: ?Sized> HandleRegistry<T> {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            next_identity: AtomicU64::new(1),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// The immutable tag checked on every conversion.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Issue a token for `object`.
    ///
    /// Owning handles keep the object alive until fully released. Borrowed
    /// handles hold no retention: once the issuer drops its last strong
    /// reference the token stops resolving.
    pub fn to_handle(&self, object: &Arc<T>, mode: Ownership) -> RawHandle {
        let identity = self.next_identity.fetch_add(1, Ordering::Relaxed);
        let slot = match mode {
            Ownership::Owning => Slot::Owning {
                object: Arc::clone(object),
                retain: 1,
            },
            Ownership::Borrowed => Slot::Borrowed {
                object: Arc::downgrade(object),
            },
        };
        self.slots.write().insert(identity, slot);
        debug!(tag = self.tag.raw(), identity, mode = ?mode, "issued handle");
        RawHandle {
            type_tag: self.tag,
            identity,
        }
    }

    /// Convert a token back to a typed reference.
    pub fn from_handle(&self, handle: RawHandle) -> Result<Arc<T>> {
        self.check_tag(handle)?;
        let slots = self.slots.read();
        match slots.get(&handle.identity) {
            Some(Slot::Owning { object, .. }) => Ok(Arc::clone(object)),
            Some(Slot::Borrowed { object }) => {
                object.upgrade().ok_or(HandleError::InvalidHandle {
                    identity: handle.identity,
                })
            }
            Some(Slot::Released) | None => Err(HandleError::InvalidHandle {
                identity: handle.identity,
            }),
        }
    }

    /// Add a reference to a live owning handle.
    ///
    /// Borrowed handles carry no retention to add to; retaining one is
    /// reported as an invalid handle, as is retaining after full release.
    pub fn retain(&self, handle: RawHandle) -> Result<()> {
        self.check_tag(handle)?;
        let mut slots = self.slots.write();
        match slots.get_mut(&handle.identity) {
            Some(Slot::Owning { retain, .. }) => {
                *retain += 1;
                Ok(())
            }
            _ => Err(HandleError::InvalidHandle {
                identity: handle.identity,
            }),
        }
    }

    /// Release one reference.
    ///
    /// Owning: decrements the retain count; at zero the stored reference is
    /// dropped and the object destroyed if nothing else holds it. Borrowed:
    /// removes bookkeeping only. A release after the count already reached
    /// zero is reported as [`HandleError::DoubleRelease`].
    pub fn release(&self, handle: RawHandle) -> Result<()> {
        self.check_tag(handle)?;
        let mut slots = self.slots.write();
        let Some(slot) = slots.get_mut(&handle.identity) else {
            return Err(HandleError::InvalidHandle {
                identity: handle.identity,
            });
        };
        match slot {
            Slot::Owning { retain, .. } => {
                *retain -= 1;
                let exhausted = *retain == 0;
                if exhausted {
                    *slot = Slot::Released;
                    debug!(tag = self.tag.raw(), identity = handle.identity, "released handle");
                }
                Ok(())
            }
            Slot::Borrowed { .. } => {
                *slot = Slot::Released;
                Ok(())
            }
            Slot::Released => Err(HandleError::DoubleRelease {
                identity: handle.identity,
            }),
        }
    }

    /// Number of handles that still resolve.
    pub fn live_count(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| match slot {
                Slot::Owning { .. } => true,
                Slot::Borrowed { object } => object.strong_count() > 0,
                Slot::Released => false,
            })
            .count()
    }

    fn check_tag(&self, handle: RawHandle) -> Result<()> {
        if handle.type_tag != self.tag {
            return Err(HandleError::TypeMismatch {
                expected: self.tag,
                actual: handle.type_tag,
            });
        }
        Ok(())
    }
}

impl<T: ?Sized> fmt::Debug for HandleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("tag", &self.tag)
            .field("live", &self.live_count())
            .finish()
    }
}
