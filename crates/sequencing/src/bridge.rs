//! Registration bridge: keeps one registry entry alive for the lifetime of a
//! segment instance.
//!
//! A [`Registration`] registers on creation, re-registers under the same id
//! whenever the payload changes, and unregisters exactly once when dropped.
//! Since release happens in `Drop`, every exit path (explicit unmount, an
//! owner dropping early, unwinding) unregisters.

use std::sync::Arc;

use sq_common::SegmentId;
use tracing::debug;

use crate::registry::{CompositionRegistry, SegmentEntry};

/// Scoped ownership of a single registry entry.
pub struct Registration {
    registry: Arc<dyn CompositionRegistry>,
    entry: SegmentEntry,
}

impl Registration {
    /// Register `entry` and take ownership of its id.
    pub fn acquire(registry: Arc<dyn CompositionRegistry>, entry: SegmentEntry) -> Self {
        debug!(
            id = %entry.id,
            absolute_from = entry.absolute_from,
            duration = entry.duration,
            "Segment registered"
        );
        registry.register_segment(entry.clone());
        Self { registry, entry }
    }

    pub fn id(&self) -> &SegmentId {
        &self.entry.id
    }

    /// The payload last sent to the registry.
    pub fn entry(&self) -> &SegmentEntry {
        &self.entry
    }

    /// Bring the registry up to date with `entry`.
    ///
    /// Returns `true` if the registry was called. An unchanged payload is a
    /// no-op. The id always stays the one this registration was acquired with.
    pub fn sync(&mut self, mut entry: SegmentEntry) -> bool {
        debug_assert_eq!(entry.id, self.entry.id, "registration id must not change");
        entry.id = self.entry.id.clone();
        if entry == self.entry {
            return false;
        }
        debug!(
            id = %entry.id,
            absolute_from = entry.absolute_from,
            duration = entry.duration,
            "Segment re-registered"
        );
        self.registry.register_segment(entry.clone());
        self.entry = entry;
        true
    }

    /// Unregister now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister_segment(&self.entry.id);
        debug!(id = %self.entry.id, "Segment unregistered");
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}
