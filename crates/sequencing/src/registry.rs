//! Composition registry — the live listing of every mounted segment.
//!
//! The engine only talks to the registry through [`CompositionRegistry`].
//! Implementations serialize access themselves; each segment instance only
//! ever touches the entry under its own id.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sq_common::SegmentId;
use tracing::warn;

/// Kind of entry in the registry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    #[default]
    Sequence,
}

/// One registered segment, as a timeline UI or exporter sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEntry {
    pub id: SegmentId,
    /// Declared offset relative to the parent.
    pub from: i64,
    /// Start on the root timeline.
    pub absolute_from: i64,
    /// Clipped duration.
    pub duration: i64,
    pub parent: Option<SegmentId>,
    pub display_name: String,
    pub kind: SegmentKind,
    pub is_thumbnail: bool,
    pub root_id: Option<String>,
}

/// Storage for registered segments.
pub trait CompositionRegistry: Send + Sync {
    /// Insert or overwrite the entry for `entry.id`.
    fn register_segment(&self, entry: SegmentEntry);

    /// Remove the entry for `id`, if any.
    fn unregister_segment(&self, id: &SegmentId);
}

#[derive(Default)]
struct Entries {
    /// Ids in first-registration order.
    order: Vec<SegmentId>,
    by_id: HashMap<SegmentId, SegmentEntry>,
}

/// Thread-safe in-memory registry.
///
/// Re-registering an id updates its entry in place and keeps its position
/// in [`list`](InMemoryRegistry::list).
#[derive(Default)]
pub struct InMemoryRegistry {
    entries: RwLock<Entries>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SegmentId) -> Option<SegmentEntry> {
        self.entries.read().by_id.get(id).cloned()
    }

    /// All entries in first-registration order.
    pub fn list(&self) -> Vec<SegmentEntry> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect()
    }

    /// Entries whose parent is `parent` (`None` lists root segments).
    pub fn children_of(&self, parent: Option<&SegmentId>) -> Vec<SegmentEntry> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id))
            .filter(|e| e.parent.as_ref() == parent)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().by_id.is_empty()
    }
}

impl CompositionRegistry for InMemoryRegistry {
    fn register_segment(&self, entry: SegmentEntry) {
        let mut entries = self.entries.write();
        if !entries.by_id.contains_key(&entry.id) {
            entries.order.push(entry.id.clone());
        }
        entries.by_id.insert(entry.id.clone(), entry);
    }

    fn unregister_segment(&self, id: &SegmentId) {
        let mut entries = self.entries.write();
        if entries.by_id.remove(id).is_none() {
            warn!(%id, "Unregister for unknown segment");
            return;
        }
        entries.order.retain(|e| e != id);
    }
}
