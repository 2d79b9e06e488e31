//! Segment trees: declare a hierarchy, mount it top-down, keep it resolved
//! as inputs change, and query which segments are active at a frame.
//!
//! Mounted nodes live in an arena. A child is always stored after its parent,
//! so walking the arena in index order is a valid top-down traversal.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sq_common::{BoundaryMode, Layout, SegmentId};
use tracing::{info, warn};

use crate::registry::CompositionRegistry;
use crate::sequence::Sequence;
use crate::types::{Content, ResolvedInterval, SegmentDeclaration, TimelineContext};

/// Declarative description of a segment and its children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentNode {
    #[serde(flatten)]
    pub declaration: SegmentDeclaration,
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default)]
    pub children: Vec<SegmentNode>,
}

impl SegmentNode {
    pub fn new(declaration: SegmentDeclaration) -> Self {
        Self {
            declaration,
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content.push(content);
        self
    }

    pub fn with_child(mut self, child: SegmentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of segments in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SegmentNode::count).sum::<usize>()
    }
}

/// A segment that produces content at the queried frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSegment<'a> {
    pub id: &'a SegmentId,
    /// 0 for root segments.
    pub depth: usize,
    pub layout: Layout,
    pub interval: &'a ResolvedInterval,
    pub content: &'a [Content],
}

#[derive(Debug)]
struct MountedNode {
    sequence: Sequence,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

/// A mounted segment hierarchy bound to one registry.
///
/// Every mounted segment stays registered, including children of currently
/// inactive segments; the registry lists the whole mounted tree, not only
/// what [`active_at`](MountedTree::active_at) reports.
///
/// Dropping the tree unmounts (and unregisters) every segment.
pub struct MountedTree {
    slots: Vec<Option<MountedNode>>,
    index: HashMap<SegmentId, usize>,
    roots: Vec<usize>,
    timeline: TimelineContext,
    registry: Arc<dyn CompositionRegistry>,
}

impl MountedTree {
    /// Mount `roots` and all their descendants, parents before children.
    pub fn mount(
        roots: &[SegmentNode],
        timeline: TimelineContext,
        registry: Arc<dyn CompositionRegistry>,
    ) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
            timeline,
            registry,
        };
        for node in roots {
            tree.mount_subtree(node, None);
        }
        info!(
            segments = tree.len(),
            root_duration = tree.timeline.root_duration(),
            "Segment tree mounted"
        );
        tree
    }

    pub fn timeline(&self) -> &TimelineContext {
        &self.timeline
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Root segment ids in declaration order.
    pub fn root_ids(&self) -> Vec<&SegmentId> {
        self.roots
            .iter()
            .filter_map(|&i| self.slot(i))
            .map(|n| n.sequence.id())
            .collect()
    }

    pub fn get(&self, id: &SegmentId) -> Option<&Sequence> {
        self.index
            .get(id)
            .and_then(|&i| self.slot(i))
            .map(|n| &n.sequence)
    }

    /// Direct children of `id`, in declaration order.
    pub fn children(&self, id: &SegmentId) -> Vec<&SegmentId> {
        self.index
            .get(id)
            .and_then(|&i| self.slot(i))
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&c| self.slot(c))
                    .map(|c| c.sequence.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All mounted segments, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.slots.iter().flatten().map(|n| &n.sequence)
    }

    /// Swap in a new timeline context and re-resolve everything.
    ///
    /// Returns how many registry entries changed.
    pub fn set_timeline(&mut self, timeline: TimelineContext) -> usize {
        self.timeline = timeline;
        self.refresh()
    }

    /// Replace one segment's declaration and re-resolve top-down.
    ///
    /// Returns `None` if `id` is not mounted, otherwise how many registry
    /// entries changed.
    pub fn set_declaration(
        &mut self,
        id: &SegmentId,
        declaration: SegmentDeclaration,
    ) -> Option<usize> {
        let Some(&idx) = self.index.get(id) else {
            warn!(%id, "set_declaration on unknown segment");
            return None;
        };
        let parent = self.parent_interval(idx);
        let node = self.slots.get_mut(idx).and_then(Option::as_mut)?;
        let own = usize::from(
            node.sequence
                .set_declaration(declaration, parent.as_ref(), &self.timeline),
        );
        Some(own + self.refresh())
    }

    /// Mount a new subtree under `parent` (or as a new root).
    ///
    /// Returns the id of the subtree's top segment, or `None` if `parent` is
    /// not mounted.
    pub fn insert(&mut self, parent: Option<&SegmentId>, node: &SegmentNode) -> Option<SegmentId> {
        let parent_idx = match parent {
            Some(id) => match self.index.get(id) {
                Some(&i) => Some(i),
                None => {
                    warn!(%id, "insert under unknown segment");
                    return None;
                }
            },
            None => None,
        };
        let idx = self.mount_subtree(node, parent_idx);
        self.slot(idx).map(|n| n.sequence.id().clone())
    }

    /// Unmount `id` and its whole subtree. Returns how many segments were unmounted.
    pub fn remove(&mut self, id: &SegmentId) -> usize {
        let Some(&idx) = self.index.get(id) else {
            warn!(%id, "remove on unknown segment");
            return 0;
        };

        match self.slot(idx).and_then(|n| n.parent) {
            Some(p) => {
                if let Some(parent) = self.slots.get_mut(p).and_then(Option::as_mut) {
                    parent.children.retain(|&c| c != idx);
                }
            }
            None => self.roots.retain(|&r| r != idx),
        }

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            if let Some(node) = self.slots.get_mut(i).and_then(Option::take) {
                stack.extend(node.children.iter().copied());
                self.index.remove(node.sequence.id());
                removed += 1;
                // dropping `node` unregisters it
            }
        }
        self.compact();
        removed
    }

    /// Segments that produce content at `frame`, top-down.
    ///
    /// A segment counts only if it is active itself and every ancestor is
    /// active too: an inactive segment shows none of its children.
    pub fn active_at(&self, frame: i64, mode: BoundaryMode) -> Vec<ActiveSegment<'_>> {
        let mut visible = vec![false; self.slots.len()];
        let mut active = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(node) = slot else { continue };
            let ancestors_visible = match node.parent {
                Some(p) => visible[p],
                None => true,
            };
            if ancestors_visible && node.sequence.is_active(frame, mode) {
                visible[i] = true;
                active.push(ActiveSegment {
                    id: node.sequence.id(),
                    depth: node.depth,
                    layout: node.sequence.layout(),
                    interval: node.sequence.interval(),
                    content: node.sequence.content(),
                });
            }
        }
        active
    }

    fn slot(&self, idx: usize) -> Option<&MountedNode> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn parent_interval(&self, idx: usize) -> Option<ResolvedInterval> {
        self.slot(idx)
            .and_then(|n| n.parent)
            .and_then(|p| self.slot(p))
            .map(|p| p.sequence.interval().clone())
    }

    fn mount_subtree(&mut self, node: &SegmentNode, parent: Option<usize>) -> usize {
        let parent_node = parent.and_then(|p| self.slot(p));
        let parent_interval = parent_node.map(|n| n.sequence.interval().clone());
        let depth = parent_node.map_or(0, |n| n.depth + 1);

        let sequence = Sequence::mount(
            node.declaration.clone(),
            node.content.clone(),
            parent_interval.as_ref(),
            &self.timeline,
            Arc::clone(&self.registry),
        );

        let idx = self.slots.len();
        self.index.insert(sequence.id().clone(), idx);
        self.slots.push(Some(MountedNode {
            sequence,
            parent,
            children: Vec::new(),
            depth,
        }));
        match parent {
            Some(p) => {
                if let Some(parent) = self.slots.get_mut(p).and_then(Option::as_mut) {
                    parent.children.push(idx);
                }
            }
            None => self.roots.push(idx),
        }

        for child in &node.children {
            self.mount_subtree(child, Some(idx));
        }
        idx
    }

    /// Drop vacated slots and renumber the survivors.
    ///
    /// Survivors keep their relative order, so parents still precede their
    /// children.
    fn compact(&mut self) {
        let mut remap = vec![None; self.slots.len()];
        let mut next = 0;
        for (old, slot) in self.slots.iter().enumerate() {
            if slot.is_some() {
                remap[old] = Some(next);
                next += 1;
            }
        }

        let mut slots = Vec::with_capacity(next);
        for mut node in std::mem::take(&mut self.slots).into_iter().flatten() {
            node.parent = node.parent.and_then(|p| remap[p]);
            node.children = node.children.iter().filter_map(|&c| remap[c]).collect();
            slots.push(Some(node));
        }
        self.slots = slots;
        self.roots = self.roots.iter().filter_map(|&r| remap[r]).collect();
        for idx in self.index.values_mut() {
            if let Some(new) = remap[*idx] {
                *idx = new;
            }
        }
    }

    /// Re-resolve every segment in arena (top-down) order.
    fn refresh(&mut self) -> usize {
        let mut changed = 0;
        for idx in 0..self.slots.len() {
            let parent = self.parent_interval(idx);
            if let Some(node) = self.slots.get_mut(idx).and_then(Option::as_mut) {
                if node.sequence.update(parent.as_ref(), &self.timeline) {
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl Drop for MountedTree {
    fn drop(&mut self) {
        info!(segments = self.len(), "Segment tree unmounted");
    }
}

impl std::fmt::Debug for MountedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedTree")
            .field("segments", &self.len())
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}
