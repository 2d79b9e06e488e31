//! A mounted segment instance: declaration + resolved interval + live
//! registry entry.
//!
//! ```text
//! mount ──▶ resolve ──▶ register
//!   │
//! update / set_declaration / set_content ──▶ resolve ──▶ re-register (if changed)
//!   │
//! drop / unmount ──▶ unregister (exactly once)
//! ```

use std::sync::Arc;

use sq_common::{BoundaryMode, Layout, SegmentId};

use crate::bridge::Registration;
use crate::clip_name::timeline_clip_name;
use crate::registry::{CompositionRegistry, SegmentEntry, SegmentKind};
use crate::resolver::resolve;
use crate::types::{Content, ResolvedInterval, SegmentDeclaration, TimelineContext};
use crate::visibility;

/// One live segment.
///
/// The parent's resolved interval is passed in explicitly on every
/// (re)resolution; a `Sequence` never looks it up on its own.
#[derive(Debug)]
pub struct Sequence {
    declaration: SegmentDeclaration,
    content: Vec<Content>,
    interval: ResolvedInterval,
    registration: Registration,
}

impl Sequence {
    /// Create a segment instance with a fresh id, resolve it and register it.
    ///
    /// `parent` must already be resolved (and registered).
    pub fn mount(
        declaration: SegmentDeclaration,
        content: Vec<Content>,
        parent: Option<&ResolvedInterval>,
        timeline: &TimelineContext,
        registry: Arc<dyn CompositionRegistry>,
    ) -> Self {
        let id = SegmentId::generate();
        let interval = resolve(id, &declaration, parent, timeline.root_duration());
        let entry = registry_entry(&declaration, &content, &interval, parent, timeline);
        let registration = Registration::acquire(registry, entry);
        Self {
            declaration,
            content,
            interval,
            registration,
        }
    }

    pub fn id(&self) -> &SegmentId {
        &self.interval.id
    }

    pub fn declaration(&self) -> &SegmentDeclaration {
        &self.declaration
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    pub fn interval(&self) -> &ResolvedInterval {
        &self.interval
    }

    pub fn layout(&self) -> Layout {
        self.declaration.layout()
    }

    /// Name as shown in the registry: the declared name, or one derived
    /// from the content.
    pub fn display_name(&self) -> &str {
        &self.registration.entry().display_name
    }

    /// Re-resolve after the parent interval or timeline changed.
    ///
    /// Returns `true` if the registry entry was updated.
    pub fn update(&mut self, parent: Option<&ResolvedInterval>, timeline: &TimelineContext) -> bool {
        self.interval = resolve(
            self.interval.id.clone(),
            &self.declaration,
            parent,
            timeline.root_duration(),
        );
        let entry = registry_entry(
            &self.declaration,
            &self.content,
            &self.interval,
            parent,
            timeline,
        );
        self.registration.sync(entry)
    }

    /// Replace the declaration and re-resolve under the same id.
    pub fn set_declaration(
        &mut self,
        declaration: SegmentDeclaration,
        parent: Option<&ResolvedInterval>,
        timeline: &TimelineContext,
    ) -> bool {
        self.declaration = declaration;
        self.update(parent, timeline)
    }

    /// Replace the content (which may change the derived display name).
    pub fn set_content(
        &mut self,
        content: Vec<Content>,
        parent: Option<&ResolvedInterval>,
        timeline: &TimelineContext,
    ) -> bool {
        self.content = content;
        self.update(parent, timeline)
    }

    pub fn is_active(&self, frame: i64, mode: BoundaryMode) -> bool {
        visibility::is_active(&self.interval, frame, mode)
    }

    /// Content to show at `frame`, or `None` while inactive.
    pub fn content_at(&self, frame: i64, mode: BoundaryMode) -> Option<&[Content]> {
        self.is_active(frame, mode).then_some(self.content.as_slice())
    }

    /// Leave scope now. Equivalent to dropping.
    pub fn unmount(self) {
        drop(self);
    }
}

fn registry_entry(
    declaration: &SegmentDeclaration,
    content: &[Content],
    interval: &ResolvedInterval,
    parent: Option<&ResolvedInterval>,
    timeline: &TimelineContext,
) -> SegmentEntry {
    let display_name = declaration
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| timeline_clip_name(content));

    SegmentEntry {
        id: interval.id.clone(),
        from: interval.relative_from,
        absolute_from: interval.absolute_from,
        duration: interval.duration_in_frames,
        parent: parent.map(|p| p.id.clone()),
        display_name,
        kind: SegmentKind::Sequence,
        is_thumbnail: timeline.is_thumbnail,
        root_id: timeline.root_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;

    fn decl(from: i64, duration: i64) -> SegmentDeclaration {
        SegmentDeclaration::new(from, duration).unwrap()
    }

    #[test]
    fn mount_registers_with_context_flags() {
        let registry = Arc::new(InMemoryRegistry::new());
        let timeline = TimelineContext::new(100).with_root_id("main").thumbnail();
        let seq = Sequence::mount(
            decl(10, 5).with_name("Intro"),
            Vec::new(),
            None,
            &timeline,
            registry.clone(),
        );

        let entry = registry.get(seq.id()).unwrap();
        assert_eq!(entry.display_name, "Intro");
        assert_eq!(entry.from, 10);
        assert_eq!(entry.absolute_from, 10);
        assert_eq!(entry.duration, 5);
        assert_eq!(entry.parent, None);
        assert_eq!(entry.kind, SegmentKind::Sequence);
        assert!(entry.is_thumbnail);
        assert_eq!(entry.root_id.as_deref(), Some("main"));
    }

    #[test]
    fn child_entry_points_at_parent() {
        let registry = Arc::new(InMemoryRegistry::new());
        let timeline = TimelineContext::new(100);
        let parent = Sequence::mount(decl(20, 50), Vec::new(), None, &timeline, registry.clone());
        let child = Sequence::mount(
            decl(40, 30),
            vec![Content::component("Title")],
            Some(parent.interval()),
            &timeline,
            registry.clone(),
        );

        let entry = registry.get(child.id()).unwrap();
        assert_eq!(entry.parent.as_ref(), Some(parent.id()));
        assert_eq!(entry.absolute_from, 60);
        assert_eq!(entry.duration, 10);
        assert_eq!(child.display_name(), "Title");
    }

    #[test]
    fn update_with_same_inputs_is_noop() {
        let registry = Arc::new(InMemoryRegistry::new());
        let timeline = TimelineContext::new(100);
        let mut seq = Sequence::mount(decl(0, 30), Vec::new(), None, &timeline, registry.clone());
        let before = seq.interval().clone();

        assert!(!seq.update(None, &timeline));
        assert_eq!(seq.interval(), &before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn timeline_change_re_registers_under_same_id() {
        let registry = Arc::new(InMemoryRegistry::new());
        let mut seq = Sequence::mount(
            decl(0, 30),
            Vec::new(),
            None,
            &TimelineContext::new(100),
            registry.clone(),
        );
        let id = seq.id().clone();

        assert!(seq.update(None, &TimelineContext::new(20)));
        assert_eq!(seq.id(), &id);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&id).unwrap().duration, 20);
    }

    #[test]
    fn set_declaration_and_content() {
        let registry = Arc::new(InMemoryRegistry::new());
        let timeline = TimelineContext::new(100);
        let mut seq = Sequence::mount(decl(0, 30), Vec::new(), None, &timeline, registry.clone());
        assert_eq!(seq.display_name(), "");

        assert!(seq.set_content(vec![Content::component("Logo")], None, &timeline));
        assert_eq!(seq.display_name(), "Logo");

        assert!(seq.set_declaration(decl(5, 10).with_layout(Layout::None), None, &timeline));
        assert_eq!(seq.layout(), Layout::None);
        assert_eq!(seq.interval().absolute_from, 5);
        assert_eq!(registry.get(seq.id()).unwrap().absolute_from, 5);
    }

    #[test]
    fn content_only_while_active() {
        let registry = Arc::new(InMemoryRegistry::new());
        let seq = Sequence::mount(
            decl(10, 5),
            vec![Content::text("hi")],
            None,
            &TimelineContext::new(100),
            registry,
        );
        assert!(seq.content_at(9, BoundaryMode::Corrected).is_none());
        assert_eq!(seq.content_at(10, BoundaryMode::Corrected).unwrap().len(), 1);
        assert!(seq.content_at(15, BoundaryMode::Corrected).is_none());
        assert!(seq.content_at(15, BoundaryMode::Legacy).is_some());
    }

    #[test]
    fn unmount_unregisters() {
        let registry = Arc::new(InMemoryRegistry::new());
        let seq = Sequence::mount(
            decl(0, 10),
            Vec::new(),
            None,
            &TimelineContext::new(100),
            registry.clone(),
        );
        assert_eq!(registry.len(), 1);
        seq.unmount();
        assert!(registry.is_empty());
    }
}
