//! Interval resolution: place a declared segment on the root timeline and
//! clip its duration.
//!
//! Duration is clamped to the tightest of three bounds:
//! 1. the declared duration,
//! 2. what remains of the root timeline after the declared offset,
//! 3. what remains of the parent's (already clipped) interval after this
//!    segment's absolute start.
//!
//! Because each level reads its parent's clipped interval, clipping composes
//! through any nesting depth without revisiting ancestors further up.

use sq_common::SegmentId;

use crate::types::{ResolvedInterval, SegmentDeclaration};

/// Resolve a declaration against its parent and the root timeline length.
///
/// Pure and deterministic: identical inputs always give identical output.
/// The resulting duration may be zero or negative when the segment is
/// clipped away; that is a valid state, not an error.
pub fn resolve(
    id: SegmentId,
    declaration: &SegmentDeclaration,
    parent: Option<&ResolvedInterval>,
    root_duration_in_frames: i64,
) -> ResolvedInterval {
    let from = declaration.from();
    let absolute_from = parent
        .map_or(0, |p| p.absolute_from)
        .saturating_add(from);

    let root_ceiling = root_duration_in_frames.saturating_sub(from);
    let parent_ceiling = parent.map(|p| {
        p.duration_in_frames
            .saturating_add(p.absolute_from)
            .saturating_sub(absolute_from)
    });

    let duration_in_frames = match parent_ceiling {
        Some(ceiling) => root_ceiling
            .min(ceiling)
            .min(declaration.duration_in_frames()),
        None => root_ceiling.min(declaration.duration_in_frames()),
    };

    ResolvedInterval {
        id,
        absolute_from,
        relative_from: from,
        duration_in_frames,
        declared_duration_in_frames: declaration.duration_in_frames(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(from: i64, duration: i64) -> SegmentDeclaration {
        SegmentDeclaration::new(from, duration).unwrap()
    }

    #[test]
    fn root_segment_keeps_declared_offset() {
        let r = resolve(SegmentId::new("a"), &decl(10, 5), None, 100);
        assert_eq!(r.absolute_from, 10);
        assert_eq!(r.relative_from, 10);
        assert_eq!(r.duration_in_frames, 5);
        assert_eq!(r.declared_duration_in_frames, 5);
    }

    #[test]
    fn root_segment_clipped_by_timeline() {
        let r = resolve(SegmentId::new("a"), &decl(90, 30), None, 100);
        assert_eq!(r.duration_in_frames, 10);
        assert_eq!(r.declared_duration_in_frames, 30);
    }

    #[test]
    fn nested_clipping() {
        let parent = resolve(SegmentId::new("p"), &decl(20, 50), None, 100);
        assert_eq!(parent.absolute_from, 20);
        assert_eq!(parent.duration_in_frames, 50);

        let child = resolve(SegmentId::new("c"), &decl(40, 30), Some(&parent), 100);
        assert_eq!(child.absolute_from, 60);
        assert_eq!(child.relative_from, 40);
        assert_eq!(child.duration_in_frames, 10);
    }

    #[test]
    fn clipping_composes_through_depth() {
        let a = resolve(SegmentId::new("a"), &decl(0, 40), None, 100);
        let b = resolve(SegmentId::new("b"), &decl(10, 100), Some(&a), 100);
        let c = resolve(SegmentId::new("c"), &decl(25, 100), Some(&b), 100);
        assert_eq!(b.end(), 40);
        assert_eq!(c.absolute_from, 35);
        assert_eq!(c.duration_in_frames, 5);
    }

    #[test]
    fn negative_offset_child() {
        let parent = resolve(SegmentId::new("p"), &decl(30, 20), None, 100);
        let child = resolve(SegmentId::new("c"), &decl(-10, 15), Some(&parent), 100);
        assert_eq!(child.absolute_from, 20);
        // parent ends at 50, so 30 frames remain; the declared 15 is tightest
        assert_eq!(child.duration_in_frames, 15);
    }

    #[test]
    fn fully_clipped_segment_has_non_positive_duration() {
        let r = resolve(SegmentId::new("a"), &decl(120, 10), None, 100);
        assert_eq!(r.duration_in_frames, -20);
        assert!(r.is_clipped_away());

        let parent = resolve(SegmentId::new("p"), &decl(0, 10), None, 100);
        let child = resolve(SegmentId::new("c"), &decl(10, 5), Some(&parent), 100);
        assert_eq!(child.duration_in_frames, 0);
    }

    #[test]
    fn zero_root_duration_clips_everything() {
        let r = resolve(SegmentId::new("a"), &decl(0, 30), None, 0);
        assert_eq!(r.duration_in_frames, 0);
    }
}
