//! `sq-sequencing` — Sequence scheduling for a frame-accurate composition engine.
//!
//! Given a tree of nested segments, each declaring a start offset and a
//! duration relative to its parent, this crate works out for every segment:
//!
//! - **Placement**: its absolute start frame on the root timeline
//! - **Clipping**: its duration after bounding by the parent and the timeline
//! - **Visibility**: whether it is active at a given frame
//! - **Registration**: a live registry entry, kept in sync while mounted and
//!   removed exactly once when unmounted
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sq_common::BoundaryMode;
//! use sq_sequencing::{
//!     InMemoryRegistry, MountedTree, SegmentDeclaration, SegmentNode, TimelineContext,
//! };
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! let root = SegmentNode::new(SegmentDeclaration::new(20, 50).unwrap())
//!     .with_child(SegmentNode::new(SegmentDeclaration::new(40, 30).unwrap()));
//!
//! let tree = MountedTree::mount(&[root], TimelineContext::new(100), registry.clone());
//! assert_eq!(registry.len(), 2);
//!
//! let active = tree.active_at(65, BoundaryMode::Corrected);
//! assert_eq!(active.len(), 2);
//! assert_eq!(active[1].interval.duration_in_frames, 10);
//!
//! drop(tree);
//! assert!(registry.is_empty());
//! ```

pub mod bridge;
pub mod clip_name;
pub mod registry;
pub mod resolver;
pub mod sequence;
pub mod tree;
pub mod types;
pub mod visibility;

// Re-export primary API
pub use bridge::Registration;
pub use clip_name::timeline_clip_name;
pub use registry::{CompositionRegistry, InMemoryRegistry, SegmentEntry, SegmentKind};
pub use resolver::resolve;
pub use sequence::Sequence;
pub use tree::{ActiveSegment, MountedTree, SegmentNode};
pub use types::{Content, RawDeclaration, ResolvedInterval, SegmentDeclaration, TimelineContext};
pub use visibility::{end_threshold, is_active};
