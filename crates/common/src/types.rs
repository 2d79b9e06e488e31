//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SequenceError;

/// Process-wide counter backing [`SegmentId::generate`].
static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a mounted segment instance.
///
/// Stable for the lifetime of the instance and never shared by two live
/// instances. Identifiers are not persisted across unmounts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub String);

impl SegmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh identifier, unique within this process.
    pub fn generate() -> Self {
        let n = NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("sequence-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a segment's content is wrapped when rendered.
///
/// Only consumed downstream; the sequencing core passes it through untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Content is placed in a full-size, absolutely positioned container.
    #[default]
    AbsoluteFill,
    /// Content is emitted without a wrapper.
    None,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::AbsoluteFill => "absolute-fill",
            Layout::None => "none",
        }
    }
}

impl FromStr for Layout {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute-fill" => Ok(Layout::AbsoluteFill),
            "none" => Ok(Layout::None),
            other => Err(SequenceError::InvalidLayout {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
