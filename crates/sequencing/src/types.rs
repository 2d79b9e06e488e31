//! Sequencing data model: declarations, resolved intervals, timeline context
//! and content references.
//!
//! A [`SegmentDeclaration`] is the validated input a caller writes for one
//! segment. Resolution against a parent and the timeline produces a
//! [`ResolvedInterval`], which is what children, the visibility evaluator and
//! the registry consume.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sq_common::{Layout, SegmentId, SequenceError, SequenceResult};

/// A validated segment declaration.
///
/// `duration_in_frames` is always strictly positive. Construct through
/// [`SegmentDeclaration::new`] or by converting a [`RawDeclaration`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDeclaration", rename_all = "camelCase")]
pub struct SegmentDeclaration {
    from: i64,
    duration_in_frames: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    layout: Layout,
}

impl SegmentDeclaration {
    /// Declare a segment starting `from` frames after its parent's start.
    ///
    /// Fails with [`SequenceError::InvalidDuration`] when `duration_in_frames`
    /// is zero or negative.
    pub fn new(from: i64, duration_in_frames: i64) -> SequenceResult<Self> {
        if duration_in_frames <= 0 {
            return Err(SequenceError::InvalidDuration {
                value: duration_in_frames.to_string(),
            });
        }
        Ok(Self {
            from,
            duration_in_frames,
            name: None,
            layout: Layout::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Offset in frames relative to the parent's absolute start.
    pub fn from(&self) -> i64 {
        self.from
    }

    /// Declared (unclipped) duration.
    pub fn duration_in_frames(&self) -> i64 {
        self.duration_in_frames
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// Loosely-typed declaration as it arrives from JSON or a scripting layer.
///
/// The numeric fields are kept as raw JSON values so that strings, fractions
/// and missing values can be reported as contract violations instead of
/// failing deserialization outright.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeclaration {
    #[serde(default)]
    pub from: Value,
    #[serde(default)]
    pub duration_in_frames: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
}

impl TryFrom<RawDeclaration> for SegmentDeclaration {
    type Error = SequenceError;

    fn try_from(raw: RawDeclaration) -> Result<Self, Self::Error> {
        let duration_in_frames = match as_frame_count(&raw.duration_in_frames) {
            Some(d) if d > 0 => d,
            _ => {
                return Err(SequenceError::InvalidDuration {
                    value: raw.duration_in_frames.to_string(),
                })
            }
        };
        let from = as_frame_count(&raw.from).ok_or_else(|| SequenceError::InvalidOffset {
            value: raw.from.to_string(),
        })?;
        let layout = match raw.layout.as_deref() {
            Some(layout) => layout.parse()?,
            None => Layout::default(),
        };

        Ok(Self {
            from,
            duration_in_frames,
            name: raw.name,
            layout,
        })
    }
}

/// Interpret a JSON value as a whole number of frames.
///
/// Integer-valued floats (`30.0`) are accepted; anything else is not.
fn as_frame_count(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// A segment's position on the root timeline after clipping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInterval {
    pub id: SegmentId,
    /// Start on the root timeline.
    pub absolute_from: i64,
    /// The declared offset, kept for display.
    pub relative_from: i64,
    /// Duration after clipping against the parent and the root timeline.
    /// May be zero or negative when the segment is clipped away entirely.
    pub duration_in_frames: i64,
    /// Duration as declared, before clipping.
    pub declared_duration_in_frames: i64,
}

impl ResolvedInterval {
    /// Exclusive end frame of the clipped interval.
    pub fn end(&self) -> i64 {
        self.absolute_from.saturating_add(self.duration_in_frames)
    }

    /// `true` when clipping left nothing of this segment.
    pub fn is_clipped_away(&self) -> bool {
        self.duration_in_frames <= 0
    }
}

/// Read-only facts about the composition a tree is mounted into.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineContext {
    /// Total composition length. `None` when no composition config is known,
    /// in which case the root duration is treated as zero.
    pub duration_in_frames: Option<i64>,
    /// Identifier of the composition being rendered.
    pub root_id: Option<String>,
    /// Whether this tree renders a thumbnail rather than the main preview.
    pub is_thumbnail: bool,
}

impl TimelineContext {
    pub fn new(duration_in_frames: i64) -> Self {
        Self {
            duration_in_frames: Some(duration_in_frames),
            root_id: None,
            is_thumbnail: false,
        }
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    pub fn thumbnail(mut self) -> Self {
        self.is_thumbnail = true;
        self
    }

    pub fn root_duration(&self) -> i64 {
        self.duration_in_frames.unwrap_or(0)
    }
}

/// Opaque reference to what a segment shows while active.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    /// A named component, e.g. `Title` or `Background`.
    Component { name: String },
    /// Plain text.
    Text { text: String },
}

impl Content {
    pub fn component(name: impl Into<String>) -> Self {
        Content::Component { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }
}
