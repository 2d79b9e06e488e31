//! Visibility: is a resolved segment active at a given absolute frame?
//!
//! The upper threshold is computed from the *declared* duration, not the
//! clipped one. Clipping only affects layout and registration, except that a
//! segment clipped away entirely (duration <= 0) is never active.

use sq_common::BoundaryMode;

use crate::types::ResolvedInterval;

/// Last frame (inclusive) on which the segment is considered active.
pub fn end_threshold(interval: &ResolvedInterval, mode: BoundaryMode) -> i64 {
    let end = interval
        .absolute_from
        .saturating_add(interval.declared_duration_in_frames);
    match mode {
        BoundaryMode::Legacy => end,
        BoundaryMode::Corrected => end.saturating_sub(1),
    }
}

/// Whether the segment should produce content at `frame`.
pub fn is_active(interval: &ResolvedInterval, frame: i64, mode: BoundaryMode) -> bool {
    if interval.is_clipped_away() {
        return false;
    }
    frame >= interval.absolute_from && frame <= end_threshold(interval, mode)
}
