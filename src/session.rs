//! Session-level value types: traced points, quality tiers, lifecycle phase,
//! the wholesale snapshot, and the borrowed render view.

use crate::geometry::Point;

/// One recorded pointer position, in path units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TracedPoint {
    pub position: Point,
    pub t_ms: u64,
}

/// How closely the pointer matched the current target waypoint. Oscillates
/// freely frame to frame; `Complete` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceQuality {
    Perfect,
    Good,
    Okay,
    OffPath,
    Complete,
}

/// Lifecycle phase of the tracer, mirroring its internal state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TracePhase {
    #[default]
    Idle,
    Tracing,
    Paused,
    Completed,
}

/// Why a snapshot was refused by [`crate::GestureTracer::restore`]. A
/// persisted snapshot can outlive the path model it was captured against, so
/// restore checks it the same way `PathModel` checks its own construction.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot targets waypoint {current_target}, path ends at index {last_index}")]
    TargetOutOfRange {
        current_target: usize,
        last_index: usize,
    },
    #[error("snapshot progress {progress} is outside 0..=100")]
    ProgressOutOfRange { progress: f32 },
}

/// A wholesale capture of one tracing session. Replaces scattered
/// initial-value plumbing: capture with [`crate::GestureTracer::snapshot`],
/// restore into a tracer built against the same path model with
/// [`crate::GestureTracer::restore`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceSnapshot {
    pub traced_points: Vec<TracedPoint>,
    pub current_target: usize,
    pub progress: f32,
    pub quality: TraceQuality,
    pub phase: TracePhase,
}

/// Read-only view of the live session for the host's renderer: the traced
/// polyline, the follower anchor, and the current quality.
#[derive(Clone, Copy, Debug)]
pub struct RenderState<'a> {
    pub traced_points: &'a [TracedPoint],
    pub current_position: Option<Point>,
    pub quality: TraceQuality,
    pub is_active: bool,
}
