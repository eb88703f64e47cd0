//! Tunable matching tolerances for the tracer.

/// Outer matching tolerance around the current target waypoint, in path units.
/// A pointer farther than this from the target is off-path.
pub const TRACE_MATCH_TOLERANCE_UNITS: f32 = 28.0;
/// Inside this radius a match counts as perfect.
pub const TRACE_TIGHT_TOLERANCE_UNITS: f32 = 10.0;
/// Inside this radius (but outside tight) a match counts as good; between
/// medium and the outer tolerance it is merely okay.
pub const TRACE_MEDIUM_TOLERANCE_UNITS: f32 = 18.0;

/// Matching tolerances, supplied once at tracer construction and immutable
/// mid-session. Tiers are expected to nest: `tight < medium < match`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracerConfig {
    pub match_tolerance: f32,
    pub tight_tolerance: f32,
    pub medium_tolerance: f32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            match_tolerance: TRACE_MATCH_TOLERANCE_UNITS,
            tight_tolerance: TRACE_TIGHT_TOLERANCE_UNITS,
            medium_tolerance: TRACE_MEDIUM_TOLERANCE_UNITS,
        }
    }
}
