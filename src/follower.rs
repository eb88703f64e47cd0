//! Derived state for the animated follower.
//!
//! Everything here is recomputed from the tracer's published state on each
//! render; nothing flows back into the tracer. The follower has no timers of
//! its own.

use heapless::Vec as BoundedVec;

use crate::session::{TraceQuality, TracedPoint};

/// Maximum number of trail entries behind the follower.
pub const TRAIL_MAX_POINTS: usize = 8;

const TRAIL_OLDEST_OPACITY: f32 = 0.125;
const TRAIL_NEWEST_OPACITY: f32 = 1.0;
const TRAIL_OLDEST_SIZE: f32 = 1.5;
const TRAIL_NEWEST_SIZE: f32 = 12.0;

/// Discrete mood of the follower, derived from trace quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowerMood {
    Good,
    Concerned,
}

/// One fading trail entry. Ordered oldest first; the newest entry sits at the
/// follower's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub position: crate::geometry::Point,
    pub opacity: f32,
    pub size: f32,
}

/// The follower's render state: heading, mood, and the fading trail.
pub struct FollowerView {
    heading_rad: f32,
    mood: FollowerMood,
}

impl Default for FollowerView {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowerView {
    pub fn new() -> Self {
        Self {
            heading_rad: 0.0,
            mood: FollowerMood::Good,
        }
    }

    /// Recomputes heading and mood from the tracer's published state.
    pub fn update(&mut self, traced_points: &[TracedPoint], quality: TraceQuality) {
        if let [.., previous, latest] = traced_points {
            let dx = latest.position.x - previous.position.x;
            let dy = latest.position.y - previous.position.y;
            // Coincident points carry no direction; keep the last heading
            // rather than snapping to atan2(0, 0).
            if dx != 0.0 || dy != 0.0 {
                self.heading_rad = dy.atan2(dx);
            }
        }
        self.mood = mood_for(quality);
    }

    /// Heading of the vector between the last two traced points, in radians.
    /// Retains its previous value while fewer than two points exist, so the
    /// follower never visibly snaps back to a default orientation.
    pub fn heading_rad(&self) -> f32 {
        self.heading_rad
    }

    pub fn mood(&self) -> FollowerMood {
        self.mood
    }

    /// The last `TRAIL_MAX_POINTS` traced points, oldest first, with opacity
    /// and size growing linearly toward the newest entry.
    pub fn trail(traced_points: &[TracedPoint]) -> BoundedVec<TrailPoint, TRAIL_MAX_POINTS> {
        let tail_start = traced_points.len().saturating_sub(TRAIL_MAX_POINTS);
        let tail = &traced_points[tail_start..];

        let mut out = BoundedVec::new();
        let count = tail.len();
        for (index, traced) in tail.iter().enumerate() {
            let t = if count > 1 {
                index as f32 / (count - 1) as f32
            } else {
                1.0
            };
            let entry = TrailPoint {
                position: traced.position,
                opacity: TRAIL_OLDEST_OPACITY + t * (TRAIL_NEWEST_OPACITY - TRAIL_OLDEST_OPACITY),
                size: TRAIL_OLDEST_SIZE + t * (TRAIL_NEWEST_SIZE - TRAIL_OLDEST_SIZE),
            };
            // Capacity equals the tail bound, so this cannot overflow.
            let _ = out.push(entry);
        }
        out
    }
}

fn mood_for(quality: TraceQuality) -> FollowerMood {
    match quality {
        TraceQuality::Perfect | TraceQuality::Good | TraceQuality::Okay | TraceQuality::Complete => {
            FollowerMood::Good
        }
        TraceQuality::OffPath => FollowerMood::Concerned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn traced(points: &[(f32, f32)]) -> Vec<TracedPoint> {
        points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| TracedPoint {
                position: Point::new(*x, *y),
                t_ms: i as u64 * 16,
            })
            .collect()
    }

    #[test]
    fn heading_follows_the_last_segment() {
        let mut follower = FollowerView::new();
        follower.update(&traced(&[(0.0, 0.0), (10.0, 0.0)]), TraceQuality::Good);
        assert_eq!(follower.heading_rad(), 0.0);

        follower.update(
            &traced(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
            TraceQuality::Good,
        );
        assert!((follower.heading_rad() - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn heading_is_retained_with_fewer_than_two_points() {
        let mut follower = FollowerView::new();
        follower.update(&traced(&[(0.0, 0.0), (0.0, -10.0)]), TraceQuality::Good);
        let before = follower.heading_rad();

        follower.update(&traced(&[(5.0, 5.0)]), TraceQuality::Good);
        assert_eq!(follower.heading_rad(), before);
        follower.update(&[], TraceQuality::Good);
        assert_eq!(follower.heading_rad(), before);
    }

    #[test]
    fn heading_is_retained_across_coincident_points() {
        let mut follower = FollowerView::new();
        follower.update(&traced(&[(0.0, 0.0), (10.0, 10.0)]), TraceQuality::Good);
        let before = follower.heading_rad();

        follower.update(
            &traced(&[(0.0, 0.0), (10.0, 10.0), (10.0, 10.0)]),
            TraceQuality::Good,
        );
        assert_eq!(follower.heading_rad(), before);
    }

    #[test]
    fn mood_is_concerned_only_off_path() {
        let mut follower = FollowerView::new();
        for quality in [
            TraceQuality::Perfect,
            TraceQuality::Good,
            TraceQuality::Okay,
            TraceQuality::Complete,
        ] {
            follower.update(&[], quality);
            assert_eq!(follower.mood(), FollowerMood::Good, "{quality:?}");
        }
        follower.update(&[], TraceQuality::OffPath);
        assert_eq!(follower.mood(), FollowerMood::Concerned);
    }

    #[test]
    fn trail_is_bounded_and_keeps_the_newest_points() {
        let points = traced(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (5.0, 0.0),
            (6.0, 0.0),
            (7.0, 0.0),
            (8.0, 0.0),
            (9.0, 0.0),
            (10.0, 0.0),
        ]);
        let trail = FollowerView::trail(&points);
        assert_eq!(trail.len(), TRAIL_MAX_POINTS);
        assert_eq!(trail[0].position, Point::new(3.0, 0.0));
        assert_eq!(trail[TRAIL_MAX_POINTS - 1].position, Point::new(10.0, 0.0));
    }

    #[test]
    fn trail_fades_linearly_from_oldest_to_newest() {
        let points = traced(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let trail = FollowerView::trail(&points);
        assert_eq!(trail.len(), 3);

        assert_eq!(trail[0].opacity, 0.125);
        assert_eq!(trail[0].size, 1.5);
        assert_eq!(trail[2].opacity, 1.0);
        assert_eq!(trail[2].size, 12.0);
        assert!(trail[0].opacity < trail[1].opacity && trail[1].opacity < trail[2].opacity);
        assert!(trail[0].size < trail[1].size && trail[1].size < trail[2].size);
    }

    #[test]
    fn single_point_trail_uses_the_newest_styling() {
        let trail = FollowerView::trail(&traced(&[(4.0, 4.0)]));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].opacity, 1.0);
        assert_eq!(trail[0].size, 12.0);
    }

    #[test]
    fn empty_history_yields_an_empty_trail() {
        assert!(FollowerView::trail(&[]).is_empty());
    }
}
