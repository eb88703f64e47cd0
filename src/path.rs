//! The waypoint model of the reference path.
//!
//! A `PathModel` is pure data: an ordered list of checkpoints in path
//! coordinate space, each tagged with a cumulative progress value, plus the
//! two capture radii that gate session start and emergency completion. It is
//! validated once at construction and never mutated; the host shares it with
//! the tracer through an `Arc`.

use crate::geometry::Point;

/// An ordered checkpoint on the reference path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// Position in path coordinate space.
    pub position: Point,
    /// Cumulative progress in `0..=100`, non-decreasing along the list; the
    /// last waypoint carries exactly 100.
    pub progress: f32,
    /// Opaque identifier used only for diagnostics.
    pub label: &'static str,
}

impl Waypoint {
    pub const fn new(position: Point, progress: f32, label: &'static str) -> Self {
        Self {
            position,
            progress,
            label,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PathModelError {
    #[error("path needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },
    #[error("waypoint {index} ({label}) has progress {progress}, outside 0..=100")]
    ProgressOutOfRange {
        index: usize,
        label: &'static str,
        progress: f32,
    },
    #[error("waypoint {index} ({label}) decreases progress ({previous} -> {progress})")]
    NonMonotonicProgress {
        index: usize,
        label: &'static str,
        previous: f32,
        progress: f32,
    },
    #[error("last waypoint ({label}) has progress {progress}, expected exactly 100")]
    OpenEnded { label: &'static str, progress: f32 },
}

/// The immutable curved path: ordered waypoints, the logical bounding box the
/// coordinate transform scales against, and the start/end capture radii.
#[derive(Clone, Debug)]
pub struct PathModel {
    waypoints: Vec<Waypoint>,
    logical_size: (f32, f32),
    start_capture_radius: f32,
    end_capture_radius: f32,
}

impl PathModel {
    /// Builds a path model, rejecting degenerate configurations up front: a
    /// malformed waypoint list is a caller bug, not a runtime condition.
    pub fn new(
        waypoints: Vec<Waypoint>,
        logical_size: (f32, f32),
        start_capture_radius: f32,
        end_capture_radius: f32,
    ) -> Result<Self, PathModelError> {
        if waypoints.len() < 2 {
            return Err(PathModelError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        let mut previous = 0.0f32;
        for (index, waypoint) in waypoints.iter().enumerate() {
            if !waypoint.progress.is_finite() || !(0.0..=100.0).contains(&waypoint.progress) {
                return Err(PathModelError::ProgressOutOfRange {
                    index,
                    label: waypoint.label,
                    progress: waypoint.progress,
                });
            }
            if waypoint.progress < previous {
                return Err(PathModelError::NonMonotonicProgress {
                    index,
                    label: waypoint.label,
                    previous,
                    progress: waypoint.progress,
                });
            }
            previous = waypoint.progress;
        }

        let last = waypoints[waypoints.len() - 1];
        if last.progress != 100.0 {
            return Err(PathModelError::OpenEnded {
                label: last.label,
                progress: last.progress,
            });
        }

        Ok(Self {
            waypoints,
            logical_size,
            start_capture_radius,
            end_capture_radius,
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn end(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// The logical bounding box of the path, in path units.
    pub fn logical_size(&self) -> (f32, f32) {
        self.logical_size
    }

    /// How close to waypoint 0 a pointer-down must land to start a session.
    pub fn start_capture_radius(&self) -> f32 {
        self.start_capture_radius
    }

    /// How close to the final waypoint a pointer must come to force
    /// completion regardless of target bookkeeping.
    pub fn end_capture_radius(&self) -> f32 {
        self.end_capture_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(x: f32, y: f32, progress: f32, label: &'static str) -> Waypoint {
        Waypoint::new(Point::new(x, y), progress, label)
    }

    #[test]
    fn valid_model_exposes_waypoints_in_order() {
        let model = PathModel::new(
            vec![
                wp(0.0, 0.0, 0.0, "start"),
                wp(50.0, 0.0, 50.0, "mid"),
                wp(100.0, 0.0, 100.0, "end"),
            ],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .unwrap();

        assert_eq!(model.waypoints().len(), 3);
        assert_eq!(model.start().label, "start");
        assert_eq!(model.end().label, "end");
        assert_eq!(model.last_index(), 2);
        assert_eq!(model.start_capture_radius(), 30.0);
        assert_eq!(model.end_capture_radius(), 25.0);
    }

    #[test]
    fn single_waypoint_is_rejected() {
        let err = PathModel::new(
            vec![wp(0.0, 0.0, 100.0, "only")],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .unwrap_err();
        assert_eq!(err, PathModelError::TooFewWaypoints { count: 1 });
    }

    #[test]
    fn decreasing_progress_is_rejected() {
        let err = PathModel::new(
            vec![
                wp(0.0, 0.0, 0.0, "start"),
                wp(40.0, 0.0, 60.0, "a"),
                wp(60.0, 0.0, 40.0, "b"),
                wp(100.0, 0.0, 100.0, "end"),
            ],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PathModelError::NonMonotonicProgress { index: 2, .. }
        ));
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        let err = PathModel::new(
            vec![wp(0.0, 0.0, -1.0, "start"), wp(100.0, 0.0, 100.0, "end")],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PathModelError::ProgressOutOfRange { index: 0, .. }
        ));
    }

    #[test]
    fn path_not_ending_at_100_is_rejected() {
        let err = PathModel::new(
            vec![wp(0.0, 0.0, 0.0, "start"), wp(100.0, 0.0, 90.0, "end")],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PathModelError::OpenEnded {
                label: "end",
                progress: 90.0
            }
        );
    }

    #[test]
    fn plateau_progress_is_allowed() {
        assert!(PathModel::new(
            vec![
                wp(0.0, 0.0, 0.0, "start"),
                wp(30.0, 0.0, 50.0, "a"),
                wp(60.0, 0.0, 50.0, "b"),
                wp(100.0, 0.0, 100.0, "end"),
            ],
            (100.0, 100.0),
            30.0,
            25.0,
        )
        .is_ok());
    }
}
