//! Coordinate types and the device-to-path-space transform.
//!
//! Proximity checks throughout the engine compare squared distances against
//! squared radii, so no square root is taken on the pointer-move hot path.

/// A 2D point. Whether it is in device pixels or path units depends on the
/// call site; [`SurfaceRect::to_path_space`] is the only bridge between the
/// two spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub(crate) fn squared_distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// The on-screen rendered bounding box of the path surface, in device pixels.
///
/// Supplied with every pointer event and consumed immediately; the transform
/// is recomputed per event so window resizes between events are tolerated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Maps a device-pixel coordinate into path space by scaling with the
    /// ratio of the path's logical bounding box to this rendered box.
    ///
    /// Returns `None` when the rect is degenerate (non-positive extent);
    /// events against such a surface are dropped by the tracer.
    pub fn to_path_space(&self, device: Point, logical_size: (f32, f32)) -> Option<Point> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let (logical_w, logical_h) = logical_size;
        Some(Point {
            x: (device.x - self.left) * logical_w / self.width,
            y: (device.y - self.top) * logical_h / self.height,
        })
    }
}
