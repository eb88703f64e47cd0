//! Gesture path tracing: converts a pointer/touch event stream into a
//! monotonic, tolerance-scored progress value along a predefined curved path,
//! and derives the render state for an animated follower.
//!
//! The engine is host-agnostic and renders nothing. The host feeds
//! [`GestureTracer`] raw device-space pointer events together with the
//! on-screen rectangle of the path surface, consumes the notices each call
//! returns, and reads [`GestureTracer::render_state`] when drawing the traced
//! polyline and the follower.

pub mod config;
pub mod follower;
pub mod geometry;
pub mod path;
pub mod session;
pub mod tracer;

pub use config::TracerConfig;
pub use follower::{FollowerMood, FollowerView, TrailPoint, TRAIL_MAX_POINTS};
pub use geometry::{Point, SurfaceRect};
pub use path::{PathModel, PathModelError, Waypoint};
pub use session::{RenderState, SnapshotError, TracePhase, TraceQuality, TraceSnapshot, TracedPoint};
pub use tracer::{GestureTracer, PointerEvent, TraceNotice, TracerOutput};
