//! The gesture tracer: a pointer/touch event stream in, monotonic progress
//! and quality out.
//!
//! Matching is sequential single-target: each move is scored against the one
//! waypoint the user must approach next, never against the nearest waypoint.
//! Cutting a corner straight toward the goal therefore scores off-path until
//! the pointer actually reaches the skipped checkpoint, which is the point of
//! the exercise: the user is being taught to follow the curve.
//!
//! The session lifecycle is a statig state machine (`idle` -> `tracing` ->
//! `paused`/`completed`); every dispatch collects its notices into fixed
//! slots and returns them to the host, which owns all composition. There are
//! no registered callbacks and no global hooks.

use std::sync::Arc;

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::{
    config::TracerConfig,
    geometry::{squared_distance, Point, SurfaceRect},
    path::PathModel,
    session::{RenderState, SnapshotError, TracePhase, TraceQuality, TraceSnapshot, TracedPoint},
};

/// One raw pointer/touch event in device pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub t_ms: u64,
}

impl PointerEvent {
    pub const fn new(x: f32, y: f32, t_ms: u64) -> Self {
        Self {
            position: Point::new(x, y),
            t_ms,
        }
    }
}

/// Notices emitted toward the host. At most one `SessionStarted`, `Paused`
/// and `Completed` per session; `Progress` fires on every handled move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceNotice {
    SessionStarted,
    Progress { progress: f32, quality: TraceQuality },
    Paused { progress: f32 },
    Completed,
}

/// Notices produced by one dispatched event, in emission order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracerOutput {
    pub notices: [Option<TraceNotice>; 3],
}

impl TracerOutput {
    pub fn iter(&self) -> impl Iterator<Item = TraceNotice> + '_ {
        self.notices.iter().copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.iter().all(Option::is_none)
    }
}

#[derive(Clone, Debug)]
enum TracerHsmEvent {
    Down { point: Point, t_ms: u64 },
    Move { point: Point, t_ms: u64 },
    Up { t_ms: u64 },
    ForceComplete,
    Reset,
    Restore(TraceSnapshot),
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    notices: [Option<TraceNotice>; 3],
}

impl DispatchContext {
    fn emit(&mut self, notice: TraceNotice) {
        for slot in &mut self.notices {
            if slot.is_none() {
                *slot = Some(notice);
                return;
            }
        }
    }

    fn finish(self) -> TracerOutput {
        TracerOutput {
            notices: self.notices,
        }
    }
}

/// The public tracer. Owns exactly one session; one tracer drives one path
/// and one follower. All operations complete synchronously before returning.
pub struct GestureTracer {
    machine: statig::blocking::StateMachine<TracerHsm>,
    enabled: bool,
}

impl GestureTracer {
    pub fn new(path: Arc<PathModel>, config: TracerConfig) -> Self {
        Self {
            machine: TracerHsm::new(path, config).state_machine(),
            enabled: true,
        }
    }

    /// Pointer down in device space. Starts a session only when the tracer is
    /// enabled, no session is active, and the transformed point lands within
    /// the start capture radius of waypoint 0.
    pub fn on_pointer_down(&mut self, event: PointerEvent, surface: SurfaceRect) -> TracerOutput {
        if !self.enabled {
            return TracerOutput::default();
        }
        let Some(point) = self.to_path_space(event.position, surface) else {
            return TracerOutput::default();
        };
        self.dispatch(TracerHsmEvent::Down {
            point,
            t_ms: event.t_ms,
        })
    }

    /// Pointer move in device space. A no-op unless a session is active.
    pub fn on_pointer_move(&mut self, event: PointerEvent, surface: SurfaceRect) -> TracerOutput {
        let Some(point) = self.to_path_space(event.position, surface) else {
            return TracerOutput::default();
        };
        self.dispatch(TracerHsmEvent::Move {
            point,
            t_ms: event.t_ms,
        })
    }

    /// Pointer up. Suspends an active session, keeping its recorded state
    /// intact; emits `Paused` only for partial progress.
    pub fn on_pointer_up(&mut self, t_ms: u64) -> TracerOutput {
        self.dispatch(TracerHsmEvent::Up { t_ms })
    }

    /// Unconditionally applies the emergency-completion effects. Idempotent:
    /// once completed, further calls emit nothing.
    pub fn force_complete(&mut self) -> TracerOutput {
        self.dispatch(TracerHsmEvent::ForceComplete)
    }

    /// Clears the session back to an idle tracer. Synchronous, infallible.
    pub fn reset(&mut self) {
        let _ = self.dispatch(TracerHsmEvent::Reset);
    }

    /// Captures the whole session for later [`Self::restore`].
    pub fn snapshot(&self) -> TraceSnapshot {
        TraceSnapshot {
            traced_points: self.machine.traced_points.clone(),
            current_target: self.machine.current_target,
            progress: self.machine.progress,
            quality: self.machine.quality,
            phase: self.phase(),
        }
    }

    /// Restores a previously captured session wholesale, replacing whatever
    /// the tracer currently holds. A snapshot that does not fit this path
    /// model (stale persisted state from a changed path) is rejected and the
    /// tracer is left untouched.
    pub fn restore(&mut self, snapshot: TraceSnapshot) -> Result<(), SnapshotError> {
        let last_index = self.machine.path.last_index();
        if snapshot.current_target > last_index {
            return Err(SnapshotError::TargetOutOfRange {
                current_target: snapshot.current_target,
                last_index,
            });
        }
        if !snapshot.progress.is_finite() || !(0.0..=100.0).contains(&snapshot.progress) {
            return Err(SnapshotError::ProgressOutOfRange {
                progress: snapshot.progress,
            });
        }
        let _ = self.dispatch(TracerHsmEvent::Reset);
        let _ = self.dispatch(TracerHsmEvent::Restore(snapshot));
        Ok(())
    }

    /// Gates new sessions; an already-active session is unaffected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> TracePhase {
        match self.machine.state() {
            State::Idle {} => TracePhase::Idle,
            State::Tracing {} => TracePhase::Tracing,
            State::Paused {} => TracePhase::Paused,
            State::Completed {} => TracePhase::Completed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == TracePhase::Tracing
    }

    pub fn progress(&self) -> f32 {
        self.machine.progress
    }

    pub fn quality(&self) -> TraceQuality {
        self.machine.quality
    }

    pub fn current_target(&self) -> usize {
        self.machine.current_target
    }

    pub fn traced_points(&self) -> &[TracedPoint] {
        &self.machine.traced_points
    }

    pub fn current_position(&self) -> Option<Point> {
        self.machine.traced_points.last().map(|p| p.position)
    }

    /// Everything the host needs to draw the polyline and the follower.
    pub fn render_state(&self) -> RenderState<'_> {
        RenderState {
            traced_points: &self.machine.traced_points,
            current_position: self.current_position(),
            quality: self.machine.quality,
            is_active: self.is_active(),
        }
    }

    fn dispatch(&mut self, event: TracerHsmEvent) -> TracerOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.finish()
    }

    // Recomputed per event so the transform tracks surface resizes.
    fn to_path_space(&self, device: Point, surface: SurfaceRect) -> Option<Point> {
        surface.to_path_space(device, self.machine.path.logical_size())
    }
}

struct TracerHsm {
    path: Arc<PathModel>,
    config: TracerConfig,
    traced_points: Vec<TracedPoint>,
    current_target: usize,
    progress: f32,
    quality: TraceQuality,
}

impl TracerHsm {
    fn new(path: Arc<PathModel>, config: TracerConfig) -> Self {
        Self {
            path,
            config,
            traced_points: Vec::new(),
            current_target: 0,
            progress: 0.0,
            quality: TraceQuality::Good,
        }
    }

    fn clear_session(&mut self) {
        self.traced_points.clear();
        self.current_target = 0;
        self.progress = 0.0;
        self.quality = TraceQuality::Good;
    }

    fn within_start_capture(&self, point: Point) -> bool {
        let radius = self.path.start_capture_radius();
        squared_distance(point, self.path.start().position) < radius * radius
    }

    fn begin_session(&mut self, t_ms: u64, context: &mut DispatchContext) {
        self.clear_session();
        // The polyline starts at the marked start point, not at the exact
        // touch coordinate inside the capture radius.
        self.traced_points.push(TracedPoint {
            position: self.path.start().position,
            t_ms,
        });
        self.current_target = 1;
        log::debug!("trace session started at t={t_ms}ms");
        context.emit(TraceNotice::SessionStarted);
    }

    /// Scores one move against the current target waypoint, advances progress
    /// on a match, and checks both completion triggers. Returns `true` when
    /// the session completed on this move.
    fn evaluate_move(&mut self, point: Point, t_ms: u64, context: &mut DispatchContext) -> bool {
        // Off-path points are recorded too; the rendered trail follows the
        // finger faithfully even while the score holds still.
        self.traced_points.push(TracedPoint {
            position: point,
            t_ms,
        });

        let target = self.path.waypoints()[self.current_target];
        let d2 = squared_distance(point, target.position);
        if d2 < self.config.match_tolerance * self.config.match_tolerance {
            self.quality = if d2 < self.config.tight_tolerance * self.config.tight_tolerance {
                TraceQuality::Perfect
            } else if d2 < self.config.medium_tolerance * self.config.medium_tolerance {
                TraceQuality::Good
            } else {
                TraceQuality::Okay
            };
            self.progress = target.progress;
            if self.current_target < self.path.last_index() {
                self.current_target += 1;
            }
        } else {
            // Not an error state: progress simply holds at the last
            // confirmed waypoint and never regresses.
            self.quality = TraceQuality::OffPath;
        }

        if self.progress >= 100.0 {
            self.complete_session(t_ms, context);
            return true;
        }

        // Emergency fallback: the finger is visually at the goal even though
        // target bookkeeping lagged behind (e.g. a jittery skip).
        let end_radius = self.path.end_capture_radius();
        if squared_distance(point, self.path.end().position) < end_radius * end_radius {
            self.complete_session(t_ms, context);
            return true;
        }

        context.emit(TraceNotice::Progress {
            progress: self.progress,
            quality: self.quality,
        });
        false
    }

    fn complete_session(&mut self, t_ms: u64, context: &mut DispatchContext) {
        self.progress = 100.0;
        self.current_target = self.path.last_index();
        self.quality = TraceQuality::Complete;
        // Snap the polyline onto the goal so the drawn trace visually
        // reaches it even when the raw pointer stopped short.
        self.traced_points.push(TracedPoint {
            position: self.path.end().position,
            t_ms,
        });
        log::debug!("trace session completed at t={t_ms}ms");
        context.emit(TraceNotice::Progress {
            progress: self.progress,
            quality: self.quality,
        });
        context.emit(TraceNotice::Completed);
    }

    fn force_completion(&mut self, context: &mut DispatchContext) {
        let t_ms = self.traced_points.last().map_or(0, |p| p.t_ms);
        self.complete_session(t_ms, context);
    }

    fn suspend(&mut self, t_ms: u64, context: &mut DispatchContext) {
        if self.progress > 0.0 && self.progress < 100.0 {
            log::debug!(
                "trace session paused at {:.0}% (t={t_ms}ms)",
                self.progress
            );
            context.emit(TraceNotice::Paused {
                progress: self.progress,
            });
        }
    }

    fn install(&mut self, snapshot: &TraceSnapshot) {
        self.traced_points = snapshot.traced_points.clone();
        self.current_target = snapshot.current_target;
        self.progress = snapshot.progress;
        self.quality = snapshot.quality;
    }
}

#[state_machine(initial = "State::idle()")]
impl TracerHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &TracerHsmEvent) -> Outcome<State> {
        match event {
            TracerHsmEvent::Down { point, t_ms } => {
                if self.within_start_capture(*point) {
                    self.begin_session(*t_ms, context);
                    Transition(State::tracing())
                } else {
                    log::debug!("trace start rejected: outside start capture radius");
                    Handled
                }
            }
            TracerHsmEvent::ForceComplete => {
                self.force_completion(context);
                Transition(State::completed())
            }
            TracerHsmEvent::Reset => {
                self.clear_session();
                Handled
            }
            TracerHsmEvent::Restore(snapshot) => {
                self.install(snapshot);
                match snapshot.phase {
                    TracePhase::Idle => Handled,
                    TracePhase::Tracing => Transition(State::tracing()),
                    TracePhase::Paused => Transition(State::paused()),
                    TracePhase::Completed => Transition(State::completed()),
                }
            }
            // Moves and ups with no session are expected (misordered
            // replays, touches that started outside the surface).
            TracerHsmEvent::Move { .. } | TracerHsmEvent::Up { .. } => Handled,
        }
    }

    #[state]
    fn tracing(&mut self, context: &mut DispatchContext, event: &TracerHsmEvent) -> Outcome<State> {
        match event {
            TracerHsmEvent::Move { point, t_ms } => {
                if self.evaluate_move(*point, *t_ms, context) {
                    Transition(State::completed())
                } else {
                    Handled
                }
            }
            TracerHsmEvent::Up { t_ms } => {
                self.suspend(*t_ms, context);
                Transition(State::paused())
            }
            TracerHsmEvent::ForceComplete => {
                self.force_completion(context);
                Transition(State::completed())
            }
            TracerHsmEvent::Reset => {
                self.clear_session();
                Transition(State::idle())
            }
            // A second pointer-down while tracing is ignored.
            TracerHsmEvent::Down { .. } | TracerHsmEvent::Restore(_) => Handled,
        }
    }

    /// Suspended with the session preserved for status display. There is no
    /// mid-path resume: the only way forward is a fresh start from waypoint 0
    /// or a reset.
    #[state]
    fn paused(&mut self, context: &mut DispatchContext, event: &TracerHsmEvent) -> Outcome<State> {
        match event {
            TracerHsmEvent::Down { point, t_ms } => {
                if self.within_start_capture(*point) {
                    self.begin_session(*t_ms, context);
                    Transition(State::tracing())
                } else {
                    Handled
                }
            }
            TracerHsmEvent::ForceComplete => {
                self.force_completion(context);
                Transition(State::completed())
            }
            TracerHsmEvent::Reset => {
                self.clear_session();
                Transition(State::idle())
            }
            TracerHsmEvent::Move { .. }
            | TracerHsmEvent::Up { .. }
            | TracerHsmEvent::Restore(_) => Handled,
        }
    }

    /// Terminal snapshot of a finished trace. Only `Reset` leaves it, so
    /// `Completed` can never be emitted twice for one session.
    #[state]
    fn completed(
        &mut self,
        context: &mut DispatchContext,
        event: &TracerHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            TracerHsmEvent::Reset => {
                self.clear_session();
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}
