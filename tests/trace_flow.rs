//! End-to-end tracing flow through the public API: a curved path rendered at
//! an offset and scale, a finger that wanders, pauses, starts over and then
//! finishes, with the follower fed from the published render state.

use std::sync::Arc;

use curvetrace::{
    FollowerMood, FollowerView, GestureTracer, PathModel, Point, PointerEvent, SurfaceRect,
    TraceNotice, TracePhase, TraceQuality, TracerConfig, Waypoint,
};

fn curved_model() -> Arc<PathModel> {
    // A shallow arc in a 300x200 logical box.
    Arc::new(
        PathModel::new(
            vec![
                Waypoint::new(Point::new(20.0, 160.0), 0.0, "arc-start"),
                Waypoint::new(Point::new(80.0, 90.0), 25.0, "arc-q1"),
                Waypoint::new(Point::new(150.0, 60.0), 50.0, "arc-top"),
                Waypoint::new(Point::new(220.0, 90.0), 75.0, "arc-q3"),
                Waypoint::new(Point::new(280.0, 160.0), 100.0, "arc-end"),
            ],
            (300.0, 200.0),
            30.0,
            24.0,
        )
        .unwrap(),
    )
}

// The path surface as rendered on screen: 1.5x scale, origin at (60, 40).
const SURFACE: SurfaceRect = SurfaceRect::new(60.0, 40.0, 450.0, 300.0);

fn device(path_x: f32, path_y: f32, t_ms: u64) -> PointerEvent {
    PointerEvent::new(60.0 + path_x * 1.5, 40.0 + path_y * 1.5, t_ms)
}

#[test]
fn wander_pause_and_retrace_to_completion() {
    let mut tracer = GestureTracer::new(curved_model(), TracerConfig::default());
    let mut follower = FollowerView::new();
    let mut notices = Vec::new();

    fn feed(
        tracer: &GestureTracer,
        output: curvetrace::TracerOutput,
        notices: &mut Vec<TraceNotice>,
        follower: &mut FollowerView,
    ) {
        notices.extend(output.iter());
        let state = tracer.render_state();
        follower.update(state.traced_points, state.quality);
    }

    // First attempt: start, drift off the arc, give up.
    let out = tracer.on_pointer_down(device(22.0, 158.0, 0), SURFACE);
    feed(&tracer, out, &mut notices, &mut follower);
    let out = tracer.on_pointer_move(device(60.0, 160.0, 16), SURFACE);
    feed(&tracer, out, &mut notices, &mut follower);
    assert_eq!(tracer.quality(), TraceQuality::OffPath);
    assert_eq!(follower.mood(), FollowerMood::Concerned);
    let out = tracer.on_pointer_up(32);
    feed(&tracer, out, &mut notices, &mut follower);
    assert_eq!(tracer.phase(), TracePhase::Paused);
    // No progress was confirmed, so the pause is silent.
    assert!(!notices.iter().any(|n| matches!(n, TraceNotice::Paused { .. })));

    // Second attempt: start over and follow the arc checkpoint by checkpoint.
    let out = tracer.on_pointer_down(device(20.0, 162.0, 100), SURFACE);
    feed(&tracer, out, &mut notices, &mut follower);
    for (i, (x, y)) in [
        (78.0, 92.0),
        (148.0, 62.0),
        (221.0, 88.0),
        (278.0, 158.0),
    ]
    .iter()
    .enumerate()
    {
        let out = tracer.on_pointer_move(device(*x, *y, 120 + i as u64 * 16), SURFACE);
        feed(&tracer, out, &mut notices, &mut follower);
    }

    assert_eq!(tracer.phase(), TracePhase::Completed);
    assert_eq!(tracer.progress(), 100.0);
    assert_eq!(tracer.quality(), TraceQuality::Complete);
    assert_eq!(follower.mood(), FollowerMood::Good);
    assert_eq!(
        notices
            .iter()
            .filter(|n| matches!(n, TraceNotice::SessionStarted))
            .count(),
        2
    );
    assert_eq!(
        notices
            .iter()
            .filter(|n| matches!(n, TraceNotice::Completed))
            .count(),
        1
    );

    // Progress notices were monotonic across the whole run of each session
    // and only ever took waypoint values.
    let progresses: Vec<f32> = notices
        .iter()
        .filter_map(|n| match n {
            TraceNotice::Progress { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect();
    assert!(progresses
        .iter()
        .all(|p| [0.0, 25.0, 50.0, 75.0, 100.0].contains(p)));

    // The polyline ends exactly on the goal and the trail is bounded.
    let state = tracer.render_state();
    assert_eq!(state.current_position, Some(Point::new(280.0, 160.0)));
    assert!(FollowerView::trail(state.traced_points).len() <= curvetrace::TRAIL_MAX_POINTS);
}

#[test]
fn snapshot_survives_a_tracer_swap() {
    let model = curved_model();
    let mut tracer = GestureTracer::new(model.clone(), TracerConfig::default());
    let _ = tracer.on_pointer_down(device(20.0, 160.0, 0), SURFACE);
    let _ = tracer.on_pointer_move(device(79.0, 91.0, 16), SURFACE);
    let _ = tracer.on_pointer_up(32);
    assert_eq!(tracer.progress(), 25.0);

    let snapshot = tracer.snapshot();
    let mut replacement = GestureTracer::new(model, TracerConfig::default());
    replacement.restore(snapshot).unwrap();
    assert_eq!(replacement.phase(), TracePhase::Paused);
    assert_eq!(replacement.progress(), 25.0);
    assert_eq!(replacement.traced_points(), tracer.traced_points());
}
