//! Replays a recorded pointer trace through the tracing engine and prints the
//! emitted notices, optionally verifying the notice-kind sequence against an
//! expectation file.
//!
//! Trace CSV rows:
//!   path,logical_w,logical_h,start_radius,end_radius
//!   waypoint,x,y,progress,label
//!   tolerance,match,tight,medium            (optional)
//!   surface,left,top,width,height           (applies to later rows; may repeat)
//!   pointer_trace,ms,phase,x,y              (phase: down | move | up)

use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use curvetrace::{
    GestureTracer, PathModel, Point, PointerEvent, SurfaceRect, TraceNotice, TraceQuality,
    TracerConfig, Waypoint,
};

#[derive(Clone, Copy, Debug)]
enum ReplayPhase {
    Down,
    Move,
    Up,
}

#[derive(Clone, Copy, Debug)]
struct ReplaySample {
    ms: u64,
    phase: ReplayPhase,
    x: f32,
    y: f32,
    surface: SurfaceRect,
}

#[derive(Debug)]
struct ReplayInput {
    model: PathModel,
    config: TracerConfig,
    samples: Vec<ReplaySample>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let input = parse_trace(&trace_path)?;
    let notices = replay(input);

    println!("notice,ms,kind,progress,quality");
    for (ms, notice) in &notices {
        let (progress, quality) = notice_detail(*notice);
        println!("notice,{ms},{},{progress:.1},{quality}", kind_label(*notice));
    }

    if let Some(expect_path) = expect_path {
        let expected = parse_expected_kinds(&expect_path)?;
        let actual: Vec<&'static str> = notices.iter().map(|(_, n)| kind_label(*n)).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            return Err("notice sequence mismatch".into());
        }
    }

    Ok(())
}

fn usage() -> String {
    "usage: trace_replay <trace.csv> [--expect expected_kinds.txt]".to_string()
}

/// Feeds the parsed samples through a fresh tracer and collects every notice
/// with the timestamp of the sample that produced it.
fn replay(input: ReplayInput) -> Vec<(u64, TraceNotice)> {
    let mut tracer = GestureTracer::new(Arc::new(input.model), input.config);
    let mut notices: Vec<(u64, TraceNotice)> = Vec::new();
    for sample in &input.samples {
        let output = match sample.phase {
            ReplayPhase::Down => tracer.on_pointer_down(
                PointerEvent::new(sample.x, sample.y, sample.ms),
                sample.surface,
            ),
            ReplayPhase::Move => tracer.on_pointer_move(
                PointerEvent::new(sample.x, sample.y, sample.ms),
                sample.surface,
            ),
            ReplayPhase::Up => tracer.on_pointer_up(sample.ms),
        };
        for notice in output.iter() {
            notices.push((sample.ms, notice));
        }
    }
    notices
}

fn parse_trace(path: &Path) -> Result<ReplayInput, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    parse_trace_lines(BufReader::new(file), path)
}

fn parse_trace_lines<R: BufRead>(reader: R, path: &Path) -> Result<ReplayInput, String> {
    let mut logical_size: Option<(f32, f32)> = None;
    let mut start_radius = 0.0f32;
    let mut end_radius = 0.0f32;
    let mut waypoints: Vec<Waypoint> = Vec::new();
    let mut config = TracerConfig::default();
    let mut surface: Option<SurfaceRect> = None;
    let mut samples: Vec<ReplaySample> = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        match parts[0].trim() {
            "path" => {
                require_columns(&parts, 5, path, line_no)?;
                logical_size = Some((
                    parse_f32(parts[1], path, line_no, "logical_w")?,
                    parse_f32(parts[2], path, line_no, "logical_h")?,
                ));
                start_radius = parse_f32(parts[3], path, line_no, "start_radius")?;
                end_radius = parse_f32(parts[4], path, line_no, "end_radius")?;
            }
            "waypoint" => {
                require_columns(&parts, 5, path, line_no)?;
                let x = parse_f32(parts[1], path, line_no, "x")?;
                let y = parse_f32(parts[2], path, line_no, "y")?;
                let progress = parse_f32(parts[3], path, line_no, "progress")?;
                // Waypoint labels are diagnostic-only static strings; a
                // replay run leaks its handful of parsed labels on purpose.
                let label: &'static str = Box::leak(parts[4].trim().to_owned().into_boxed_str());
                waypoints.push(Waypoint::new(Point::new(x, y), progress, label));
            }
            "tolerance" => {
                require_columns(&parts, 4, path, line_no)?;
                config = TracerConfig {
                    match_tolerance: parse_f32(parts[1], path, line_no, "match")?,
                    tight_tolerance: parse_f32(parts[2], path, line_no, "tight")?,
                    medium_tolerance: parse_f32(parts[3], path, line_no, "medium")?,
                };
            }
            "surface" => {
                require_columns(&parts, 5, path, line_no)?;
                surface = Some(SurfaceRect::new(
                    parse_f32(parts[1], path, line_no, "left")?,
                    parse_f32(parts[2], path, line_no, "top")?,
                    parse_f32(parts[3], path, line_no, "width")?,
                    parse_f32(parts[4], path, line_no, "height")?,
                ));
            }
            "pointer_trace" => {
                require_columns(&parts, 5, path, line_no)?;
                let surface = surface.ok_or_else(|| {
                    format!(
                        "{}:{} pointer_trace before any surface row",
                        path.display(),
                        line_no
                    )
                })?;
                let ms = parse_u64(parts[1], path, line_no, "ms")?;
                let phase = match parts[2].trim() {
                    "down" => ReplayPhase::Down,
                    "move" => ReplayPhase::Move,
                    "up" => ReplayPhase::Up,
                    other => {
                        return Err(format!(
                            "{}:{} invalid phase '{}'",
                            path.display(),
                            line_no,
                            other
                        ));
                    }
                };
                samples.push(ReplaySample {
                    ms,
                    phase,
                    x: parse_f32(parts[3], path, line_no, "x")?,
                    y: parse_f32(parts[4], path, line_no, "y")?,
                    surface,
                });
            }
            _ => continue,
        }
    }

    let logical_size = logical_size
        .ok_or_else(|| format!("{}: missing required 'path' row", path.display()))?;
    let model = PathModel::new(waypoints, logical_size, start_radius, end_radius)
        .map_err(|e| format!("{}: invalid path model: {e}", path.display()))?;

    Ok(ReplayInput {
        model,
        config,
        samples,
    })
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    parse_expected_lines(BufReader::new(file), path)
}

fn parse_expected_lines<R: BufRead>(reader: R, path: &Path) -> Result<Vec<&'static str>, String> {
    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let normalized = normalize_kind(token).ok_or_else(|| {
            format!(
                "{}:{} invalid expected notice kind: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        kinds.push(normalized);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "session_started" => Some("session_started"),
        "progress" => Some("progress"),
        "paused" => Some("paused"),
        "completed" => Some("completed"),
        _ => None,
    }
}

fn kind_label(notice: TraceNotice) -> &'static str {
    match notice {
        TraceNotice::SessionStarted => "session_started",
        TraceNotice::Progress { .. } => "progress",
        TraceNotice::Paused { .. } => "paused",
        TraceNotice::Completed => "completed",
    }
}

fn notice_detail(notice: TraceNotice) -> (f32, &'static str) {
    match notice {
        TraceNotice::Progress { progress, quality } => (progress, quality_label(quality)),
        TraceNotice::Paused { progress } => (progress, "-"),
        TraceNotice::SessionStarted => (0.0, "-"),
        // Completion always lands at full progress.
        TraceNotice::Completed => (100.0, quality_label(TraceQuality::Complete)),
    }
}

fn quality_label(quality: TraceQuality) -> &'static str {
    match quality {
        TraceQuality::Perfect => "perfect",
        TraceQuality::Good => "good",
        TraceQuality::Okay => "okay",
        TraceQuality::OffPath => "off_path",
        TraceQuality::Complete => "complete",
    }
}

fn require_columns(
    parts: &[&str],
    expected: usize,
    path: &Path,
    line_no: usize,
) -> Result<(), String> {
    if parts.len() < expected {
        return Err(format!(
            "{}:{} expected at least {} columns, got {}",
            path.display(),
            line_no,
            expected,
            parts.len()
        ));
    }
    Ok(())
}

fn parse_u64(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<u64, String> {
    raw.trim().parse::<u64>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw.trim(),
            e
        )
    })
}

fn parse_f32(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<f32, String> {
    raw.trim().parse::<f32>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw.trim(),
            e
        )
    })
}
