//! Replay a synthetic flight and render trail frames.
//!
//! A producer thread feeds one-second fixes into the shared flight computer
//! as fast as it can. Every `frame_interval` seconds of flight it signals the
//! render loop, which locks the computer once, draws the trail centred on the
//! aircraft and writes a PNG.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, SyncSender};
use std::thread;

use clap::{Args, ValueEnum};
use serde::Serialize;
use snailtrail::contest::{ContestPoint, RecordedContestPath};
use snailtrail::flight::{FlightComputer, SharedFlightComputer};
use snailtrail::geo::WindVector;
use snailtrail::render::{
    ClipRect, FrameReport, MapFrame, MapTrailView, PixmapCanvas, MAP_BACKGROUND,
};
use snailtrail::{TrailConfig, TrailLength};
use tracing::{debug, info};

use super::config::load_config;
use crate::error::CliError;
use crate::simulator::{FlightPlan, SyntheticFlight};

/// Spacing of the published contest path vertices, seconds.
const CONTEST_STEP_SECS: u64 = 120;

/// Trail length selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LengthArg {
    /// No trail
    Off,
    /// The whole buffer
    Long,
    /// A fifth of the buffer
    Short,
    /// The whole buffer plus the contest overlay
    Full,
}

impl From<LengthArg> for TrailLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Off => TrailLength::Off,
            LengthArg::Long => TrailLength::Long,
            LengthArg::Short => TrailLength::Short,
            LengthArg::Full => TrailLength::Full,
        }
    }
}

/// Arguments for `snailtrail replay`.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// INI file with a [trail] section (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for rendered PNG frames
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,

    /// Flight duration, seconds
    #[arg(long, default_value_t = 1800)]
    pub duration: u32,

    /// Render a frame every N seconds of flight
    #[arg(long, default_value_t = 60)]
    pub frame_interval: u32,

    /// Override the configured trail length
    #[arg(long, value_enum)]
    pub length: Option<LengthArg>,

    /// Disable wind drift compensation
    #[arg(long)]
    pub no_drift: bool,

    /// Wind direction (from), degrees
    #[arg(long, default_value_t = 270.0)]
    pub wind_dir: f64,

    /// Wind speed, m/s
    #[arg(long, default_value_t = 5.0)]
    pub wind_speed: f64,

    /// MacCready setting, m/s
    #[arg(long, default_value_t = 1.5)]
    pub mac_cready: f64,

    /// Frame width, pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Frame height, pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Map scale, pixels per degree of latitude
    #[arg(long, default_value_t = 8000.0)]
    pub scale: f64,

    /// Rotate the map so the aircraft track points up
    #[arg(long)]
    pub track_up: bool,

    /// Skip writing PNG files
    #[arg(long)]
    pub no_png: bool,

    /// Print the frame summaries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Per-frame summary printed at the end of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub index: usize,
    /// Flight time of the state the frame was drawn from.
    pub time: f64,
    /// Flight time the producer signalled the frame at.
    pub requested_time: f64,
    pub mode: String,
    #[serde(flatten)]
    pub report: FrameReport,
    pub file: Option<PathBuf>,
}

/// Rendering parameters shared by every frame.
#[derive(Debug, Clone)]
struct RenderOptions {
    width: u32,
    height: u32,
    scale: f64,
    track_up: bool,
    output: Option<PathBuf>,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(length) = args.length {
        config.length = length.into();
    }
    if args.no_drift {
        config.drift_enabled = false;
    }
    validate(&args)?;

    let output = if args.no_png {
        None
    } else {
        fs::create_dir_all(&args.output)?;
        Some(args.output.clone())
    };
    let options = RenderOptions {
        width: args.width,
        height: args.height,
        scale: args.scale,
        track_up: args.track_up,
        output,
    };
    let plan = FlightPlan {
        wind: WindVector::new(args.wind_dir, args.wind_speed),
        duration_secs: args.duration as f64,
        ..Default::default()
    };

    info!(
        length = %config.length,
        duration = args.duration,
        frame_interval = args.frame_interval,
        "Starting flight replay"
    );
    let frames = replay(&config, plan, args.mac_cready, args.frame_interval, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        print_table(&frames);
    }
    Ok(())
}

fn validate(args: &ReplayArgs) -> Result<(), CliError> {
    if args.frame_interval == 0 {
        return Err(CliError::InvalidArgument(
            "frame interval must be at least 1 second".to_string(),
        ));
    }
    if args.width == 0 || args.height == 0 {
        return Err(CliError::InvalidArgument(format!(
            "frame size {}x{} is empty",
            args.width, args.height
        )));
    }
    if !args.scale.is_finite() || args.scale <= 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "scale {} must be a positive number",
            args.scale
        )));
    }
    Ok(())
}

/// Fly the plan on a producer thread and render the requested frames.
fn replay(
    config: &TrailConfig,
    plan: FlightPlan,
    mac_cready: f64,
    frame_interval: u32,
    options: &RenderOptions,
) -> Result<Vec<FrameSummary>, CliError> {
    let mut computer = FlightComputer::new(config);
    computer.set_wind(plan.wind);
    computer.set_mac_cready(mac_cready);
    let shared = SharedFlightComputer::new(computer);

    let (tx, rx) = mpsc::sync_channel(1);
    let producer = {
        let shared = shared.clone();
        thread::spawn(move || produce(&shared, plan, frame_interval, tx))
    };

    let mut view = MapTrailView::new(config);
    let mut frames = Vec::new();
    for time in rx {
        frames.push(render_frame(&shared, &mut view, frames.len(), time, options)?);
    }

    producer.join().map_err(|_| CliError::Producer)?;
    info!(frames = frames.len(), "Flight replay finished");
    Ok(frames)
}

/// Feed the synthetic flight into the computer, signalling frame times.
fn produce(
    shared: &SharedFlightComputer,
    plan: FlightPlan,
    frame_interval: u32,
    frames: SyncSender<f64>,
) {
    let mut contest = RecordedContestPath::new();

    for sample in SyntheticFlight::new(plan) {
        {
            let mut computer = shared.lock();
            computer.process_sample(&sample);

            if sample.flying && sample.time as u64 % CONTEST_STEP_SECS == 0 {
                let since_takeoff = sample.time - computer.snapshot().takeoff_time;
                contest.push(ContestPoint::new(since_takeoff, sample.position));
                computer.set_contest_path(Box::new(contest.clone()));
            }
        }

        let frame_due = sample.flying && sample.time as u64 % frame_interval as u64 == 0;
        if frame_due && frames.send(sample.time).is_err() {
            // Render loop gave up
            break;
        }
    }
}

fn render_frame(
    shared: &SharedFlightComputer,
    view: &mut MapTrailView,
    index: usize,
    time: f64,
    options: &RenderOptions,
) -> Result<FrameSummary, CliError> {
    let clip = ClipRect::from_size(options.width, options.height);
    let mut canvas = PixmapCanvas::new(options.width, options.height, MAP_BACKGROUND)?;

    let (mode, drawn_time) = {
        let mut computer = shared.lock();
        let snapshot = computer.snapshot();
        let angle = if options.track_up {
            snapshot.heading_deg
        } else {
            0.0
        };
        let frame = MapFrame::centred_on(snapshot.position, angle, options.scale, &clip);
        view.draw_locked(&mut computer, &frame, &mut canvas, &clip);
        (snapshot.display_mode, snapshot.time)
    };

    let file = match &options.output {
        Some(dir) => {
            let path = frame_path(dir, index);
            canvas.save_png(&path)?;
            Some(path)
        }
        None => None,
    };

    let report = *view.last_report();
    debug!(
        index,
        requested = time,
        time = drawn_time,
        mode = %mode,
        drawn = report.trail.drawn,
        overlay = report.overlay_points,
        "Rendered frame"
    );
    Ok(FrameSummary {
        index,
        time: drawn_time,
        requested_time: time,
        mode: mode.to_string(),
        report,
        file,
    })
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{:04}.png", index))
}

fn print_table(frames: &[FrameSummary]) {
    println!(
        "{:>5}  {:>7}  {:<8}  {:>7}  {:>6}  {:>6}  {:>7}  {:>10}",
        "frame", "time", "mode", "sampled", "drawn", "merged", "overlay", "start"
    );
    for f in frames {
        let start = f
            .report
            .trail_start
            .map(|t| format!("{:.0}", t))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:>7.0}  {:<8}  {:>7}  {:>6}  {:>6}  {:>7}  {:>10}",
            f.index,
            f.time,
            f.mode,
            f.report.trail.sampled,
            f.report.trail.drawn,
            f.report.trail.merged,
            f.report.overlay_points,
            start
        );
    }
}
