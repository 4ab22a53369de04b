use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framegrab::{
    CaptureObserver, CaptureOptions, CaptureStage, CaptureTarget, FfmpegLogLevel,
    FrameCaptureWidget, MediaSource, PixelFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framegrab capture input.mp4 --at first --out frames\n  framegrab capture input.mp4 --at current --position 0:03.2\n  framegrab capture input.mp4 --at last --timeout 5 --progress\n  framegrab info input.mp4 --json\n  framegrab completions zsh > _framegrab";

#[derive(Debug, Parser)]
#[command(
    name = "framegrab",
    version,
    about = "Export a single video frame as a PNG",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging (overrides RUST_LOG's default).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a spinner while capturing.
    #[arg(long, global = true)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    /// Follows the log filter when omitted.
    #[arg(long, global = true)]
    log_level: Option<FfmpegLogLevel>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export the frame at a point in time as a PNG.
    #[command(
        about = "Capture a frame",
        after_help = "Examples:\n  framegrab capture input.mp4 --at 12.5\n  framegrab capture input.mp4 --at current --position 00:01:03 --playing"
    )]
    Capture {
        /// Input video path.
        input: PathBuf,
        /// Which frame: first, current, last, or a timecode.
        #[arg(long, default_value = "current")]
        at: String,
        /// Scrub to this timecode before capturing.
        #[arg(long)]
        position: Option<String>,
        /// Treat the video as playing when the capture starts.
        #[arg(long)]
        playing: bool,
        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Replace an existing file with the same name.
        #[arg(long)]
        overwrite: bool,
        /// Seconds to wait for the seek to settle.
        #[arg(long, default_value_t = 10.0)]
        timeout: f64,
        /// Pixel format of the PNG (rgba8, rgb8, gray8).
        #[arg(long, default_value = "rgba8")]
        pixel_format: String,
    },

    /// Print video metadata.
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        after_help = "Examples:\n  framegrab info input.mp4\n  framegrab info input.mp4 --json"
    )]
    Info {
        /// Input video path.
        input: PathBuf,
        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn seconds_to_duration(
    seconds: f64,
    original: &str,
) -> Result<Duration, Box<dyn std::error::Error>> {
    Duration::try_from_secs_f64(seconds.max(0.0))
        .map_err(|error| format!("time out of range: {original} ({error})").into())
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        if !seconds.is_finite() {
            return Err(format!("invalid time: {trimmed}").into());
        }
        return seconds_to_duration(seconds, trimmed);
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes, seconds] => (0_u64, minutes.parse::<u64>()?, seconds.parse::<f64>()?),
        [hours, minutes, seconds] => (
            hours.parse::<u64>()?,
            minutes.parse::<u64>()?,
            seconds.parse::<f64>()?,
        ),
        _ => return Err(format!("invalid time format: {trimmed}").into()),
    };

    let total_seconds = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    if !total_seconds.is_finite() {
        return Err(format!("invalid time: {trimmed}").into());
    }
    seconds_to_duration(total_seconds, trimmed)
}

fn parse_target(value: &str) -> Result<CaptureTarget, Box<dyn std::error::Error>> {
    match value.to_ascii_lowercase().as_str() {
        "first" => Ok(CaptureTarget::First),
        "current" => Ok(CaptureTarget::Current),
        "last" => Ok(CaptureTarget::Last),
        other => Ok(CaptureTarget::At(parse_timecode(other)?)),
    }
}

fn parse_pixel_format(value: &str) -> Option<PixelFormat> {
    match value.to_ascii_lowercase().as_str() {
        "rgba8" | "rgba" => Some(PixelFormat::Rgba8),
        "rgb8" | "rgb" => Some(PixelFormat::Rgb8),
        "gray8" | "gray" | "greyscale" | "grayscale" => Some(PixelFormat::Gray8),
        _ => None,
    }
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let ffmpeg_level = global
        .log_level
        .unwrap_or_else(|| FfmpegLogLevel::following(log::max_level()));
    framegrab::set_ffmpeg_log_level(ffmpeg_level);
}

struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(80));
        Ok(Self { bar })
    }
}

impl CaptureObserver for SpinnerObserver {
    fn on_stage(&self, stage: CaptureStage) {
        let message = match stage {
            CaptureStage::Seeking => "seeking",
            CaptureStage::Rasterizing => "rasterizing",
            CaptureStage::Encoding => "encoding png",
            CaptureStage::Exporting => "writing file",
            CaptureStage::Restoring => "restoring position",
            _ => "working",
        };
        self.bar.set_message(message);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::Capture {
            input,
            at,
            position,
            playing,
            out,
            overwrite,
            timeout,
            pixel_format,
        } => {
            let target = parse_target(&at)?;
            let pixel_format = parse_pixel_format(&pixel_format)
                .ok_or(format!("unsupported --pixel-format: {pixel_format}"))?;
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err("--timeout must be a positive number of seconds".into());
            }
            let timeout = seconds_to_duration(timeout, &timeout.to_string())?;

            let sink = framegrab::DirectorySink::new(&out).with_overwrite(overwrite);
            let mut widget: FrameCaptureWidget = FrameCaptureWidget::new(sink);
            widget.load(MediaSource::Picked(input))?;

            if let Some(position) = position {
                widget.scrub(parse_timecode(&position)?.as_secs_f64())?;
            }
            if playing {
                widget.play()?;
            }

            let mut options = CaptureOptions::new()
                .with_seek_timeout(timeout)
                .with_pixel_format(pixel_format);

            let spinner = if cli.global.progress {
                let observer = Arc::new(SpinnerObserver::new()?);
                options = options.with_observer(observer.clone());
                Some(observer)
            } else {
                None
            };

            let outcome = widget.capture(target, &options);
            if let Some(observer) = spinner {
                observer.bar.finish_and_clear();
            }
            let outcome = outcome?;

            if !outcome.state_restored {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    "playback could not be resumed after the capture".yellow()
                );
            }
            println!(
                "{} {} ({}x{})",
                "saved".green().bold(),
                outcome.destination.display(),
                outcome.frame.width(),
                outcome.frame.height(),
            );
        }
        Commands::Info { input, json } => {
            let mut widget = FrameCaptureWidget::in_directory(".");
            let metadata = widget.load(MediaSource::Picked(input))?;
            if json {
                let payload = json!({
                    "width": metadata.width,
                    "height": metadata.height,
                    "fps": metadata.frames_per_second,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "codec": metadata.codec,
                    "format": metadata.format,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    metadata.width, metadata.height, metadata.frames_per_second, metadata.codec,
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framegrab", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
