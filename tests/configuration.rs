//! CaptureOptions, PixelFormat, CancellationToken, and FFmpeg log level tests.

use std::time::Duration;

use framegrab::{
    CancellationToken, CaptureError, CaptureOptions, DEFAULT_SEEK_TIMEOUT, FfmpegLogLevel,
    PixelFormat,
};

// ── CaptureOptions builder ───────────────────────────────────────

#[test]
fn options_defaults() {
    let options = CaptureOptions::new();
    assert_eq!(options.seek_timeout(), DEFAULT_SEEK_TIMEOUT);
    assert_eq!(options.pixel_format(), PixelFormat::Rgba8);
    assert!(!options.is_cancelled());

    let debug = format!("{options:?}");
    assert!(debug.contains("CaptureOptions"));
    assert!(debug.contains("has_cancellation: false"));
}

#[test]
fn options_zero_timeout_is_raised() {
    let options = CaptureOptions::new().with_seek_timeout(Duration::ZERO);
    assert_eq!(options.seek_timeout(), Duration::from_millis(1));
}

#[test]
fn options_with_cancellation() {
    let token = CancellationToken::new();
    let options = CaptureOptions::new().with_cancellation(token.clone());
    assert!(format!("{options:?}").contains("has_cancellation: true"));
    assert!(!options.is_cancelled());

    token.cancel();
    assert!(options.is_cancelled());
}

#[test]
fn options_clone_shares_token() {
    let token = CancellationToken::new();
    let options = CaptureOptions::new().with_cancellation(token.clone());
    let cloned = options.clone();

    token.cancel();
    assert!(cloned.is_cancelled());
}

// ── CancellationToken ────────────────────────────────────────────

#[test]
fn token_default_not_cancelled() {
    assert!(!CancellationToken::default().is_cancelled());
}

#[test]
fn token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn child_token_follows_ancestors() {
    let root = CancellationToken::new();
    let child = root.child_token();
    let grandchild = child.child_token();
    assert!(!grandchild.is_cancelled());

    root.cancel();
    assert!(child.is_cancelled());
    assert!(grandchild.is_cancelled());
}

#[test]
fn cancelling_child_leaves_parent_alone() {
    let root = CancellationToken::new();
    let child = root.child_token();

    child.cancel();
    assert!(child.is_cancelled());
    assert!(!root.is_cancelled());
}

// ── FFmpeg log level ─────────────────────────────────────────────

#[test]
fn log_level_parses_names() {
    assert_eq!("quiet".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Quiet));
    assert_eq!("WARN".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Warning));
    assert_eq!("trace".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Trace));
    assert_eq!(" Debug ".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Debug));

    let error = "loud".parse::<FfmpegLogLevel>().unwrap_err();
    assert!(error.contains("'loud'"), "{error}");
    assert!(error.contains("quiet, panic, fatal"), "{error}");
}

#[test]
fn log_level_names_parse_back() {
    let names: Vec<String> = FfmpegLogLevel::all().map(|level| level.to_string()).collect();
    assert_eq!(
        names,
        ["quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace"]
    );
    for level in FfmpegLogLevel::all() {
        assert_eq!(level.name().parse::<FfmpegLogLevel>(), Ok(level));
    }
}

#[test]
fn log_level_follows_log_filter() {
    use log::LevelFilter;

    assert_eq!(FfmpegLogLevel::following(LevelFilter::Off), FfmpegLogLevel::Quiet);
    assert_eq!(FfmpegLogLevel::following(LevelFilter::Warn), FfmpegLogLevel::Warning);
    assert_eq!(FfmpegLogLevel::following(LevelFilter::Debug), FfmpegLogLevel::Verbose);
    assert_eq!(FfmpegLogLevel::following(LevelFilter::Trace), FfmpegLogLevel::Debug);
    assert!(FfmpegLogLevel::following(LevelFilter::Error) < FfmpegLogLevel::Warning);
}

#[test]
fn log_level_round_trips_through_ffmpeg() {
    framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Error);
    assert_eq!(framegrab::get_ffmpeg_log_level(), Some(FfmpegLogLevel::Error));
    framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Warning);
}

// ── Error messages ───────────────────────────────────────────────

#[test]
fn errors_read_as_user_messages() {
    assert_eq!(CaptureError::NoMediaLoaded.to_string(), "No video is loaded");
    assert_eq!(CaptureError::Cancelled.to_string(), "Capture cancelled");

    let timeout = CaptureError::SeekTimeout {
        target: Duration::from_secs(3),
        timeout: Duration::from_secs(10),
    };
    assert_eq!(timeout.to_string(), "Seek to 3s did not complete within 10s");

    let not_video = CaptureError::NotAVideo {
        path: "notes.txt".into(),
        media_type: "text/plain".to_string(),
    };
    assert_eq!(
        not_video.to_string(),
        "notes.txt is not a video file (declared type text/plain)"
    );
}
