//! FFmpeg console verbosity.
//!
//! FFmpeg writes its own warnings to stderr independently of the `log`
//! facade this crate uses for its diagnostics. [`set_ffmpeg_log_level`]
//! tunes that output without the caller depending on `ffmpeg-next`, and
//! [`FfmpegLogLevel::following`] picks a level that keeps FFmpeg no louder
//! than the crate's own log filter.
//!
//! ```no_run
//! use framegrab::FfmpegLogLevel;
//!
//! framegrab::set_ffmpeg_log_level(FfmpegLogLevel::following(log::max_level()));
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use ffmpeg_next::util::log::Level;
use log::LevelFilter;

/// FFmpeg log level, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FfmpegLogLevel {
    /// No output.
    Quiet,
    /// Unrecoverable errors that abort the process.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings. FFmpeg's default.
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Everything.
    Trace,
}

/// Every level with its FFmpeg counterpart and its name, quietest first.
const LEVELS: [(FfmpegLogLevel, Level, &str); 9] = [
    (FfmpegLogLevel::Quiet, Level::Quiet, "quiet"),
    (FfmpegLogLevel::Panic, Level::Panic, "panic"),
    (FfmpegLogLevel::Fatal, Level::Fatal, "fatal"),
    (FfmpegLogLevel::Error, Level::Error, "error"),
    (FfmpegLogLevel::Warning, Level::Warning, "warning"),
    (FfmpegLogLevel::Info, Level::Info, "info"),
    (FfmpegLogLevel::Verbose, Level::Verbose, "verbose"),
    (FfmpegLogLevel::Debug, Level::Debug, "debug"),
    (FfmpegLogLevel::Trace, Level::Trace, "trace"),
];

impl FfmpegLogLevel {
    /// All levels, quietest first.
    pub fn all() -> impl Iterator<Item = FfmpegLogLevel> {
        LEVELS.iter().map(|&(level, _, _)| level)
    }

    /// The lowercase name FFmpeg's `-loglevel` option uses.
    pub fn name(self) -> &'static str {
        LEVELS[self as usize].2
    }

    /// The FFmpeg level that shows roughly what `filter` shows for this
    /// crate. FFmpeg's `debug` output is per packet, so it is kept for
    /// `trace`.
    pub fn following(filter: LevelFilter) -> Self {
        match filter {
            LevelFilter::Off => FfmpegLogLevel::Quiet,
            LevelFilter::Error => FfmpegLogLevel::Error,
            LevelFilter::Warn => FfmpegLogLevel::Warning,
            LevelFilter::Info => FfmpegLogLevel::Info,
            LevelFilter::Debug => FfmpegLogLevel::Verbose,
            LevelFilter::Trace => FfmpegLogLevel::Debug,
        }
    }

    fn to_ffmpeg(self) -> Level {
        LEVELS[self as usize].1
    }

    fn from_ffmpeg(level: Level) -> Option<Self> {
        LEVELS
            .iter()
            .find(|&&(_, ffmpeg, _)| ffmpeg == level)
            .map(|&(level, _, _)| level)
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        let wanted = if wanted == "warn" { "warning" } else { wanted.as_str() };

        LEVELS
            .iter()
            .find(|&&(_, _, name)| name == wanted)
            .map(|&(level, _, _)| level)
            .ok_or_else(|| {
                let names: Vec<&str> = LEVELS.iter().map(|&(_, _, name)| name).collect();
                format!(
                    "unknown FFmpeg log level '{value}' (expected one of: {})",
                    names.join(", ")
                )
            })
    }
}

/// Set FFmpeg's console verbosity.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    log::debug!("FFmpeg log level: {level}");
    ffmpeg_next::util::log::set_level(level.to_ffmpeg());
}

/// Current FFmpeg console verbosity, if it maps to a known level.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .and_then(FfmpegLogLevel::from_ffmpeg)
}
