//! Widget state machine tests: the empty state, replacing media, and the
//! slider and player event handlers.

mod common;

use std::{sync::atomic::Ordering, time::Duration};

use common::SyntheticVideo;
use framegrab::{
    CaptureError, CaptureOptions, CaptureTarget, FrameCaptureWidget, MemorySink, PlaybackState,
};

fn empty_widget() -> FrameCaptureWidget<SyntheticVideo, MemorySink> {
    FrameCaptureWidget::new(MemorySink::new())
}

// ── Empty state ──────────────────────────────────────────────────

#[test]
fn empty_widget_rejects_everything_but_loading() {
    let mut widget = empty_widget();

    assert!(!widget.is_loaded());
    assert!(widget.scrubber().is_none());
    assert!(matches!(widget.scrub(1.0), Err(CaptureError::NoMediaLoaded)));
    assert!(matches!(widget.play(), Err(CaptureError::NoMediaLoaded)));
    assert!(matches!(widget.pause(), Err(CaptureError::NoMediaLoaded)));
    assert!(matches!(
        widget.on_time_update(Duration::from_secs(1)),
        Err(CaptureError::NoMediaLoaded)
    ));
    assert!(matches!(
        widget.on_loaded_metadata(Duration::from_secs(1)),
        Err(CaptureError::NoMediaLoaded)
    ));
    assert!(matches!(
        widget.capture(CaptureTarget::First, &CaptureOptions::new()),
        Err(CaptureError::NoMediaLoaded)
    ));
    assert!(widget.sink().exports().is_empty());
}

// ── Loading ──────────────────────────────────────────────────────

#[test]
fn attach_mirrors_duration_and_pauses() {
    let mut widget = empty_widget();

    let metadata = widget.attach(SyntheticVideo::new(640, 360, 10));
    assert_eq!((metadata.width, metadata.height), (640, 360));
    assert_eq!(metadata.frame_interval(), Some(Duration::from_millis(40)));

    assert!(widget.is_loaded());
    assert_eq!(widget.position().duration(), Duration::from_secs(10));
    assert_eq!(widget.position().current_time(), Duration::ZERO);
    assert_eq!(widget.playback_state(), PlaybackState::Paused);
}

#[test]
fn attach_replaces_and_releases_previous_media() {
    let mut widget = empty_widget();
    let first = SyntheticVideo::new(64, 36, 10);
    let first_drops = first.drops.clone();
    widget.attach(first);
    widget.scrub(7.0).unwrap();
    widget.play().unwrap();

    widget.attach(SyntheticVideo::new(32, 18, 4));

    assert_eq!(first_drops.load(Ordering::SeqCst), 1);
    assert_eq!(widget.media().unwrap().metadata.width, 32);
    assert_eq!(widget.position().current_time(), Duration::ZERO);
    assert_eq!(widget.position().duration(), Duration::from_secs(4));
    assert_eq!(widget.playback_state(), PlaybackState::Paused);
}

#[test]
fn unload_returns_to_empty_state() {
    let mut widget = empty_widget();
    let video = SyntheticVideo::new(64, 36, 10);
    let drops = video.drops.clone();
    widget.attach(video);
    widget.scrub(2.0).unwrap();

    widget.unload();

    assert!(!widget.is_loaded());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(widget.position().current_time(), Duration::ZERO);
    assert!(matches!(widget.scrub(1.0), Err(CaptureError::NoMediaLoaded)));
}

// ── Slider ───────────────────────────────────────────────────────

#[test]
fn scrub_rounds_and_clamps() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));

    assert_eq!(widget.scrub(3.204).unwrap(), Duration::from_millis(3200));
    assert_eq!(widget.scrub(42.0).unwrap(), Duration::from_secs(10));
    assert_eq!(widget.scrub(-5.0).unwrap(), Duration::ZERO);
    assert_eq!(widget.scrub(f64::NAN).unwrap(), Duration::ZERO);
    assert_eq!(widget.position().current_time(), Duration::ZERO);
}

#[test]
fn scrubber_tracks_duration() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));

    let scrubber = widget.scrubber().unwrap();
    assert_eq!(scrubber.min(), Duration::ZERO);
    assert_eq!(scrubber.max(), Duration::from_secs(10));

    widget.on_loaded_metadata(Duration::from_secs(12)).unwrap();
    assert_eq!(widget.scrubber().unwrap().max(), Duration::from_secs(12));
}

// ── Player events ────────────────────────────────────────────────

#[test]
fn time_updates_are_clamped_to_duration() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));

    widget.on_time_update(Duration::from_millis(4500)).unwrap();
    assert_eq!(widget.position().current_time(), Duration::from_millis(4500));

    widget.on_time_update(Duration::from_secs(30)).unwrap();
    assert_eq!(widget.position().current_time(), Duration::from_secs(10));
}

#[test]
fn shorter_duration_pulls_position_back() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));
    widget.scrub(8.0).unwrap();

    widget.on_loaded_metadata(Duration::from_secs(5)).unwrap();

    assert_eq!(widget.position().current_time(), Duration::from_secs(5));
}

#[test]
fn play_at_end_fails() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));
    widget.scrub(10.0).unwrap();

    assert!(matches!(widget.play(), Err(CaptureError::PlaybackEnded)));
    assert_eq!(widget.playback_state(), PlaybackState::Paused);
}

#[test]
fn play_and_pause_toggle_state() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(64, 36, 10));

    widget.play().unwrap();
    assert_eq!(widget.playback_state(), PlaybackState::Playing);
    widget.pause().unwrap();
    assert_eq!(widget.playback_state(), PlaybackState::Paused);
}

// ── Sequential captures ──────────────────────────────────────────

#[test]
fn consecutive_captures_each_restore() {
    let mut widget = empty_widget();
    widget.attach(SyntheticVideo::new(16, 9, 10));
    widget.scrub(5.0).unwrap();
    let options = CaptureOptions::new();

    widget.capture(CaptureTarget::First, &options).unwrap();
    widget.capture(CaptureTarget::Last, &options).unwrap();
    widget.capture(CaptureTarget::Current, &options).unwrap();

    let names: Vec<&str> = widget
        .sink()
        .exports()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, ["frame_at_0s.png", "frame_at_10s.png", "frame_at_5s.png"]);
    assert_eq!(widget.position().current_time(), Duration::from_secs(5));
}
