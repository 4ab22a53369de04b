//! Benchmarks for frame decoding, PNG encoding, and slider mapping.
//!
//! Run with: cargo bench
//!
//! Decoding benchmarks require fixture files from
//! `tests/fixtures/generate_fixtures.sh` and are skipped without them.

use std::{hint::black_box, path::Path, time::Duration};

use criterion::Criterion;
use framegrab::{
    CaptureOptions, CaptureTarget, FfmpegLogLevel, FrameCaptureWidget, FrameSource, MediaLoader,
    MediaReference, MediaSource, MemorySink, PixelFormat, Scrubber,
};
use image::{DynamicImage, Rgba, RgbaImage};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn gradient(width: u32, height: u32) -> DynamicImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    DynamicImage::ImageRgba8(image)
}

fn benchmark_png_encoding(criterion: &mut Criterion) {
    let small = gradient(640, 360);
    let large = gradient(1920, 1080);

    criterion.bench_function("encode png 640x360", |bencher| {
        bencher.iter(|| framegrab::encode_png(black_box(&small)).unwrap());
    });

    criterion.bench_function("encode png 1920x1080", |bencher| {
        bencher.iter(|| framegrab::encode_png(black_box(&large)).unwrap());
    });

    let png = framegrab::encode_png(&small).unwrap();
    criterion.bench_function("png data uri 640x360", |bencher| {
        bencher.iter(|| framegrab::png_data_uri(black_box(&png)));
    });
}

fn benchmark_slider_mapping(criterion: &mut Criterion) {
    let scrubber = Scrubber::new(Duration::from_secs(3600));

    criterion.bench_function("scrubber value_for", |bencher| {
        bencher.iter(|| scrubber.value_for(black_box(1234.567)));
    });

    criterion.bench_function("frame file name", |bencher| {
        bencher.iter(|| framegrab::frame_file_name(black_box(Duration::from_millis(3200))));
    });
}

fn benchmark_frame_decoding(criterion: &mut Criterion) {
    framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let mut media = MediaLoader::new()
        .load(MediaSource::Picked(SAMPLE_VIDEO.into()))
        .unwrap();
    let middle = media.metadata().duration / 2;
    let options = CaptureOptions::new();

    criterion.bench_function("decode first frame", |bencher| {
        bencher.iter(|| media.decode_frame_at(Duration::ZERO, &options).unwrap());
    });

    criterion.bench_function("decode mid-video frame", |bencher| {
        bencher.iter(|| media.decode_frame_at(middle, &options).unwrap());
    });

    let gray = CaptureOptions::new().with_pixel_format(PixelFormat::Gray8);
    criterion.bench_function("decode mid-video frame (gray8)", |bencher| {
        bencher.iter(|| media.decode_frame_at(middle, &gray).unwrap());
    });
}

fn benchmark_full_capture(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let mut widget: FrameCaptureWidget<MediaReference, MemorySink> =
        FrameCaptureWidget::new(MemorySink::new());
    widget
        .load(MediaSource::Picked(SAMPLE_VIDEO.into()))
        .unwrap();
    let options = CaptureOptions::new();

    criterion.bench_function("capture current frame to memory", |bencher| {
        bencher.iter(|| widget.capture(CaptureTarget::Current, &options).unwrap());
    });
}

criterion::criterion_group!(
    benches,
    benchmark_png_encoding,
    benchmark_slider_mapping,
    benchmark_frame_decoding,
    benchmark_full_capture,
);
criterion::criterion_main!(benches);
