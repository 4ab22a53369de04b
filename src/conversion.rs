//! Internal conversion helpers.
//!
//! Pixel-plane copying and timestamp conversion shared by the decoder.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy the first plane of `video_frame` into a tightly-packed buffer.
///
/// FFmpeg rows may carry padding (stride larger than `width * bytes_per_pixel`);
/// the padding is dropped so the buffer can go straight into an
/// [`image::ImageBuffer`].
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// FFmpeg's `AV_NOPTS_VALUE`: the timestamp is unknown.
pub(crate) const NO_TIMESTAMP: i64 = i64::MIN;

/// A start time as an offset, treating an unknown start as zero.
pub(crate) fn start_offset(start_time: i64) -> i64 {
    if start_time == NO_TIMESTAMP { 0 } else { start_time }
}

/// Seconds from the start of the stream to `pts`, both in the stream time
/// base.
pub(crate) fn pts_to_seconds(pts: i64, stream_start: i64, time_base: Rational) -> f64 {
    let relative = pts.saturating_sub(start_offset(stream_start));
    relative as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// A stream start time in microseconds, zero when unknown.
pub(crate) fn start_to_micros(stream_start: i64, time_base: Rational) -> i64 {
    if time_base.denominator() == 0 {
        return 0;
    }
    let micros = i128::from(start_offset(stream_start)) * i128::from(time_base.numerator())
        * 1_000_000
        / i128::from(time_base.denominator());
    micros.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Convert a media-relative [`Duration`] to a container-level seek
/// timestamp.
///
/// `Input::seek` seeks across all streams in AV_TIME_BASE (microsecond)
/// units on the container clock, which begins at the stream start time
/// rather than at zero (MPEG-TS usually starts around 1.4 s).
pub(crate) fn duration_to_seek_timestamp(duration: Duration, start_micros: i64) -> i64 {
    let micros = duration.as_micros().min(i64::MAX as u128) as i64;
    micros.saturating_add(start_micros)
}
