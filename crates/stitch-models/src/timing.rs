//! Frame-rate resolution.

use crate::RecordingStats;

/// Lower bound applied to every resolved frame rate.
pub const MIN_FRAME_RATE: f64 = 0.5;

/// Upper bound applied to every resolved frame rate.
pub const MAX_FRAME_RATE: f64 = 60.0;

/// Rate used when neither the stats nor the request offer a candidate.
pub const FALLBACK_FRAME_RATE: f64 = 5.0;

/// The single frame rate driving the frame-to-video stage.
///
/// Used unchanged for both the decode rate and the encode rate, so declared
/// frame count divided by this rate matches the declared recording duration.
/// Never recomputed from the post-download frame count: a partially
/// recovered set yields a proportionally shorter, still correctly paced
/// video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTiming {
    /// Frames per second, clamped to `[MIN_FRAME_RATE, MAX_FRAME_RATE]`.
    pub fps: f64,
}

impl ResolvedTiming {
    /// Resolve the authoritative frame rate for a session.
    ///
    /// Candidates in strict priority order, first satisfying one wins:
    /// 1. the rate the device measured while recording, if in (0, 60);
    /// 2. declared frame count over recording duration;
    /// 3. the advisory rate from the request, if in (0, 60);
    /// 4. a fixed fallback of 5 fps.
    pub fn resolve(stats: &RecordingStats, advisory: Option<f64>) -> Self {
        let fps = measured_rate(stats)
            .or_else(|| derived_rate(stats))
            .or_else(|| advisory.filter(in_open_range))
            .unwrap_or(FALLBACK_FRAME_RATE)
            .clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
        Self { fps }
    }
}

fn in_open_range(rate: &f64) -> bool {
    *rate > 0.0 && *rate < MAX_FRAME_RATE
}

fn measured_rate(stats: &RecordingStats) -> Option<f64> {
    stats.actual_frame_rate.filter(in_open_range)
}

fn derived_rate(stats: &RecordingStats) -> Option<f64> {
    let secs = stats.duration_secs()?;
    if secs > 0.0 && stats.total_frames > 0 {
        Some(stats.total_frames as f64 / secs)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(
        total_frames: u32,
        duration_seconds: Option<f64>,
        actual_frame_rate: Option<f64>,
    ) -> RecordingStats {
        RecordingStats {
            total_frames,
            total_audio_chunks: 0,
            duration_ms: None,
            duration_seconds,
            actual_frame_rate,
        }
    }

    #[test]
    fn test_measured_rate_wins() {
        let s = stats(300, Some(20.0), Some(12.3));
        let timing = ResolvedTiming::resolve(&s, Some(10.0));
        assert_eq!(timing.fps, 12.3);
    }

    #[test]
    fn test_derived_rate_when_no_measurement() {
        let s = stats(300, Some(20.0), None);
        let timing = ResolvedTiming::resolve(&s, Some(10.0));
        assert_eq!(timing.fps, 15.0);
    }

    #[test]
    fn test_derived_rate_from_millis() {
        let s = RecordingStats {
            total_frames: 100,
            total_audio_chunks: 0,
            duration_ms: Some(10_000),
            duration_seconds: None,
            actual_frame_rate: None,
        };
        assert_eq!(ResolvedTiming::resolve(&s, None).fps, 10.0);
    }

    #[test]
    fn test_advisory_when_stats_unusable() {
        let s = stats(0, None, None);
        let timing = ResolvedTiming::resolve(&s, Some(10.0));
        assert_eq!(timing.fps, 10.0);
    }

    #[test]
    fn test_fallback_when_nothing_offered() {
        let s = stats(0, None, None);
        assert_eq!(ResolvedTiming::resolve(&s, None).fps, FALLBACK_FRAME_RATE);
    }

    #[test]
    fn test_out_of_range_measurement_is_skipped() {
        // 75 fps is outside (0, 60), so the derived rate takes over.
        let s = stats(300, Some(20.0), Some(75.0));
        assert_eq!(ResolvedTiming::resolve(&s, None).fps, 15.0);
    }

    #[test]
    fn test_slow_derived_rate_clamps_up() {
        let s = stats(2, Some(10.0), None);
        assert_eq!(ResolvedTiming::resolve(&s, None).fps, MIN_FRAME_RATE);
    }

    #[test]
    fn test_fast_derived_rate_clamps_down() {
        let s = stats(1500, Some(20.0), None);
        assert_eq!(ResolvedTiming::resolve(&s, None).fps, MAX_FRAME_RATE);
    }

    #[test]
    fn test_zero_duration_skips_derivation() {
        let s = stats(300, Some(0.0), None);
        let timing = ResolvedTiming::resolve(&s, Some(10.0));
        assert_eq!(timing.fps, 10.0);
    }
}
