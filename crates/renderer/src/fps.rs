use std::time::{Duration, Instant};

/// Minimum wall-clock span averaged into one FPS report.
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Counts presented frames and reports their average rate once per window.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    frame_count: u32,
    window_start: Instant,
}

impl FrameRateMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_count: 0,
            window_start: now,
        }
    }

    pub fn record_frame(&mut self) {
        self.frame_count = self.frame_count.saturating_add(1);
    }

    /// Returns frames per second once at least [`FPS_WINDOW`] has elapsed,
    /// then starts a new window at `now`.
    pub fn maybe_report(&mut self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        let fps = f64::from(self.frame_count) / elapsed.as_secs_f64();
        self.frame_count = 0;
        self.window_start = now;
        Some(fps)
    }

    /// Records one frame and polls for a report.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.record_frame();
        self.maybe_report(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_silent_inside_the_window() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);
        for frame in 1..30 {
            let now = start + Duration::from_millis(frame * 16);
            assert_eq!(meter.tick(now), None);
        }
    }

    #[test]
    fn reports_average_once_per_window_then_resets() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);
        for _ in 0..30 {
            meter.record_frame();
        }
        let first = start + Duration::from_millis(600);
        let fps = meter.maybe_report(first).expect("report");
        assert!((fps - 50.0).abs() < 1e-9);

        assert_eq!(meter.maybe_report(first), None);
        assert_eq!(meter.maybe_report(first + Duration::from_millis(499)), None);

        meter.record_frame();
        let second = first + Duration::from_millis(500);
        let fps = meter.maybe_report(second).expect("second report");
        assert!((fps - 2.0).abs() < 1e-9);
    }

    #[test]
    fn variable_cadence_still_averages_over_wall_clock() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);
        let offsets = [5_u64, 40, 41, 200, 210, 480];
        for offset in offsets {
            assert_eq!(meter.tick(start + Duration::from_millis(offset)), None);
        }
        let fps = meter
            .tick(start + Duration::from_millis(700))
            .expect("report");
        assert!((fps - 7.0 / 0.7).abs() < 1e-9);
    }
}
