/// Converts animation-frame timestamps (milliseconds) into elapsed and
/// per-frame seconds. The first tick defines time zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    origin_ms: Option<f64>,
    last_ms: f64,
}

pub const MAX_FRAME_DELTA_SECONDS: f64 = 0.1;

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(elapsed_seconds, delta_seconds)`.
    pub fn tick(&mut self, timestamp_ms: f64) -> (f64, f64) {
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let delta = ((timestamp_ms - self.last_ms.max(origin)) / 1000.0)
            .clamp(0.0, MAX_FRAME_DELTA_SECONDS);
        self.last_ms = timestamp_ms;

        (((timestamp_ms - origin) / 1000.0).max(0.0), delta)
    }

    pub fn elapsed(&self) -> f64 {
        self.origin_ms
            .map_or(0.0, |origin| ((self.last_ms - origin) / 1000.0).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_time_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5_000.0), (0.0, 0.0));
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn ticks_accumulate_elapsed_and_report_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        let (elapsed, delta) = clock.tick(1_016.0);
        assert!((elapsed - 0.016).abs() < 1e-9);
        assert!((delta - 0.016).abs() < 1e-9);

        let (elapsed, _) = clock.tick(3_000.0);
        assert!((elapsed - 2.0).abs() < 1e-9);
        assert!((clock.elapsed() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn long_gaps_are_capped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        let (_, delta) = clock.tick(60_000.0);
        assert_eq!(delta, MAX_FRAME_DELTA_SECONDS);
    }

    #[test]
    fn timestamps_going_backwards_do_not_rewind() {
        let mut clock = FrameClock::new();
        clock.tick(2_000.0);
        let (_, delta) = clock.tick(1_500.0);
        assert_eq!(delta, 0.0);
    }
}
