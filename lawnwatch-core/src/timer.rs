use std::time::Duration;

/// Fixed-period refresh timer driven by per-frame elapsed time.
///
/// Fires on the first frame. After a stall longer than one period it fires
/// once and drops the backlog instead of replaying every missed tick.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: f32,
    accumulator: f32,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        let interval = interval.as_secs_f32().max(f32::EPSILON);
        Self {
            interval,
            accumulator: interval,
        }
    }

    pub fn interval_secs(&self) -> f32 {
        self.interval
    }

    /// Adds one frame's worth of time. Returns `true` when a tick is due.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        self.accumulator += delta_seconds.max(0.0);
        if self.accumulator < self.interval {
            return false;
        }
        self.accumulator -= self.interval;
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> TickTimer {
        TickTimer::new(Duration::from_millis(200))
    }

    #[test]
    fn fires_on_first_frame() {
        let mut timer = timer();
        assert!(timer.advance(0.0));
        assert!(!timer.advance(0.0));
    }

    #[test]
    fn fires_once_per_interval() {
        let mut timer = timer();
        assert!(timer.advance(0.016));

        let fired = (0..60).filter(|_| timer.advance(0.05)).count();
        // 3 seconds at 200 ms
        assert_eq!(fired, 15);
    }

    #[test]
    fn long_stall_yields_single_tick() {
        let mut timer = timer();
        assert!(timer.advance(0.0));
        assert!(timer.advance(5.0));
        assert!(!timer.advance(0.0));
        assert!(!timer.advance(0.1));
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut timer = timer();
        assert!(timer.advance(0.0));
        assert!(!timer.advance(-1.0));
        assert!(timer.advance(0.2));
    }
}
