use std::time::{Duration, Instant};

/// Fixed-interval gate deciding whether a simulation step runs this frame.
///
/// `tick()` fires at most once per elapsed interval. On firing, the baseline
/// moves to the tick's own timestamp; overflow past the interval is dropped
/// rather than carried into the next period, so a slow frame delays every
/// subsequent step instead of triggering catch-up steps.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
}

impl IntervalTimer {
    /// Creates a timer armed from now.
    ///
    /// Negative or non-finite intervals are treated as zero (fires on every tick).
    pub fn new(interval_secs: f32) -> Self {
        Self::starting_at(interval_secs, Instant::now())
    }

    /// Creates a timer armed from `start`.
    pub fn starting_at(interval_secs: f32, start: Instant) -> Self {
        Self {
            interval: interval_from_secs(interval_secs),
            last_tick: start,
        }
    }

    /// Configured interval.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timestamp of the last fire (or of construction / reconfiguration).
    #[inline]
    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    /// Samples the clock and reports whether an interval has elapsed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit sample time.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Changes the interval and re-arms the timer from now.
    pub fn set_interval(&mut self, interval_secs: f32) {
        self.set_interval_at(interval_secs, Instant::now());
    }

    /// Changes the interval and re-arms the timer from `now`.
    pub fn set_interval_at(&mut self, interval_secs: f32, now: Instant) {
        self.interval = interval_from_secs(interval_secs);
        self.last_tick = now;
    }
}

/// Whole microseconds; `0.1_f32` is 0.100000001 s and must not become 100000001 ns.
fn interval_from_secs(secs: f32) -> Duration {
    let micros = (f64::from(secs) * 1e6).round();
    if micros.is_finite() && micros >= 0.0 && micros <= u64::MAX as f64 {
        Duration::from_micros(micros as u64)
    } else {
        log::warn!("invalid timer interval {secs}; using zero");
        Duration::ZERO
    }
}
