use std::time::{Duration, Instant};

/// Fixed-cadence tick source for driving [`GameEngine::tick`](crate::GameEngine::tick).
///
/// The cadence is independent of the drop speed: the engine decides on each
/// tick whether enough time has passed for an automatic drop. A stopped ticker
/// never fires; restarting it establishes a fresh cadence, so ticks missed
/// while stopped are not replayed.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use neotris_engine::Ticker;
///
/// let start = Instant::now();
/// let mut ticker = Ticker::from_rate(60.0);
/// ticker.restart(start);
///
/// assert_eq!(ticker.poll(start + Duration::from_millis(5)), None);
/// assert!(ticker.poll(start + Duration::from_millis(20)).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl Ticker {
    pub const DEFAULT_RATE: f64 = 60.0;

    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Creates a ticker firing `rate` times per second.
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / rate))
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Starts (or restarts) the cadence at `now`.
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Cancels the periodic tick.
    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    /// Returns the time elapsed since the previous tick if a tick is due.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let last_tick = self.last_tick?;
        let elapsed = now.saturating_duration_since(last_tick);
        if elapsed < self.interval {
            return None;
        }
        self.last_tick = Some(now);
        Some(elapsed)
    }

    /// Time left until the next tick is due, or `None` when stopped.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.last_tick? + self.interval;
        Some(next_tick_at.saturating_duration_since(now))
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::from_rate(Self::DEFAULT_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_ticker_never_fires() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(10));
        assert!(!ticker.is_running());
        assert_eq!(ticker.poll(start + Duration::from_secs(5)), None);
        assert_eq!(ticker.time_until_next(start), None);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.restart(start);

        assert_eq!(ticker.poll(start + Duration::from_millis(9)), None);
        assert_eq!(
            ticker.poll(start + Duration::from_millis(12)),
            Some(Duration::from_millis(12))
        );
        assert_eq!(ticker.poll(start + Duration::from_millis(15)), None);
        assert_eq!(
            ticker.time_until_next(start + Duration::from_millis(15)),
            Some(Duration::from_millis(7))
        );
    }

    #[test]
    fn test_restart_after_stop_does_not_burst() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.restart(start);
        ticker.stop();

        let resumed_at = start + Duration::from_secs(30);
        ticker.restart(resumed_at);
        assert_eq!(ticker.poll(resumed_at + Duration::from_millis(1)), None);
        assert_eq!(
            ticker.poll(resumed_at + Duration::from_millis(10)),
            Some(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_default_rate_is_sixty_hertz() {
        let ticker = Ticker::default();
        let expected = Duration::from_secs_f64(1.0 / 60.0);
        assert_eq!(ticker.interval(), expected);
    }
}
