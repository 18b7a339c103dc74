//! Frame timing utilities

use std::thread;
use std::time::{Duration, Instant};

/// Measures the wall-clock delta between successive frames.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    /// Start the clock. The first [`tick`](Self::tick) reports the time
    /// elapsed since this call.
    pub fn start() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        delta
    }
}

/// Paces a loop to a fixed logical timestep by sleeping off the remainder
/// of each step.
pub struct FixedStep {
    step: Duration,
    next: Instant,
}

impl FixedStep {
    /// Create a pacer with the given step length.
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            next: Instant::now() + step,
        }
    }

    /// Length of one logical step in seconds.
    pub fn step_seconds(&self) -> f64 {
        self.step.as_secs_f64()
    }

    /// Sleep until the next step boundary.
    ///
    /// A loop that overruns its step does not accumulate a backlog; the
    /// schedule restarts from the current time instead.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            thread::sleep(remaining);
            self.next += self.step;
        } else {
            self.next = now + self.step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut clock = FrameClock::start();
        thread::sleep(Duration::from_millis(5));
        let delta = clock.tick();
        assert!(delta >= 0.005);
        // The second tick measures from the first, not from start.
        let delta = clock.tick();
        assert!(delta < 0.1);
    }

    #[test]
    fn test_fixed_step_paces_the_loop() {
        let mut pacer = FixedStep::new(Duration::from_millis(2));
        let begin = Instant::now();
        for _ in 0..3 {
            pacer.wait();
        }
        assert!(begin.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_step_seconds() {
        let pacer = FixedStep::new(Duration::from_millis(10));
        assert!((pacer.step_seconds() - 0.010).abs() < 1e-9);
    }
}
