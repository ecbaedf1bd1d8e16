//! Wall-clock timing and fixed-rate game time.

use std::time::{Duration, Instant};

/// Longest wall-clock slice accepted per frame, in milliseconds.
pub const MAX_FRAME_MS: f64 = 250.0;

/// Measures wall-clock time since it was started or last restarted.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Restart the timer, returning the milliseconds elapsed before.
    pub fn restart(&mut self) -> f64 {
        let ms = self.elapsed_ms();
        self.started = Instant::now();
        ms
    }
}

/// Turns irregular frame slices into a fixed sequence of game ticks.
///
/// Wall-clock time is accumulated and handed out one tick at a time;
/// [`next_tick`](Self::next_tick) returns the game time after each tick.
/// A slice longer than [`MAX_FRAME_MS`] is clamped, so a stalled process
/// does not replay a burst of ticks when it resumes.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_ms: f64,
    accumulator: f64,
    game_time: f64,
}

impl FrameClock {
    /// Clock producing `framerate` ticks per second. Non-positive rates
    /// fall back to one tick per second.
    pub fn new(framerate: f64) -> Self {
        let rate = if framerate > 0.0 { framerate } else { 1.0 };
        Self {
            tick_ms: 1000.0 / rate,
            accumulator: 0.0,
            game_time: 0.0,
        }
    }

    /// Length of one tick in milliseconds.
    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Game time reached so far, in milliseconds.
    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Add a wall-clock slice in milliseconds.
    pub fn accumulate(&mut self, slice_ms: f64) {
        self.accumulator += slice_ms.clamp(0.0, MAX_FRAME_MS);
    }

    /// Consume one tick if enough time has accumulated.
    pub fn next_tick(&mut self) -> Option<f64> {
        if self.accumulator < self.tick_ms {
            return None;
        }
        self.accumulator -= self.tick_ms;
        self.game_time += self.tick_ms;
        Some(self.game_time)
    }

    /// Wall-clock time until the next tick is due.
    pub fn until_next(&self) -> Duration {
        let ms = (self.tick_ms - self.accumulator).max(0.0);
        Duration::from_secs_f64(ms / 1000.0)
    }

    /// Start game time again from zero.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.game_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_restart() {
        let mut t = Timer::new();
        std::thread::sleep(Duration::from_millis(2));
        let first = t.restart();
        assert!(first >= 2.0);
        assert!(t.elapsed_ms() < first + 1000.0);
    }

    #[test]
    fn ticks_are_fixed() {
        let mut c = FrameClock::new(50.0);
        assert_eq!(c.tick_ms(), 20.0);
        c.accumulate(45.0);
        assert_eq!(c.next_tick(), Some(20.0));
        assert_eq!(c.next_tick(), Some(40.0));
        assert_eq!(c.next_tick(), None);
        c.accumulate(15.0);
        assert_eq!(c.next_tick(), Some(60.0));
        assert_eq!(c.game_time(), 60.0);
    }

    #[test]
    fn long_slices_are_clamped() {
        let mut c = FrameClock::new(100.0);
        c.accumulate(10_000.0);
        let mut ticks = 0;
        while c.next_tick().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 25);
        c.accumulate(-40.0);
        assert_eq!(c.next_tick(), None);
    }

    #[test]
    fn reset_and_bad_rate() {
        let mut c = FrameClock::new(0.0);
        assert_eq!(c.tick_ms(), 1000.0);
        c.accumulate(250.0);
        assert_eq!(c.until_next(), Duration::from_millis(750));
        c.reset();
        assert_eq!(c.game_time(), 0.0);
        assert_eq!(c.next_tick(), None);
    }
}
