//! Frame timing for the headless loop.
//!
//! The simulation always advances by a fixed step so a run is reproducible
//! for a given seed; wall-clock time is only measured, and optionally used
//! to pace frames.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Fixed-step frame clock.
#[derive(Debug)]
pub struct FrameClock {
    /// Simulated seconds per frame
    fixed_dt: f32,
    /// Wall-clock budget per frame
    frame_budget: Duration,
    /// Sleep out the remainder of each frame's budget
    realtime: bool,
    /// Start of the current frame
    frame_start: Instant,
    /// Recent wall-clock frame times in seconds
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
    /// Frames completed
    frames: u64,
    /// Simulated seconds elapsed
    sim_time: f64,
}

impl FrameClock {
    /// Create a clock running at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32, realtime: bool) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            fixed_dt: 1.0 / target_fps as f32,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            realtime,
            frame_start: Instant::now(),
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            frames: 0,
            sim_time: 0.0,
        }
    }

    /// Simulated seconds per frame.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Ends the current frame and starts the next.
    ///
    /// Returns the fixed step to simulate.
    pub fn advance(&mut self) -> f32 {
        if self.realtime {
            let elapsed = self.frame_start.elapsed();
            if elapsed < self.frame_budget {
                std::thread::sleep(self.frame_budget - elapsed);
            }
        }

        let now = Instant::now();
        self.frame_times
            .push_back((now - self.frame_start).as_secs_f32());
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_start = now;

        self.frames += 1;
        self.sim_time += f64::from(self.fixed_dt);
        self.fixed_dt
    }

    /// Frames completed.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds elapsed.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Average wall-clock frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        (self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new(60, false);
        assert!((clock.fixed_dt() - 1.0 / 60.0).abs() < 0.001);
        assert_eq!(clock.frames(), 0);
        assert_eq!(clock.average_frame_time_ms(), 0.0);
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let clock = FrameClock::new(0, false);
        assert!((clock.fixed_dt() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_advance_is_fixed_step() {
        let mut clock = FrameClock::new(50, false);
        for _ in 0..100 {
            assert!((clock.advance() - 0.02).abs() < f32::EPSILON);
        }
        assert_eq!(clock.frames(), 100);
        assert!((clock.sim_time() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_frame_times_are_bounded() {
        let mut clock = FrameClock::new(60, false);
        for _ in 0..500 {
            clock.advance();
        }
        assert!(clock.frame_times.len() <= clock.max_samples);
        assert!(clock.average_frame_time_ms() >= 0.0);
    }

    #[test]
    fn test_realtime_paces_frames() {
        let mut clock = FrameClock::new(100, true);
        let start = Instant::now();
        for _ in 0..5 {
            clock.advance();
        }
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
