//! Variable-timestep frame clock.
//!
//! Every frame advances the scene by the wall-clock time since the previous
//! frame, so rotation keeps pace with real time even across stalls.

use std::time::Instant;
use tracing::warn;

/// Frames longer than this, in seconds, are logged as stalls.
pub const STALL_THRESHOLD: f64 = 0.25;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
}

pub struct FrameClock {
    previous_time: Instant,
    elapsed: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Restarts delta measurement from now without touching `elapsed`.
    ///
    /// Called once initialization finishes so asset loading does not count as
    /// the first frame.
    pub fn reset(&mut self) {
        self.previous_time = Instant::now();
    }

    /// Measures the time since the previous call.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time)
    }

    /// Advances by an explicit frame time in seconds.
    pub fn advance(&mut self, frame_time: f64) -> FrameTime {
        let frame_time = frame_time.max(0.0);
        if frame_time > STALL_THRESHOLD {
            warn!("Frame took {:.1}ms", frame_time * 1000.0);
        }
        self.elapsed += frame_time;
        self.frame_count += 1;
        FrameTime {
            dt: frame_time as f32,
            elapsed: self.elapsed as f32,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_reports_delta_and_elapsed() {
        let mut clock = FrameClock::new();
        let first = clock.advance(0.016);
        let second = clock.advance(0.020);
        assert!((first.dt - 0.016).abs() < 1e-6);
        assert!((second.dt - 0.020).abs() < 1e-6);
        assert!((second.elapsed - 0.036).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_long_frame_is_not_shortened() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        let frame = clock.advance(2.0);
        assert_eq!(frame.dt, 2.0);
        assert_eq!(frame.elapsed, 2.5);
        assert_eq!(clock.elapsed(), 2.5);
    }

    #[test]
    fn test_negative_frame_time_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0).dt, 0.0);
    }

    #[test]
    fn test_stall_keeps_rotation_in_step_with_wall_clock() {
        use orrery_scene::{Body, default_solar_system};

        let earth = default_solar_system().remove(1);
        assert_eq!(earth.name, "earth");
        let mut body = Body::new(earth.clone());
        let mut clock = FrameClock::new();
        let frame = clock.advance(2.0);
        body.advance(frame.dt);
        let expected = std::f32::consts::PI * 2.0 * 2.0 / (60.0 * earth.period_days);
        assert!((body.orientation.y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_tick_measures_wall_clock() {
        let mut clock = FrameClock::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let frame = clock.tick();
        assert!(frame.dt >= 0.004);
        assert!(frame.dt < 5.0);
    }

    #[test]
    fn test_default_starts_at_zero() {
        let clock = FrameClock::default();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }
}
