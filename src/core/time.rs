//! Frame timing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame-rate statistics over the retained samples
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FpsWindow {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

/// Records presented frames and keeps the most recent intervals for FPS
/// statistics. Time is supplied by the caller.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Option<Instant>,
    frame_count: u64,
    intervals: VecDeque<f32>,
    capacity: usize,
}

impl FrameTimer {
    /// Intervals kept for statistics, about two seconds at 60 Hz
    pub const DEFAULT_CAPACITY: usize = 120;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last_frame: None,
            frame_count: 0,
            intervals: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a frame presented at `now` and return the interval since the
    /// previous one (zero for the first frame).
    pub fn record(&mut self, now: Instant) -> Duration {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        if self.last_frame.is_some() {
            if self.intervals.len() == self.capacity {
                self.intervals.pop_front();
            }
            self.intervals.push_back(delta.as_secs_f32());
        }
        self.last_frame = Some(now);
        self.frame_count += 1;
        delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps_window(&self) -> FpsWindow {
        let rates: Vec<f32> = self
            .intervals
            .iter()
            .filter(|&&dt| dt > 0.0)
            .map(|dt| 1.0 / dt)
            .collect();
        if rates.is_empty() {
            return FpsWindow::default();
        }

        let total: f32 = self.intervals.iter().sum();
        FpsWindow {
            avg: self.intervals.len() as f32 / total,
            min: rates.iter().copied().fold(f32::INFINITY, f32::min),
            max: rates.iter().copied().fold(0.0, f32::max),
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_no_interval() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.record(Instant::now()), Duration::ZERO);
        assert_eq!(timer.frame_count(), 1);
        assert_eq!(timer.fps_window(), FpsWindow::default());
    }

    #[test]
    fn test_fps_from_intervals() {
        let mut timer = FrameTimer::new();
        let t0 = Instant::now();
        timer.record(t0);
        timer.record(t0 + Duration::from_millis(10));
        timer.record(t0 + Duration::from_millis(30));

        let fps = timer.fps_window();
        assert!((fps.max - 100.0).abs() < 0.5);
        assert!((fps.min - 50.0).abs() < 0.5);
        assert!((fps.avg - 2.0 / 0.03).abs() < 0.5);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut timer = FrameTimer::with_capacity(2);
        let t0 = Instant::now();
        timer.record(t0);
        timer.record(t0 + Duration::from_millis(100));
        timer.record(t0 + Duration::from_millis(110));
        timer.record(t0 + Duration::from_millis(120));

        // The 100 ms interval has aged out
        assert!((timer.fps_window().min - 100.0).abs() < 0.5);
        assert_eq!(timer.frame_count(), 4);
    }
}
