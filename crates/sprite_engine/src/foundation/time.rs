//! Time management utilities

use std::time::Instant;

/// Frame clock driven by host timestamps.
///
/// The host hands the driver a monotonically increasing timestamp in
/// milliseconds (the display-refresh callback). The clock turns it into a
/// delta in seconds, clamped to `max_delta` so a stalled tab or a debugger
/// break does not produce one giant simulation step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl FrameClock {
    /// Create a new clock with the given delta clamp in seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_timestamp: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta,
        }
    }

    /// Advance to a host timestamp (milliseconds). Returns the delta in seconds.
    ///
    /// The first tick yields zero. Timestamps going backwards yield zero.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        self.delta_time = match self.last_timestamp {
            None => 0.0,
            Some(last) => {
                let seconds = ((timestamp_ms - last) / 1000.0).max(0.0);
                #[allow(clippy::cast_possible_truncation)]
                let seconds = seconds as f32;
                seconds.min(self.max_delta)
            }
        };
        self.last_timestamp = Some(timestamp_ms);
        self.total_time += f64::from(self.delta_time);
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time in seconds
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}

/// Wall-clock timer for profiling the loop and the batch renderer
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now
    pub fn start_new() -> Self {
        Self { started: Instant::now() }
    }

    /// Microseconds since the stopwatch was started
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
