use std::time::Instant;

/// Converts audio frames consumed by the output stream into elapsed seconds.
///
/// The output callback is the heartbeat of the update loop: every callback
/// reports how many frames it rendered, and the clock turns that into the
/// time delta handed to whatever is being ticked.
#[derive(Debug, Clone)]
pub struct FrameClock {
    sample_rate: f64,
    frame_position: u64,
    running: bool,
}

impl FrameClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            frame_position: 0,
            running: true,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Advances the clock and returns the elapsed time in seconds.
    /// A stopped clock does not move and reports no elapsed time.
    pub fn advance_by(&mut self, frames: u64) -> Option<f64> {
        if !self.running {
            return None;
        }

        self.frame_position += frames;
        Some(self.frames_to_seconds(frames))
    }

    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate
    }

    pub fn frame_position(&self) -> u64 {
        self.frame_position
    }

    /// Total time rendered since the last reset.
    pub fn elapsed_seconds(&self) -> f64 {
        self.frames_to_seconds(self.frame_position)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.frame_position = 0;
    }
}

/// Monotonic wall-clock delta source for update loops that are not driven
/// by an audio callback.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since construction).
    pub fn delta(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        delta
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FrameClock {
    pub fn mock_set_frame_position(&mut self, value: u64) {
        self.frame_position = value;
    }
}
