use std::time;

// ----------------------------------------------
// FrameClock
// ----------------------------------------------

pub type Seconds = f32;

// Measures the wall-clock time between frames, or hands out a fixed
// step when the frame loop must be reproducible (headless replays, tests).
pub struct FrameClock {
    last_frame_time: time::Instant,
    delta_time: time::Duration,
    fixed_step: Option<Seconds>,
    frame_count: u64,
}

impl FrameClock {
    #[inline]
    pub fn new() -> Self {
        Self {
            last_frame_time: time::Instant::now(),
            delta_time: time::Duration::new(0, 0),
            fixed_step: None,
            frame_count: 0,
        }
    }

    #[inline]
    pub fn with_fixed_step(step: Seconds) -> Self {
        debug_assert!(step > 0.0);
        Self { fixed_step: Some(step), ..Self::new() }
    }

    #[inline]
    pub fn begin_frame(&self) {}

    #[inline]
    pub fn end_frame(&mut self) {
        let time_now = time::Instant::now();
        self.delta_time = time_now - self.last_frame_time;
        self.last_frame_time = time_now;
        self.frame_count += 1;
    }

    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> Seconds {
        self.fixed_step.unwrap_or_else(|| self.delta_time.as_secs_f32())
    }

    // Real time spent in the last frame, regardless of any fixed step.
    #[inline]
    #[must_use]
    pub fn wall_delta_time(&self) -> Seconds {
        self.delta_time.as_secs_f32()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
