//! Frame timing helpers

use crate::Millis;

/// Number of frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Tracks frame deltas and a rolling frame rate
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Millis>,
    frame_times: [Millis; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            frame_times: [0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    /// Record a frame at `now`. Returns the time since the previous frame
    /// (zero for the first one).
    pub fn tick(&mut self, now: Millis) -> Millis {
        let delta = self.last.map_or(0, |last| now.saturating_sub(last));
        self.last = Some(now);

        // Oldest sample sits where the new one is about to go
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;
        if self.frames_seen > FPS_WINDOW {
            let elapsed = now.saturating_sub(oldest);
            if elapsed > 0 {
                self.fps = ((FPS_WINDOW as u64 * 1000) as f64 / elapsed as f64).round() as u32;
            }
        }
        delta
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Forget the previous frame so the next delta starts from zero
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Collapses a burst of triggers into the last one, delivered after a quiet
/// period with no further triggers
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Millis,
    pending: Option<(Millis, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Millis) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period
    pub fn trigger(&mut self, now: Millis, value: T) {
        self.pending = Some((now.saturating_add(self.quiet), value));
    }

    /// Take the value once its quiet period has passed
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match self.pending {
            Some((due, _)) if due <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
