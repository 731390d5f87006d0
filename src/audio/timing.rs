// Audio timing - Shared sample-position clock
// The audio callback advances it; everyone else reads it

use crate::sequencer::scheduler::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic clock in the audio time base
///
/// Counts frames rendered by the output stream, which makes it the same
/// time base tones are scheduled against. Cheap to clone and share.
#[derive(Clone)]
pub struct AudioTiming {
    /// Current sample position (incremented by the audio callback)
    sample_position: Arc<AtomicU64>,
    sample_rate: f64,
}

impl AudioTiming {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_position: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate as f64,
        }
    }

    /// Current sample position
    pub fn current_sample(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    /// Advance the position (called from the audio callback)
    pub fn advance(&self, frames: usize) {
        self.sample_position
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Convert an absolute time in seconds to a sample position
    pub fn seconds_to_samples(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate) as u64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }
}

impl Clock for AudioTiming {
    /// Seconds since the stream started
    fn now(&self) -> f64 {
        self.current_sample() as f64 / self.sample_rate
    }
}
