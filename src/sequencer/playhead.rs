// Playhead - Live (measure, pulse) cursor during playback
// Ephemeral state, never persisted

/// Playback cursor: which pulse sounds next and when
///
/// `next_event_time` is an absolute timestamp in seconds on the audio clock,
/// the same time base tones are scheduled against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playhead {
    pub measure: usize,
    pub pulse: usize,
    pub next_event_time: f64,
}

impl Playhead {
    pub fn new() -> Self {
        Self {
            measure: 0,
            pulse: 0,
            next_event_time: 0.0,
        }
    }

    /// Back to measure 0, pulse 0 (stop semantics)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Position the cursor for a fresh start at time `at`.
    ///
    /// With more than one measure the cursor starts on the *last* measure so
    /// the first wrap lands on measure 0, giving a count-in on measure 1.
    pub fn begin(&mut self, measure_count: usize, at: f64) {
        self.measure = if measure_count > 1 {
            measure_count - 1
        } else {
            0
        };
        self.pulse = 0;
        self.next_event_time = at;
    }

    /// Step to the next pulse, wrapping pulse and measure indices
    pub fn advance(&mut self, subdivisions: usize, measure_count: usize) {
        self.pulse += 1;
        if self.pulse >= subdivisions {
            self.pulse = 0;
            self.measure = (self.measure + 1) % measure_count;
        }
    }

    /// Clamp indices after a structural edit shrank the sequence or measure.
    /// Uses modulo so a stale cursor maps to a valid position instead of faulting.
    pub fn clamp(&mut self, measure_count: usize, subdivisions: usize) {
        if measure_count > 0 {
            self.measure %= measure_count;
        }
        if subdivisions > 0 {
            self.pulse %= subdivisions;
        }
    }
}

impl Default for Playhead {
    fn default() -> Self {
        Self::new()
    }
}
