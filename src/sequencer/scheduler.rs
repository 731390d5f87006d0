// Look-ahead scheduler - The timing core
// Decouples the coarse tick from sample-accurate tone scheduling:
// each tick fills a rolling horizon of future events against the audio clock

use crate::audio::click::ClickType;
use crate::sequencer::pattern::PatternStore;
use crate::sequencer::playhead::Playhead;
use crate::sequencer::transport::{TransportError, TransportState};

/// How often the driver invokes `tick`, in milliseconds
pub const TICK_INTERVAL_MS: u64 = 25;

/// How far into the future events are queued on every tick, in seconds.
/// Must comfortably exceed the tick interval plus worst-case timer jitter.
pub const LOOK_AHEAD_SECS: f64 = 0.1;

/// Delay between pressing start and the first pulse, in seconds
pub const START_DELAY_SECS: f64 = 0.1;

/// Monotonic clock in the audio time base, in seconds.
/// Must match the time base of `ToneSink::schedule_tone`.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Audio collaborator: accepts future-timestamped tone requests.
/// Requests are fire-and-forget; they cannot be revoked once scheduled.
pub trait ToneSink {
    fn schedule_tone(&mut self, at: f64, click: ClickType);
}

/// Visual collaborator: fires a highlight after `delay_ms`.
/// Best-effort only; deliveries may arrive after playback state has moved on.
pub trait VisualSink {
    fn on_pulse_due(&mut self, measure: usize, pulse: usize, delay_ms: f64);
}

/// The look-ahead scheduler
///
/// Owns the playhead and the transport state. On every tick it pulls pulse
/// values from the pattern store, schedules audible pulses at precise
/// timestamps, emits a visual trigger for every pulse, and advances the
/// cursor. The store is re-read fresh on each pulse, so structural edits
/// between ticks take effect without any special-casing.
#[derive(Debug, Default)]
pub struct LookAheadScheduler {
    state: TransportState,
    playhead: Playhead,
}

impl LookAheadScheduler {
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
            playhead: Playhead::new(),
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn playhead(&self) -> Playhead {
        self.playhead
    }

    /// Start playback from the count-in position.
    /// Fails without a state change when the sequence has no measures.
    pub fn start(
        &mut self,
        store: &PatternStore,
        clock: &impl Clock,
    ) -> Result<(), TransportError> {
        if store.is_empty() {
            return Err(TransportError::NoMeasures);
        }
        self.playhead.begin(store.len(), clock.now() + START_DELAY_SECS);
        self.state = TransportState::Playing;
        Ok(())
    }

    /// Halt ticking but remember the cursor for resume
    pub fn pause(&mut self) {
        if self.state.is_playing() {
            self.state = TransportState::Paused;
        }
    }

    /// Continue from the remembered cursor.
    ///
    /// The stale `next_event_time` is re-anchored to the clock; without this
    /// the horizon loop would burst-fire every pulse missed while paused.
    pub fn resume(&mut self, clock: &impl Clock) {
        if self.state == TransportState::Paused {
            self.playhead.next_event_time = clock.now() + START_DELAY_SECS;
            self.state = TransportState::Playing;
        }
    }

    /// Stop playback and reset the cursor to measure 0, pulse 0.
    /// Tones already scheduled within the horizon are allowed to finish.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.playhead.reset();
    }

    /// One scheduling pass: queue every pulse due within the look-ahead
    /// horizon, then advance the cursor past them.
    ///
    /// Bounded by the horizon, so it terminates in a small fixed number of
    /// iterations per tick even at maximum tempo and subdivisions.
    pub fn tick(
        &mut self,
        store: &PatternStore,
        clock: &impl Clock,
        tones: &mut impl ToneSink,
        visuals: &mut impl VisualSink,
    ) {
        if !self.state.is_playing() {
            return;
        }

        loop {
            // All measures may have been removed between ticks; with nothing
            // left to play this is a stop, cursor included
            if store.is_empty() {
                self.stop();
                return;
            }

            let now = clock.now();
            if self.playhead.next_event_time >= now + LOOK_AHEAD_SECS {
                return;
            }

            // Re-read shape fresh: edits since the last pulse take effect here,
            // and a cursor left out of range by a removal is clamped
            self.playhead.measure %= store.len();
            let Some(measure) = store.measure(self.playhead.measure) else {
                return;
            };
            let subdivisions = measure.subdivisions();
            self.playhead.pulse %= subdivisions;

            // Tempo is read live, so a change lands on the next pulse boundary
            let pulse_duration = 60.0 / store.tempo() as f64 / subdivisions as f64;

            let pulse = measure.pattern()[self.playhead.pulse];
            if let Some(click) = pulse.click_type() {
                tones.schedule_tone(self.playhead.next_event_time, click);
            }

            let delay_ms = ((self.playhead.next_event_time - now) * 1000.0).max(0.0);
            visuals.on_pulse_due(self.playhead.measure, self.playhead.pulse, delay_ms);

            self.playhead.next_event_time += pulse_duration;
            self.playhead.advance(subdivisions, store.len());
        }
    }
}
