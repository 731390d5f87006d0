//! Playback scheduling integration tests
//!
//! Drives the look-ahead scheduler through the public API with a simulated
//! clock and recording sinks, covering multi-measure sequences, live edits,
//! and the audio clock feeding the scheduler.

use rhythm_weaver::audio::timing::AudioTiming;
use rhythm_weaver::sequencer::{
    Clock, LOOK_AHEAD_SECS, LookAheadScheduler, PatternStore, Pulse, START_DELAY_SECS,
    TICK_INTERVAL_MS, ToneSink, TransportState, VisualSink,
};
use rhythm_weaver::ClickType;
use std::cell::Cell;

const TICK_SECS: f64 = TICK_INTERVAL_MS as f64 / 1000.0;

struct SimClock {
    time: Cell<f64>,
}

impl SimClock {
    fn new() -> Self {
        Self {
            time: Cell::new(0.0),
        }
    }

    fn step(&self, delta: f64) {
        self.time.set(self.time.get() + delta);
    }
}

impl Clock for SimClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}

#[derive(Default)]
struct RecordingTones {
    scheduled: Vec<(f64, ClickType)>,
}

impl ToneSink for RecordingTones {
    fn schedule_tone(&mut self, at: f64, click: ClickType) {
        self.scheduled.push((at, click));
    }
}

#[derive(Default)]
struct RecordingVisuals {
    pulses: Vec<(usize, usize)>,
}

impl VisualSink for RecordingVisuals {
    fn on_pulse_due(&mut self, measure: usize, pulse: usize, _delay_ms: f64) {
        self.pulses.push((measure, pulse));
    }
}

struct Harness {
    scheduler: LookAheadScheduler,
    clock: SimClock,
    tones: RecordingTones,
    visuals: RecordingVisuals,
}

impl Harness {
    fn new() -> Self {
        Self {
            scheduler: LookAheadScheduler::new(),
            clock: SimClock::new(),
            tones: RecordingTones::default(),
            visuals: RecordingVisuals::default(),
        }
    }

    fn start(&mut self, store: &PatternStore) {
        self.scheduler
            .start(store, &self.clock)
            .expect("start with measures");
    }

    /// Run the tick loop for `seconds` of simulated time
    fn run(&mut self, store: &PatternStore, seconds: f64) {
        let ticks = (seconds / TICK_SECS).ceil() as usize;
        for _ in 0..ticks {
            self.scheduler
                .tick(store, &self.clock, &mut self.tones, &mut self.visuals);
            self.clock.step(TICK_SECS);
        }
    }
}

#[test]
fn test_mixed_subdivisions_produce_exact_timestamps() {
    // Measure 1: 2 subdivisions at tempo 60 -> 0.5s per pulse
    // Measure 2: 4 subdivisions at tempo 60 -> 0.25s per pulse
    let mut store = PatternStore::new();
    store.add_measure();
    store.add_measure();
    store.set_subdivisions(0, 2);
    store.set_tempo(60);

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 4.0);

    // Count-in: playback begins on the last measure, then wraps to the first
    let order: Vec<usize> = harness
        .visuals
        .pulses
        .iter()
        .take(6)
        .map(|(measure, _)| *measure)
        .collect();
    assert_eq!(order, vec![1, 1, 1, 1, 0, 0]);

    let times: Vec<f64> = harness.tones.scheduled.iter().map(|(at, _)| *at).collect();
    let expected = [
        START_DELAY_SECS,          // measure 1, four pulses of 0.25s
        START_DELAY_SECS + 0.25,
        START_DELAY_SECS + 0.5,
        START_DELAY_SECS + 0.75,
        START_DELAY_SECS + 1.0,    // measure 0, two pulses of 0.5s
        START_DELAY_SECS + 1.5,
        START_DELAY_SECS + 2.0,    // back to measure 1
    ];
    assert!(times.len() >= expected.len());
    for (at, want) in times.iter().zip(expected.iter()) {
        assert!((at - want).abs() < 1e-9, "got {} want {}", at, want);
    }
}

#[test]
fn test_accents_map_to_high_clicks() {
    let mut store = PatternStore::new();
    store.add_measure();
    store.set_subdivisions(0, 3);
    store.set_pulse(0, 1, Pulse::Silent);

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 2.0);

    // Pattern [Accent, Silent, On]: tones alternate accent / regular with
    // the silent slot absent from the tone stream
    assert!(harness.tones.scheduled.len() >= 4);
    assert_eq!(harness.tones.scheduled[0].1, ClickType::Accent);
    assert_eq!(harness.tones.scheduled[1].1, ClickType::Regular);
    assert_eq!(harness.tones.scheduled[2].1, ClickType::Accent);

    // Visuals still fire for the silent slot
    assert!(harness.visuals.pulses.iter().any(|(_, pulse)| *pulse == 1));
}

#[test]
fn test_live_edits_take_effect_mid_playback() {
    let mut store = PatternStore::new();
    store.add_measure();

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 0.5);

    // Growing the playing measure changes the pulse grid from the next
    // scheduled pulse onward, without a restart
    store.set_subdivisions(0, 8);
    harness.run(&store, 1.0);

    let max_pulse = harness
        .visuals
        .pulses
        .iter()
        .map(|(_, pulse)| *pulse)
        .max()
        .unwrap_or(0);
    assert_eq!(max_pulse, 7);
    assert_eq!(harness.scheduler.state(), TransportState::Playing);
}

#[test]
fn test_removing_all_measures_stops_playback() {
    let mut store = PatternStore::new();
    store.add_measure();

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 0.5);
    let scheduled_before = harness.tones.scheduled.len();
    assert!(scheduled_before > 0);

    store.remove_measure(0);
    harness.run(&store, 1.0);

    // No new tones; the transport stopped itself and reset the cursor
    assert_eq!(harness.tones.scheduled.len(), scheduled_before);
    assert_eq!(harness.scheduler.state(), TransportState::Stopped);
    let playhead = harness.scheduler.playhead();
    assert_eq!((playhead.measure, playhead.pulse), (0, 0));

    // Playback needs an explicit restart after the sequence refills
    store.add_measure();
    harness.run(&store, 0.5);
    assert_eq!(harness.tones.scheduled.len(), scheduled_before);
    harness.start(&store);
    harness.run(&store, 0.5);
    assert!(harness.tones.scheduled.len() > scheduled_before);
}

#[test]
fn test_pause_resume_full_cycle() {
    let mut store = PatternStore::new();
    store.add_measure();
    store.add_measure();

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 0.6);

    harness.scheduler.pause();
    let paused_at = harness.scheduler.playhead();
    let scheduled_at_pause = harness.tones.scheduled.len();

    // Nothing scheduled while paused, however long it lasts
    harness.run(&store, 10.0);
    assert_eq!(harness.tones.scheduled.len(), scheduled_at_pause);

    harness.scheduler.resume(&harness.clock);
    let resumed = harness.scheduler.playhead();
    assert_eq!(
        (resumed.measure, resumed.pulse),
        (paused_at.measure, paused_at.pulse)
    );

    harness.run(&store, 0.5);
    let first_after_resume = harness.tones.scheduled[scheduled_at_pause].0;
    // Resumed pulses are in the future, not a catch-up burst from the pause
    assert!(first_after_resume >= 10.0);
}

#[test]
fn test_stop_discards_the_cursor() {
    let mut store = PatternStore::new();
    store.add_measure();
    store.add_measure();

    let mut harness = Harness::new();
    harness.start(&store);
    harness.run(&store, 1.0);

    harness.scheduler.stop();
    assert_eq!(harness.scheduler.state(), TransportState::Stopped);
    let stopped = harness.scheduler.playhead();
    assert_eq!((stopped.measure, stopped.pulse), (0, 0));

    // Restart goes through the count-in again
    harness.tones.scheduled.clear();
    harness.visuals.pulses.clear();
    harness.start(&store);
    harness.run(&store, 0.3);
    assert_eq!(harness.visuals.pulses[0].0, 1);
}

#[test]
fn test_max_rate_stays_bounded_per_tick() {
    // 300 BPM, 16 subdivisions: 12.5ms pulses, the densest possible grid.
    // Each tick must queue only what fits the look-ahead horizon.
    let mut store = PatternStore::new();
    store.add_measure();
    store.set_tempo(300);
    store.set_subdivisions(0, 16);

    let mut harness = Harness::new();
    harness.start(&store);
    harness.clock.step(START_DELAY_SECS);

    let pulse_duration = 60.0 / 300.0 / 16.0;
    let per_horizon = (LOOK_AHEAD_SECS / pulse_duration) as usize + 1;

    harness
        .scheduler
        .tick(&store, &harness.clock, &mut harness.tones, &mut harness.visuals);
    assert!(harness.visuals.pulses.len() <= per_horizon + 1);

    // Steady state: one second of playback yields ~80 pulses, not more
    harness.run(&store, 1.0);
    let total = harness.visuals.pulses.len();
    assert!((70..=95).contains(&total), "got {} pulses", total);
}

#[test]
fn test_audio_clock_drives_the_scheduler() {
    // The sample counter clock advances only when the (simulated) callback
    // consumes frames; scheduling must follow it, not wall time
    let mut store = PatternStore::new();
    store.add_measure();

    let timing = AudioTiming::new(48000.0);
    let mut scheduler = LookAheadScheduler::new();
    let mut tones = RecordingTones::default();
    let mut visuals = RecordingVisuals::default();

    scheduler.start(&store, &timing).unwrap();
    scheduler.tick(&store, &timing, &mut tones, &mut visuals);
    assert!(tones.scheduled.is_empty());

    // Simulate the callback consuming 0.125s of audio in 512-frame buffers
    for _ in 0..12 {
        timing.advance(512);
        scheduler.tick(&store, &timing, &mut tones, &mut visuals);
    }

    assert!(!tones.scheduled.is_empty());
    let first = tones.scheduled[0].0;
    assert!((first - START_DELAY_SECS).abs() < 1e-9);
}
