// Pattern store - Ordered sequence of measures plus tempo
// Pure data and edit operations, no timing logic

use crate::sequencer::pulse::Pulse;

/// Tempo bounds in BPM
pub const MIN_TEMPO: u32 = 1;
pub const MAX_TEMPO: u32 = 300;

/// Default tempo used for new and recovered sessions
pub const DEFAULT_TEMPO: u32 = 120;

/// Subdivision bounds per measure
pub const MIN_SUBDIVISIONS: usize = 1;
pub const MAX_SUBDIVISIONS: usize = 16;

/// One measure: a pattern of pulses played over one bar
///
/// Invariant: `pattern.len() == subdivisions` at all times. Resizing pads
/// with `Pulse::On` when growing and truncates when shrinking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Measure {
    subdivisions: usize,
    pattern: Vec<Pulse>,
}

impl Measure {
    /// New measure with the default pattern: accent on the first pulse
    pub fn new() -> Self {
        Self {
            subdivisions: 4,
            pattern: vec![Pulse::Accent, Pulse::On, Pulse::On, Pulse::On],
        }
    }

    /// Build a measure from explicit parts
    /// Returns None if the parts violate the measure invariant
    pub fn from_parts(subdivisions: usize, pattern: Vec<Pulse>) -> Option<Self> {
        if !(MIN_SUBDIVISIONS..=MAX_SUBDIVISIONS).contains(&subdivisions)
            || pattern.len() != subdivisions
        {
            return None;
        }
        Some(Self {
            subdivisions,
            pattern,
        })
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn pattern(&self) -> &[Pulse] {
        &self.pattern
    }

    pub fn pulse(&self, index: usize) -> Option<Pulse> {
        self.pattern.get(index).copied()
    }

    /// Whether the serialized form satisfies the measure invariant
    /// Deserialization alone cannot enforce it, so session loading checks this
    pub fn is_well_formed(&self) -> bool {
        (MIN_SUBDIVISIONS..=MAX_SUBDIVISIONS).contains(&self.subdivisions)
            && self.pattern.len() == self.subdivisions
    }

    fn resize(&mut self, subdivisions: usize) {
        self.pattern.resize(subdivisions, Pulse::On);
        self.subdivisions = subdivisions;
    }
}

impl Default for Measure {
    fn default() -> Self {
        Self::new()
    }
}

/// The pattern store: playback-ordered measures, tempo, and the editor cursor
///
/// The editing index tracks which measure the external editor currently
/// displays. It is always either None or a valid index into the measure list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternStore {
    measures: Vec<Measure>,
    tempo: u32,
    editing_index: Option<usize>,
}

impl PatternStore {
    /// Empty store at the default tempo
    pub fn new() -> Self {
        Self {
            measures: Vec::new(),
            tempo: DEFAULT_TEMPO,
            editing_index: None,
        }
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn measure(&self, index: usize) -> Option<&Measure> {
        self.measures.get(index)
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Set tempo, clamped to [MIN_TEMPO, MAX_TEMPO]
    /// Takes effect at the next pulse boundary during playback
    pub fn set_tempo(&mut self, bpm: u32) {
        self.tempo = bpm.clamp(MIN_TEMPO, MAX_TEMPO);
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing_index
    }

    /// Point the editor at a measure; out-of-range requests are ignored
    pub fn set_editing_index(&mut self, index: usize) {
        if index < self.measures.len() {
            self.editing_index = Some(index);
        }
    }

    pub fn clear_editing_index(&mut self) {
        self.editing_index = None;
    }

    /// Append a new measure with the default pattern
    pub fn add_measure(&mut self) {
        self.measures.push(Measure::new());
    }

    /// Remove the measure at `index`; no-op when out of range
    ///
    /// The editing index follows the invariant: it resets when the edited
    /// measure is removed and shifts down when an earlier one is removed.
    /// Stopping playback first when the removed measure is the one currently
    /// playing is the caller's responsibility.
    pub fn remove_measure(&mut self, index: usize) {
        if index >= self.measures.len() {
            return;
        }
        self.measures.remove(index);
        match self.editing_index {
            Some(editing) if editing == index => self.editing_index = None,
            Some(editing) if editing > index => self.editing_index = Some(editing - 1),
            _ => {}
        }
    }

    /// Change a measure's subdivision count
    /// Rejected without mutation when `index` or `subdivisions` is out of range
    pub fn set_subdivisions(&mut self, index: usize, subdivisions: usize) {
        if !(MIN_SUBDIVISIONS..=MAX_SUBDIVISIONS).contains(&subdivisions) {
            return;
        }
        if let Some(measure) = self.measures.get_mut(index) {
            measure.resize(subdivisions);
        }
    }

    /// Set one pulse directly; no-op when either index is out of range
    pub fn set_pulse(&mut self, index: usize, pulse_index: usize, value: Pulse) {
        if let Some(measure) = self.measures.get_mut(index) {
            if let Some(slot) = measure.pattern.get_mut(pulse_index) {
                *slot = value;
            }
        }
    }

    /// Advance one pulse through the Silent -> On -> Accent cycle
    pub fn toggle_pulse(&mut self, index: usize, pulse_index: usize) {
        if let Some(measure) = self.measures.get_mut(index) {
            if let Some(slot) = measure.pattern.get_mut(pulse_index) {
                *slot = slot.cycled();
            }
        }
    }

    /// Replace tempo and measures wholesale (session load)
    /// Clears the editing index since measure identities changed
    pub fn replace_contents(&mut self, tempo: u32, measures: Vec<Measure>) {
        self.tempo = tempo.clamp(MIN_TEMPO, MAX_TEMPO);
        self.measures = measures;
        self.editing_index = None;
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}
