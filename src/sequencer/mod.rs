// Sequencer module
// Pattern data, playhead, and the look-ahead scheduling core

pub mod pattern;
pub mod playhead;
pub mod player;
pub mod pulse;
pub mod scheduler;
pub mod transport;

pub use pattern::{Measure, PatternStore, DEFAULT_TEMPO, MAX_SUBDIVISIONS, MAX_TEMPO, MIN_SUBDIVISIONS, MIN_TEMPO};
pub use playhead::Playhead;
pub use player::{start_tick_loop, TickHandle};
pub use pulse::Pulse;
pub use scheduler::{Clock, LookAheadScheduler, ToneSink, VisualSink, LOOK_AHEAD_SECS, START_DELAY_SECS, TICK_INTERVAL_MS};
pub use transport::{TransportError, TransportState};
