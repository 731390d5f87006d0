// Rhythm Weaver - Library exports for tests and front-ends

pub mod audio;
pub mod messaging;
pub mod sequencer;
pub mod session;

// Re-export commonly used types for convenience
pub use audio::click::{ClickSound, ClickType};
pub use audio::engine::{AudioEngine, AudioError, ToneOutput};
pub use audio::timing::AudioTiming;
pub use messaging::channels::{create_click_channel, ClickConsumer, ClickProducer, ScheduledClick};
pub use sequencer::{
    Clock, LookAheadScheduler, Measure, PatternStore, Playhead, Pulse, TickHandle, ToneSink,
    TransportError, TransportState, start_tick_loop,
};
pub use session::{SessionData, SessionError, SessionStore};
