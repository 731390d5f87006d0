// Audio module
// Click generation, the shared audio clock, and the cpal output stream

pub mod click;
pub mod engine;
pub mod timing;

pub use click::{ClickSound, ClickType};
pub use engine::{AudioEngine, AudioError, ToneOutput};
pub use timing::AudioTiming;
