// Messaging module
// Lock-free channels between the tick thread and the audio callback

pub mod channels;

pub use channels::{create_click_channel, ClickConsumer, ClickProducer, ScheduledClick};
