// Lock-free communication channels
// Scheduler thread -> audio callback, no allocation on the consumer side

use crate::audio::click::ClickType;
use ringbuf::{HeapRb, traits::Split};

/// A tone request: play `click` starting at the given sample position
#[derive(Debug, Clone, Copy)]
pub struct ScheduledClick {
    pub start_sample: u64,
    pub click: ClickType,
}

pub type ClickProducer = ringbuf::HeapProd<ScheduledClick>;
pub type ClickConsumer = ringbuf::HeapCons<ScheduledClick>;

pub fn create_click_channel(capacity: usize) -> (ClickProducer, ClickConsumer) {
    let rb = HeapRb::<ScheduledClick>::new(capacity);
    rb.split()
}
