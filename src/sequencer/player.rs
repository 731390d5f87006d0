// Tick driver - Repeating coarse timer that pumps the scheduler
// Cancellation works by clearing the shared running flag; there is no
// way to revoke tones already handed to the audio clock

use crate::sequencer::scheduler::TICK_INTERVAL_MS;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running tick loop
///
/// Dropping the handle stops the loop and joins the thread.
pub struct TickHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TickHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the loop and wait for the thread to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn a thread that invokes `tick` every TICK_INTERVAL_MS milliseconds
/// until the handle is stopped or dropped.
///
/// The closure must never block: the scheduler's look-ahead loop is bounded
/// by its horizon, so one invocation does a small fixed amount of work.
pub fn start_tick_loop<F>(mut tick: F) -> TickHandle
where
    F: FnMut() + Send + 'static,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    let thread = thread::spawn(move || {
        while running_clone.load(Ordering::SeqCst) {
            tick();
            thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
        }
    });

    TickHandle {
        running,
        thread: Some(thread),
    }
}
