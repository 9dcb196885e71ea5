//! Dedicated polling thread per axis
//!
//! Step timing is only as good as the polling rate, so the runner calls
//! [`AxisMotionController::run`] in a tight loop without sleeping. Targets
//! and parameters are changed from other threads through the shared
//! controller.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embassy_sync::blocking_mutex::raw::RawMutex;
use puckbot_core::motion::AxisMotionController;
use puckbot_core::traits::{StepOutput, TickClock};

/// Handle to a running polling thread
///
/// Dropping the handle stops and joins the thread.
pub struct AxisRunner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl AxisRunner {
    /// Start polling `controller` on a thread named `axis-<name>`
    pub fn spawn<M, O, C>(controller: Arc<AxisMotionController<M, O, C>>) -> io::Result<Self>
    where
        M: RawMutex,
        O: StepOutput,
        C: TickClock,
        AxisMotionController<M, O, C>: Send + Sync + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let name = format!("axis-{}", controller.name());

        let handle = thread::Builder::new().name(name).spawn(move || {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} axis: polling started", controller.name());

            let mut polls: u64 = 0;
            while !flag.load(Ordering::Acquire) {
                controller.run();
                polls = polls.wrapping_add(1);
            }

            #[cfg(feature = "defmt")]
            defmt::debug!("{} axis: polling stopped after {} polls", controller.name(), polls);
            polls
        })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// True until the thread has exited
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling and join the thread
    ///
    /// Returns the number of polls made, or the panic payload if the
    /// thread panicked.
    pub fn shutdown(mut self) -> thread::Result<u64> {
        self.stop.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(0),
        }
    }
}

impl Drop for AxisRunner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
