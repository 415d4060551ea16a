use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

/// Set once Ctrl-C is pressed; long exports check it between assets.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal in the non-shutdown state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signal that is triggered by Ctrl-C.
    pub fn install() -> Result<Self> {
        let signal = Self::new();
        let handler = signal.clone();
        ctrlc::set_handler(move || handler.trigger())?;
        Ok(signal)
    }

    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_initial_state() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn test_trigger_from_clone() {
        let signal = ShutdownSignal::new();
        let remote = signal.clone();

        thread::spawn(move || remote.trigger()).join().unwrap();
        assert!(signal.is_shutdown());
    }
}
