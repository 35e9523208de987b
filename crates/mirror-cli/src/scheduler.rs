//! Sleep-then-sync loop
//!
//! Passes never overlap: each one runs to completion before the next sleep
//! starts. There is no drift correction, so a slow pass pushes every later
//! pass back by the same amount.

use std::time::Duration;

use mirror_core::{LogSink, PassReport, Reconciler};

/// Drives a [`Reconciler`] at a fixed interval.
pub struct Scheduler<S> {
    reconciler: Reconciler<S>,
    interval: Duration,
}

impl<S: LogSink> Scheduler<S> {
    pub fn new(reconciler: Reconciler<S>, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    #[cfg(test)]
    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Run one pass. A failed pass is printed and logged, then dropped; the
    /// next tick retries from scratch.
    pub fn tick(&mut self) -> Option<PassReport> {
        match self.reconciler.run_once() {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "pass failed");
                self.reconciler.sink_mut().record(&format!("Pass failed: {e}"));
                None
            }
        }
    }

    /// Sleep, pass, repeat until the process is killed.
    pub fn run_forever(&mut self) -> ! {
        loop {
            std::thread::sleep(self.interval);
            self.tick();
        }
    }
}
