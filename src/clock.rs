//! Fixed-rate tick scheduler
//!
//! Runs a callback on a dedicated thread at a fixed nominal rate. At most one
//! timer is ever armed: starting again stops (and joins) the previous one
//! first, so two tick streams can never overlap.
//!
//! An overrunning tick is followed immediately by the next one; there is no
//! frame skipping.

use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crate::error::ClockError;

struct Running {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
    thread_id: ThreadId,
}

/// Periodic tick driver
pub struct Clock {
    period: Duration,
    running: Option<Running>,
}

impl Clock {
    /// Clock ticking once per `period`
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer, replacing any running one.
    ///
    /// `on_tick` runs once per period on the clock thread until it returns
    /// `ControlFlow::Break` or the clock is stopped.
    pub fn start<F>(&mut self, mut on_tick: F) -> Result<(), ClockError>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let period = self.period;

        let handle = thread::Builder::new()
            .name("sim-clock".to_string())
            .spawn(move || {
                let mut next = Instant::now() + period;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        // Stop requested, or the clock was dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if on_tick().is_break() {
                        break;
                    }
                    next += period;
                }
                log::debug!("Clock thread exiting");
            })
            .map_err(ClockError::Spawn)?;

        let thread_id = handle.thread().id();
        self.running = Some(Running {
            stop_tx,
            handle,
            thread_id,
        });
        log::debug!("Clock started ({:?} period)", period);
        Ok(())
    }

    /// Disarm the timer. When this returns no further tick will fire.
    ///
    /// Called from inside a tick, the clock thread exits as soon as that tick
    /// returns instead of being joined.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        // Receiver may already be gone if the loop broke on its own
        let _ = running.stop_tx.send(());

        if thread::current().id() == running.thread_id {
            return;
        }
        if running.handle.join().is_err() {
            log::warn!("Clock thread panicked");
        }
    }

    /// Whether a timer is armed and its thread still looping
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("period", &self.period)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicU32>) -> impl FnMut() -> ControlFlow<()> + Send + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_ticks_until_stopped() {
        let ticks = Arc::new(AtomicU32::new(0));
        let mut clock = Clock::new(Duration::from_millis(2));
        clock.start(counting(&ticks)).expect("spawn");

        thread::sleep(Duration::from_millis(60));
        clock.stop();
        assert!(!clock.is_running());

        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop > 0);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_restart_replaces_timer() {
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));
        let mut clock = Clock::new(Duration::from_millis(2));

        clock.start(counting(&first)).expect("spawn");
        thread::sleep(Duration::from_millis(20));
        clock.start(counting(&second)).expect("spawn");

        let frozen = first.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(first.load(Ordering::SeqCst), frozen, "old timer still firing");
        assert!(second.load(Ordering::SeqCst) > 0);
        clock.stop();
    }

    #[test]
    fn test_break_stops_loop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let mut clock = Clock::new(Duration::from_millis(1));
        clock
            .start(move || {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .expect("spawn");

        let deadline = Instant::now() + Duration::from_secs(5);
        while clock.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(!clock.is_running());
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = Clock::new(Duration::from_millis(16));
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.period(), Duration::from_millis(16));
    }
}
