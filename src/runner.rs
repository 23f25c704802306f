//! Threaded game loop
//!
//! [`Game`] shares a [`Session`] between the clock thread (which ticks it) and
//! the caller (which starts, ends and inspects it). Flaps go through a
//! lock-free [`FlapHandle`] and never wait on the tick.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::Clock;
use crate::error::ClockError;
use crate::session::{FlapHandle, Session};
use crate::sim::GamePhase;
use crate::snapshot::RenderSnapshot;

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A session driven by a real-time clock
pub struct Game {
    session: Arc<Mutex<Session>>,
    clock: Clock,
    flap: FlapHandle,
}

impl Game {
    pub fn new(session: Session) -> Self {
        let clock = Clock::new(session.settings().tick_period());
        let flap = session.flap_handle();
        Self {
            session: Arc::new(Mutex::new(session)),
            clock,
            flap,
        }
    }

    /// Start a session and arm the clock.
    ///
    /// The clock is re-armed even if the session was already running, which
    /// replaces the old timer rather than adding a second one.
    pub fn start(&mut self) -> Result<(), ClockError> {
        lock(&self.session).start();

        let session = Arc::clone(&self.session);
        self.clock.start(move || {
            let mut session = lock(&session);
            session.tick();
            if session.phase() == GamePhase::Active {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
    }

    /// End the session (if active) and stop the clock
    pub fn end(&mut self) {
        lock(&self.session).end();
        self.clock.stop();
    }

    pub fn flap(&self) {
        self.flap.flap();
    }

    pub fn flap_handle(&self) -> FlapHandle {
        self.flap.clone()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn phase(&self) -> GamePhase {
        lock(&self.session).phase()
    }

    /// Copy of the latest published snapshot
    pub fn snapshot(&self) -> RenderSnapshot {
        lock(&self.session).snapshot().clone()
    }

    /// Run `f` with the session locked. Keep it short: ticks wait on it.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut lock(&self.session))
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
