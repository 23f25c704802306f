//! Session state machine
//!
//! Owns the authoritative [`GameState`] and wires it to its collaborators:
//! the best score store, feedback and presentation sinks. The simulation
//! state is only mutated from [`Session::tick`], [`Session::start`] and
//! [`Session::end`]; everyone else reads the published [`RenderSnapshot`].
//!
//! Flaps may arrive from any thread through a [`FlapHandle`]. The handle only
//! raises a latch, which the next tick reads and clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::ConfigError;
use crate::feedback::{FeedbackEvent, FeedbackSink, NullFeedback};
use crate::highscores::{BestScore, ScoreStore};
use crate::settings::Settings;
use crate::sim::{self, EndCause, GameEvent, GamePhase, GameState, TickInput};
use crate::snapshot::{PresentationSink, RenderSnapshot};

/// Cloneable, thread-safe flap input
#[derive(Debug, Clone, Default)]
pub struct FlapHandle {
    pending: Arc<AtomicBool>,
}

impl FlapHandle {
    /// Request a flap on the next tick. Ignored unless a session is active.
    pub fn flap(&self) {
        self.pending.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// One player's sequence of sessions
pub struct Session {
    settings: Settings,
    /// Authoritative, tick-owned
    state: GameState,
    /// Derived, republished after every mutation
    snapshot: RenderSnapshot,
    best: BestScore,
    /// Local cache of the stored best score
    best_score: u32,
    new_record: bool,
    flap: FlapHandle,
    /// Source of per-session obstacle seeds
    seeds: Pcg32,
    feedback: Arc<dyn FeedbackSink>,
    presentation: Option<Box<dyn PresentationSink>>,
    pending_writes: Vec<JoinHandle<bool>>,
}

impl Session {
    /// Validate settings and load the best score. Starts `Idle`.
    pub fn new(settings: Settings, store: Arc<dyn ScoreStore>) -> Result<Self, ConfigError> {
        settings.validate()?;

        let master_seed = settings.seed.unwrap_or_else(rand::random);
        let best = BestScore::new(store);
        let best_score = best.get();
        log::info!(
            "Session ready (seed {}, best score {})",
            master_seed,
            best_score
        );

        let state = GameState::new(master_seed);
        let snapshot = RenderSnapshot::capture(&state, best_score, false);

        Ok(Self {
            settings,
            state,
            snapshot,
            best,
            best_score,
            new_record: false,
            flap: FlapHandle::default(),
            seeds: Pcg32::seed_from_u64(master_seed),
            feedback: Arc::new(NullFeedback),
            presentation: None,
            pending_writes: Vec::new(),
        })
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_presentation(mut self, sink: Box<dyn PresentationSink>) -> Self {
        self.presentation = Some(sink);
        self
    }

    /// Start a new session. Valid from `Idle` or `Ended`; no-op when `Active`.
    pub fn start(&mut self) -> bool {
        if self.state.is_active() {
            return false;
        }

        // Taps that landed while not playing don't carry over
        self.flap.clear();
        self.new_record = false;

        let seed = self.seeds.random::<u64>();
        self.state.start(&self.settings, seed);
        log::info!("Session started (seed {})", seed);

        self.notify(FeedbackEvent::SessionStarted);
        self.publish();
        true
    }

    /// Advance one fixed step. No-op outside `Active`.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let flap = self.flap.take();
        if !self.state.is_active() {
            return Vec::new();
        }

        let events = sim::tick(&mut self.state, &TickInput { flap }, &self.settings);

        for event in &events {
            match *event {
                GameEvent::Flapped => self.notify(FeedbackEvent::FlapAccepted),
                GameEvent::Scored { obstacle, score } => {
                    log::debug!("Passed obstacle {:?}, score {}", obstacle, score);
                    self.notify(FeedbackEvent::ObstacleScored);
                }
                GameEvent::Ended { cause, .. } => self.on_ended(cause),
            }
        }

        self.publish();
        events
    }

    /// End the session from outside the tick. Idempotent.
    pub fn end(&mut self) -> bool {
        if !self.state.end() {
            return false;
        }
        self.on_ended(EndCause::Requested);
        self.publish();
        true
    }

    /// Request a flap on the next tick. No-op unless `Active`.
    pub fn flap(&self) {
        if self.state.is_active() {
            self.flap.flap();
        }
    }

    /// Handle for flapping from another thread
    pub fn flap_handle(&self) -> FlapHandle {
        self.flap.clone()
    }

    fn on_ended(&mut self, cause: EndCause) {
        let score = self.state.score;
        log::info!("Session ended with score {}", score);
        log::debug!("End cause: {:?}", cause);

        if score > self.best_score {
            self.best_score = score;
            self.new_record = true;
            self.persist_best(score);
        }

        self.notify(FeedbackEvent::SessionEnded);
    }

    /// Hand the write to a background thread; the session never waits on it
    fn persist_best(&mut self, score: u32) {
        self.pending_writes.retain(|h| !h.is_finished());

        let best = self.best.clone();
        let spawned = thread::Builder::new()
            .name("best-score-writer".to_string())
            .spawn(move || best.set(score));
        match spawned {
            Ok(handle) => self.pending_writes.push(handle),
            Err(e) => {
                log::warn!("Could not spawn best score writer ({}), writing inline", e);
                self.best.set(score);
            }
        }
    }

    /// Block until queued best score writes finish. Returns true if any wrote.
    pub fn flush_persistence(&mut self) -> bool {
        let mut wrote = false;
        for handle in self.pending_writes.drain(..) {
            match handle.join() {
                Ok(w) => wrote |= w,
                Err(_) => log::warn!("Best score writer panicked"),
            }
        }
        wrote
    }

    fn notify(&self, event: FeedbackEvent) {
        if let Err(e) = self.feedback.notify(event) {
            log::trace!("Feedback for {:?} dropped: {}", event, e);
        }
    }

    fn publish(&mut self) {
        self.snapshot = RenderSnapshot::capture(&self.state, self.best_score, self.new_record);
        if let Some(sink) = self.presentation.as_mut() {
            sink.present(&self.snapshot);
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.flush_persistence();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase)
            .field("score", &self.state.score)
            .field("best_score", &self.best_score)
            .finish_non_exhaustive()
    }
}
