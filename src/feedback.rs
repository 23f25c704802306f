//! Haptic/audio feedback
//!
//! The session notifies a [`FeedbackSink`] on four discrete events. Sinks are
//! fire-and-forget: a failing device never affects the simulation.

use crate::error::FeedbackError;

/// Feedback-worthy session events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// A flap was applied by the tick
    FlapAccepted,
    /// An obstacle was passed
    ObstacleScored,
    /// The session ended
    SessionEnded,
    /// A new session began
    SessionStarted,
}

/// Haptic pattern for a device with impact/notification feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    /// Short light impact
    Light,
    /// Positive notification
    Success,
    /// Negative notification
    Error,
}

impl FeedbackEvent {
    /// Haptic pattern this event maps to
    pub fn haptic(&self) -> Haptic {
        match self {
            FeedbackEvent::FlapAccepted | FeedbackEvent::SessionStarted => Haptic::Light,
            FeedbackEvent::ObstacleScored => Haptic::Success,
            FeedbackEvent::SessionEnded => Haptic::Error,
        }
    }
}

/// Receiver of feedback events
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, event: FeedbackEvent) -> Result<(), FeedbackError>;
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&self, _event: FeedbackEvent) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Sink that writes each event to the log, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&self, event: FeedbackEvent) -> Result<(), FeedbackError> {
        log::debug!("feedback: {:?} ({:?})", event, event.haptic());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haptic_mapping() {
        assert_eq!(FeedbackEvent::FlapAccepted.haptic(), Haptic::Light);
        assert_eq!(FeedbackEvent::SessionStarted.haptic(), Haptic::Light);
        assert_eq!(FeedbackEvent::ObstacleScored.haptic(), Haptic::Success);
        assert_eq!(FeedbackEvent::SessionEnded.haptic(), Haptic::Error);
    }
}
