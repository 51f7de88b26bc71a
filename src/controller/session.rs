use serde::Serialize;

use crate::classifier::ClassifyError;
use crate::frame::AcquisitionError;
use crate::gesture::Gesture;
use crate::schedule::SessionId;

/// Where the current recognition cycle stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the classifier.
    Requesting { session: SessionId },
    /// A recognized gesture is being acted on.
    ActionInProgress {
        session: SessionId,
        gesture: Gesture,
        stage: ActionStage,
    },
    /// The last classification call failed.
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStage {
    /// Device is "actuating"; ends with the `Action finished.` entry.
    Performing,
    /// Short pause before the detected gesture is cleared.
    Settling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Camera,
    Image,
}

/// Delayed steps of the action phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActionTask {
    FinishAction,
    Settle,
}

/// Why a recognition request was refused.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionRejected {
    #[error("No image available to analyze")]
    NoFrame,
    #[error("A recognition request is already in flight")]
    Busy,
    #[error("An action is still being performed")]
    PerformingAction,
    #[error("Cooling down for {remaining_seconds} more seconds")]
    OnCooldown { remaining_seconds: u32 },
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
}

/// Render-ready snapshot of the controller for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub loading: bool,
    pub performing_action: bool,
    pub on_cooldown: bool,
    pub cooldown_remaining: u32,
    pub error: Option<String>,
    pub last_gesture: Option<Gesture>,
    pub bulb_on: bool,
    pub camera_on: bool,
    pub input_mode: InputMode,
    pub has_frame: bool,
    /// Newest first, formatted as `[HH:MM:SS] text`.
    pub log: Vec<String>,
}

impl SessionView {
    /// Whether the trigger button should be enabled.
    pub fn can_request(&self) -> bool {
        self.has_frame && !self.loading && !self.performing_action && !self.on_cooldown
    }
}

const QUOTA_MESSAGE: &str = "API Quota Exhausted. You have likely used all free requests for your API key. This is an account-level limit. To fix this, please check your Google Cloud project's billing status and API quotas. Further use may require enabling billing.";
const SERVER_MESSAGE: &str = "A server error occurred with the API. Please try again later.";
const UNKNOWN_MESSAGE: &str = "An unknown API error occurred.";

/// User-facing copy for a failed classification.
pub(crate) fn failure_message(err: &ClassifyError, cooldown_seconds: u32) -> String {
    match err {
        ClassifyError::QuotaExhausted(_) => format!(
            "{QUOTA_MESSAGE} The app is cooling down for {cooldown_seconds} seconds to prevent further errors."
        ),
        ClassifyError::ServerError(_) => SERVER_MESSAGE.to_string(),
        ClassifyError::Transport(_) | ClassifyError::Unknown(_) => UNKNOWN_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_names_applied_window() {
        let message = failure_message(&ClassifyError::QuotaExhausted("429".into()), 180);
        assert!(message.starts_with("API Quota Exhausted."));
        assert!(message.ends_with("cooling down for 180 seconds to prevent further errors."));
    }

    #[test]
    fn other_failures_use_generic_copy() {
        assert_eq!(
            failure_message(&ClassifyError::ServerError("500".into()), 5),
            SERVER_MESSAGE
        );
        assert_eq!(
            failure_message(&ClassifyError::Transport("refused".into()), 5),
            UNKNOWN_MESSAGE
        );
    }
}
