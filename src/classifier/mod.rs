//! Image-to-gesture classification against a remote vision-language model.

mod key_store;

pub mod api;

pub use api::{GeminiClassifier, PROMPT};
pub use key_store::{ApiKeyStore, ApiKeyStoreError};

use crate::frame::Frame;
use crate::gesture::Gesture;

/// Why a classification call failed, decided where the response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Unexpected API error: {0}")]
    Unknown(String),
}

/// The classifier client could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierSetupError {
    #[error("No API key found in ${env_var}, the OS keyring or the local key store")]
    MissingApiKey { env_var: String },
    #[error("Key store error: {0}")]
    KeyStore(#[from] ApiKeyStoreError),
}

/// One attempt per call; callers decide whether to try again.
pub trait GestureClassifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Result<Gesture, ClassifyError>;
}
