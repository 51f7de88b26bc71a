//! Hand-gesture remote control for a simulated smart bulb.
//!
//! A still image is sent to a vision-language model, the finger count it
//! reports is mapped to a bulb action, and every step lands in a short
//! command log.
/// Application directory resolution.
pub mod app_dirs;
/// Remote gesture classification.
pub mod classifier;
/// Bounded command history.
pub mod command_log;
/// Recognition cycle orchestration.
pub mod controller;
/// TOML-backed settings.
pub mod config;
/// Per-second recognition cooldown.
pub mod cooldown;
/// Simulated bulb and gesture-to-action mapping.
pub mod device;
/// Image frames and the camera seam.
pub mod frame;
/// Gesture labels.
pub mod gesture;
mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// Session-keyed delayed tasks.
pub mod schedule;

pub use classifier::{ClassifyError, GeminiClassifier, GestureClassifier};
pub use controller::{RecognitionController, SessionView};
pub use device::DeviceState;
pub use frame::{CameraFeed, Frame};
pub use gesture::Gesture;
