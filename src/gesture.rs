//! Hand-gesture labels produced by the classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A finger-count label returned by the inference service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    OneFinger,
    TwoFingers,
    ThreeFingers,
    FourFingers,
    FiveFingers,
    Unknown,
}

impl Gesture {
    /// Every label, in finger-count order with `Unknown` last.
    pub const ALL: [Gesture; 6] = [
        Gesture::OneFinger,
        Gesture::TwoFingers,
        Gesture::ThreeFingers,
        Gesture::FourFingers,
        Gesture::FiveFingers,
        Gesture::Unknown,
    ];

    /// Wire name the model is asked to answer with.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneFinger => "ONE_FINGER",
            Self::TwoFingers => "TWO_FINGERS",
            Self::ThreeFingers => "THREE_FINGERS",
            Self::FourFingers => "FOUR_FINGERS",
            Self::FiveFingers => "FIVE_FINGERS",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable command mapped to this gesture.
    pub fn command_label(self) -> &'static str {
        match self {
            Self::OneFinger => "Turn Bulb On",
            Self::TwoFingers => "Turn Bulb Off",
            Self::ThreeFingers => "Toggle Bulb",
            Self::FourFingers | Self::FiveFingers => "No action defined",
            Self::Unknown => "Gesture not recognized",
        }
    }

    /// Wire name with the first underscore replaced by a space, e.g. `FOUR FINGERS`.
    pub fn spoken_name(self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// Normalize raw model output into a label.
    ///
    /// Whitespace is trimmed and case ignored; anything that is not exactly one
    /// of the known names becomes `Unknown`.
    pub fn from_response(text: &str) -> Self {
        let normalized = text.trim().to_ascii_uppercase();
        match Self::ALL
            .into_iter()
            .find(|gesture| gesture.as_str() == normalized)
        {
            Some(gesture) => gesture,
            None => {
                tracing::warn!("Unexpected response from classifier: {normalized:?}");
                Self::Unknown
            }
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
