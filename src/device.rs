//! Simulated smart bulb and the gesture-to-action table.

use serde::Serialize;

use crate::command_log::CommandLog;
use crate::gesture::Gesture;

/// Log text for a frame the classifier could not read as a gesture.
pub const NOT_RECOGNIZED_MESSAGE: &str = "No specific gesture recognized.";

/// On/off condition of the controlled bulb.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub bulb_on: bool,
}

impl DeviceState {
    pub const OFF: DeviceState = DeviceState { bulb_on: false };
    pub const ON: DeviceState = DeviceState { bulb_on: true };
}

/// What a gesture does to the bulb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceAction {
    TurnOn,
    TurnOff,
    Toggle,
    /// Recognized, but nothing is bound to it.
    NoAction,
    /// The classifier could not tell.
    NotRecognized,
}

impl DeviceAction {
    pub fn for_gesture(gesture: Gesture) -> Self {
        match gesture {
            Gesture::OneFinger => Self::TurnOn,
            Gesture::TwoFingers => Self::TurnOff,
            Gesture::ThreeFingers => Self::Toggle,
            Gesture::FourFingers | Gesture::FiveFingers => Self::NoAction,
            Gesture::Unknown => Self::NotRecognized,
        }
    }

    pub fn mutates(self) -> bool {
        matches!(self, Self::TurnOn | Self::TurnOff | Self::Toggle)
    }

    pub fn apply(self, state: DeviceState) -> DeviceState {
        match self {
            Self::TurnOn => DeviceState::ON,
            Self::TurnOff => DeviceState::OFF,
            Self::Toggle => DeviceState {
                bulb_on: !state.bulb_on,
            },
            Self::NoAction | Self::NotRecognized => state,
        }
    }
}

/// Result of mapping one gesture against the current device state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub gesture: Gesture,
    pub action: DeviceAction,
    pub next: DeviceState,
    pub description: &'static str,
}

impl Dispatch {
    pub fn mutated(&self) -> bool {
        self.action.mutates()
    }
}

/// Pure mapping from `(gesture, prior state)` to the next state.
pub fn dispatch(gesture: Gesture, current: DeviceState) -> Dispatch {
    let action = DeviceAction::for_gesture(gesture);
    Dispatch {
        gesture,
        action,
        next: action.apply(current),
        description: gesture.command_label(),
    }
}

/// Owns the device state and writes dispatch results to the command log.
#[derive(Clone, Debug, Default)]
pub struct ActionDispatcher {
    state: DeviceState,
}

impl ActionDispatcher {
    pub fn new(state: DeviceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Apply `gesture`, then log it.
    ///
    /// The state change lands before its log entry. `Unknown` only logs and
    /// never reaches the mutation path.
    pub fn dispatch(&mut self, gesture: Gesture, log: &mut CommandLog) -> Dispatch {
        let outcome = dispatch(gesture, self.state);
        match outcome.action {
            DeviceAction::NotRecognized => {
                log.record(NOT_RECOGNIZED_MESSAGE);
            }
            DeviceAction::NoAction => {
                log.record(format!("Action: {}", outcome.description));
                log.record(format!("No action for {}", gesture.spoken_name()));
            }
            DeviceAction::TurnOn | DeviceAction::TurnOff | DeviceAction::Toggle => {
                self.state = outcome.next;
                tracing::info!(bulb_on = self.state.bulb_on, "Device state changed");
                log.record(format!("Action: {}", outcome.description));
            }
        }
        outcome
    }
}
