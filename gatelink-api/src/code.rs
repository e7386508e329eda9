use core::fmt;

use serde::{Deserialize, Serialize};

/// Semantic meaning of a numeric device response code.
///
/// The device multiplexes command results, settings results and status
/// results over one flat integer. This enum is the only place where those
/// integers are given meaning; everything else matches on variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", from = "i64")]
pub enum Outcome {
    /// Code 1
    OpenCompleted,
    /// Code 2
    StopCompleted,
    /// Code 3
    GateMoving,
    /// Code 4
    FixedOpenInProgress,
    /// Code 5
    SettingsDeserializationError,
    /// Code 6
    SettingsSaved,
    /// Code 7
    SettingsNoData,
    /// Code 8
    SettingsReturned,
    /// Code 9
    StatusReturned,
    /// Code 10
    FixedOpenCompleted,
    /// Any other code, and every round trip that never produced one
    OperationFailed,
}

impl Outcome {
    /// Maps a response code to its outcome. Total: unmapped codes degrade to
    /// [`Outcome::OperationFailed`].
    pub fn interpret(code: i64) -> Self {
        match code {
            1 => Outcome::OpenCompleted,
            2 => Outcome::StopCompleted,
            3 => Outcome::GateMoving,
            4 => Outcome::FixedOpenInProgress,
            5 => Outcome::SettingsDeserializationError,
            6 => Outcome::SettingsSaved,
            7 => Outcome::SettingsNoData,
            8 => Outcome::SettingsReturned,
            9 => Outcome::StatusReturned,
            10 => Outcome::FixedOpenCompleted,
            _ => Outcome::OperationFailed,
        }
    }

    /// The wire code of a mapped outcome. `OperationFailed` has no single code.
    pub fn code(&self) -> Option<i64> {
        match self {
            Outcome::OpenCompleted => Some(1),
            Outcome::StopCompleted => Some(2),
            Outcome::GateMoving => Some(3),
            Outcome::FixedOpenInProgress => Some(4),
            Outcome::SettingsDeserializationError => Some(5),
            Outcome::SettingsSaved => Some(6),
            Outcome::SettingsNoData => Some(7),
            Outcome::SettingsReturned => Some(8),
            Outcome::StatusReturned => Some(9),
            Outcome::FixedOpenCompleted => Some(10),
            Outcome::OperationFailed => None,
        }
    }

    /// User-facing description of the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::OpenCompleted => "Open operation completed",
            Outcome::StopCompleted => "Stop operation completed",
            Outcome::GateMoving => "Gate is moving",
            Outcome::FixedOpenInProgress => "Fixed-open operation in progress",
            Outcome::SettingsDeserializationError => "Settings could not be decoded by the device",
            Outcome::SettingsSaved => "Settings saved",
            Outcome::SettingsNoData => "No data sent for the settings update",
            Outcome::SettingsReturned => "Settings returned successfully",
            Outcome::StatusReturned => "Gate status returned successfully",
            Outcome::FixedOpenCompleted => "Fixed-open operation completed",
            Outcome::OperationFailed => "Operation failed",
        }
    }

    /// Device-side failures: settings decode error, missing settings data,
    /// and anything the device answered with an unmapped code.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::SettingsDeserializationError
                | Outcome::SettingsNoData
                | Outcome::OperationFailed
        )
    }
}

impl From<i64> for Outcome {
    fn from(code: i64) -> Self {
        Outcome::interpret(code)
    }
}

impl From<Outcome> for i64 {
    fn from(outcome: Outcome) -> Self {
        outcome.code().unwrap_or(0)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
