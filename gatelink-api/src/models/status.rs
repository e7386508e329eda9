use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Outcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Open,
    Closed,
    Moving,
    #[default]
    Unknown,
}

impl GateState {
    /// `gateStatus` wire value: 1 open, 2 closed, 3 moving.
    pub fn from_wire(value: i64) -> Self {
        match value {
            1 => GateState::Open,
            2 => GateState::Closed,
            3 => GateState::Moving,
            _ => GateState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    On,
    Off,
    #[default]
    Unknown,
}

impl LightState {
    /// `lightStatus` wire value: 1 is on, anything else is off.
    pub fn from_wire(value: i64) -> Self {
        if value == 1 {
            LightState::On
        } else {
            LightState::Off
        }
    }
}

/// Trusted gate and light state from a code 9 status reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub gate: GateState,
    pub light: LightState,
}

/// Decoded body of `GET /getstatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReply {
    /// Code 9 with both status fields present
    Status(StatusReport),
    /// Code 9 missing `gateStatus` or `lightStatus`
    Malformed,
    /// Any other code
    Other(Outcome),
}

impl StatusReply {
    pub fn decode(body: &Value) -> Self {
        match super::reply_outcome(body) {
            Outcome::StatusReturned => {
                let gate = body.get("gateStatus").and_then(Value::as_i64);
                let light = body.get("lightStatus").and_then(Value::as_i64);

                match (gate, light) {
                    (Some(gate), Some(light)) => StatusReply::Status(StatusReport {
                        gate: GateState::from_wire(gate),
                        light: LightState::from_wire(light),
                    }),
                    _ => StatusReply::Malformed,
                }
            }
            other => StatusReply::Other(other),
        }
    }
}
