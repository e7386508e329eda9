use core::fmt;

use serde::{Deserialize, Serialize};

/// A device verb, issued as `GET /<verb>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Command {
    /// Start (or resume) the open/close motion
    Open,
    /// Pause the current motion
    Stop,
    /// Any other verb the device understands
    Other(String),
}

impl Command {
    pub fn verb(&self) -> &str {
        match self {
            Command::Open => "open",
            Command::Stop => "stop",
            Command::Other(verb) => verb,
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.verb())
    }
}

impl From<&str> for Command {
    fn from(verb: &str) -> Self {
        match verb.trim_start_matches('/') {
            "open" => Command::Open,
            "stop" => Command::Stop,
            other => Command::Other(other.to_string()),
        }
    }
}

impl From<String> for Command {
    fn from(verb: String) -> Self {
        Command::from(verb.as_str())
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.verb().to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}
