//! Line-oriented front end: prints state changes and notifications, reads
//! commands from stdin.

use std::io;
use std::sync::Arc;

use gatelink_api::TimeOfDayError;
use gatelink_api::models::{BehaviorMode, DeviceSettings, GateState, LightState, MinuteOfDay};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::Controller;
use crate::notify::Notification;
use crate::state::{ActionLabel, ControllerState, StopAffordance};

const HELP: &str = "commands: open | stop | press | <verb> | settings | set <field> <value> | save | discard | quit
fields: light on|off, on HH:MM, off HH:MM, duration <minutes>, password <text>, behavior <text>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown settings field '{0}'")]
    UnknownField(String),

    #[error("Missing value for '{0}'")]
    MissingValue(String),

    #[error("Invalid value '{value}' for '{field}'")]
    InvalidValue { field: String, value: String },

    #[error(transparent)]
    TimeOfDay(#[from] TimeOfDayError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    LightEnabled(bool),
    LightOn(MinuteOfDay),
    LightOff(MinuteOfDay),
    Duration(u32),
    Password(String),
    Behavior(BehaviorMode),
}

impl SettingsEdit {
    pub fn parse(field: &str, value: &str) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        if value.is_empty() && field != "password" {
            return Err(InputError::MissingValue(field.to_string()));
        }

        Ok(match field {
            "light" => match value {
                "on" | "true" | "1" => SettingsEdit::LightEnabled(true),
                "off" | "false" | "0" => SettingsEdit::LightEnabled(false),
                _ => return Err(invalid()),
            },
            "on" => SettingsEdit::LightOn(value.parse()?),
            "off" => SettingsEdit::LightOff(value.parse()?),
            "duration" => SettingsEdit::Duration(value.parse().map_err(|_| invalid())?),
            "password" => SettingsEdit::Password(value.to_string()),
            "behavior" => SettingsEdit::Behavior(BehaviorMode::from(value)),
            other => return Err(InputError::UnknownField(other.to_string())),
        })
    }

    pub fn apply(self, settings: &mut DeviceSettings) {
        match self {
            SettingsEdit::LightEnabled(enabled) => settings.light_enabled = enabled,
            SettingsEdit::LightOn(time) => settings.light_on = time,
            SettingsEdit::LightOff(time) => settings.light_off = time,
            SettingsEdit::Duration(minutes) => settings.light_duration_minutes = minutes,
            SettingsEdit::Password(password) => settings.password = password,
            SettingsEdit::Behavior(behavior) => settings.behavior = behavior,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Send a device verb
    Command(String),
    /// Press the stop/resume control
    Press,
    ShowSettings,
    Edit(SettingsEdit),
    Save,
    Discard,
    Help,
    Quit,
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(head, rest)| (head, rest.trim()))
            .unwrap_or((line, ""));

        Ok(match head {
            "" => return Err(InputError::Empty),
            "press" => ConsoleInput::Press,
            "settings" => ConsoleInput::ShowSettings,
            "save" => ConsoleInput::Save,
            "discard" => ConsoleInput::Discard,
            "help" | "?" => ConsoleInput::Help,
            "quit" | "exit" => ConsoleInput::Quit,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(field, value)| (field, value.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(InputError::MissingValue("set".to_string()));
                }
                ConsoleInput::Edit(SettingsEdit::parse(field, value)?)
            }
            verb => ConsoleInput::Command(verb.to_string()),
        })
    }
}

pub fn render_state(state: &ControllerState) -> String {
    let gate = match state.gate {
        GateState::Open => "open",
        GateState::Closed => "closed",
        GateState::Moving => "moving",
        GateState::Unknown => "unknown",
    };
    let light = match state.light {
        LightState::On => "on",
        LightState::Off => "off",
        LightState::Unknown => "unknown",
    };
    let action = match state.action.label {
        ActionLabel::Open => "Open",
        ActionLabel::Close => "Close",
        ActionLabel::InProgress => "-",
    };
    let stop = match state.affordance {
        StopAffordance::Stop => "Stop",
        StopAffordance::Resume => "Resume",
    };

    let mut line = format!(
        "gate: {gate} | light: {light} | action: [{action}]{} | {stop}",
        if state.action.enabled { "" } else { " (disabled)" }
    );
    if !state.is_online() {
        line.push_str(" | OFFLINE, showing last known state");
    }
    line
}

pub fn render_settings(settings: &DeviceSettings) -> String {
    format!(
        "light enabled: {}\nlight on: {}\nlight off: {}\nduration: {} min\npassword: {}\nbehavior: {}",
        settings.light_enabled,
        settings.light_on,
        settings.light_off,
        settings.light_duration_minutes,
        "*".repeat(settings.password.chars().count()),
        settings.behavior,
    )
}

pub fn render_notification(notification: &Notification) -> String {
    format!("{}: {}", notification.origin, notification.outcome)
}

/// Drives the controller until stdin closes or `quit` is entered.
pub async fn run(controller: Arc<Controller>) -> io::Result<()> {
    let mut state_rx = controller.store().subscribe();
    let mut notify_rx = controller.notifier().subscribe();

    let poller = controller.start().await;
    println!("{}", render_state(&state_rx.borrow_and_update()));
    println!("{HELP}");

    let mut pending: Option<DeviceSettings> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render_state(&state_rx.borrow_and_update()));
            }
            notification = notify_rx.recv() => match notification {
                Ok(notification) => println!("{}", render_notification(&notification)),
                Err(RecvError::Lagged(skipped)) => debug!("Skipped {} notifications", skipped),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let input = match ConsoleInput::parse(&line) {
                    Ok(input) => input,
                    Err(InputError::Empty) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };

                match input {
                    ConsoleInput::Command(verb) => {
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            controller.command(verb.as_str()).await;
                        });
                    }
                    ConsoleInput::Press => {
                        let verb = controller.store().snapshot().affordance.verb();
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            controller.command(verb).await;
                        });
                    }
                    ConsoleInput::ShowSettings => {
                        let settings = match &pending {
                            Some(settings) => settings.clone(),
                            None => controller.settings().current().await,
                        };
                        println!("{}", render_settings(&settings));
                    }
                    ConsoleInput::Edit(edit) => {
                        let mut settings = match pending.take() {
                            Some(settings) => settings,
                            None => controller.settings().current().await,
                        };
                        edit.apply(&mut settings);
                        pending = Some(settings);
                    }
                    ConsoleInput::Save => match pending.take() {
                        Some(settings) => {
                            let controller = controller.clone();
                            tokio::spawn(async move {
                                controller.settings().save(&settings).await;
                            });
                        }
                        None => println!("no pending changes"),
                    },
                    ConsoleInput::Discard => pending = None,
                    ConsoleInput::Help => println!("{HELP}"),
                    ConsoleInput::Quit => break,
                }
            }
        }
    }

    poller.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::state::Connectivity;

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleInput::parse("open").unwrap(), ConsoleInput::Command("open".into()));
        assert_eq!(ConsoleInput::parse("  stop ").unwrap(), ConsoleInput::Command("stop".into()));
        assert_eq!(ConsoleInput::parse("press").unwrap(), ConsoleInput::Press);
        assert_eq!(ConsoleInput::parse("quit").unwrap(), ConsoleInput::Quit);
        assert_eq!(ConsoleInput::parse("   "), Err(InputError::Empty));
    }

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            ConsoleInput::parse("set on 01:30").unwrap(),
            ConsoleInput::Edit(SettingsEdit::LightOn(MinuteOfDay::new(90).unwrap()))
        );
        assert_eq!(
            ConsoleInput::parse("set light off").unwrap(),
            ConsoleInput::Edit(SettingsEdit::LightEnabled(false))
        );
        assert_eq!(
            ConsoleInput::parse("set behavior open hold").unwrap(),
            ConsoleInput::Edit(SettingsEdit::Behavior(BehaviorMode::from("open hold")))
        );
        assert_eq!(
            ConsoleInput::parse("set password").unwrap(),
            ConsoleInput::Edit(SettingsEdit::Password(String::new()))
        );
    }

    #[test]
    fn test_parse_edit_errors() {
        assert!(matches!(
            ConsoleInput::parse("set on 25:00"),
            Err(InputError::TimeOfDay(_))
        ));
        assert!(matches!(
            ConsoleInput::parse("set duration soon"),
            Err(InputError::InvalidValue { .. })
        ));
        assert_eq!(
            ConsoleInput::parse("set colour red"),
            Err(InputError::UnknownField("colour".into()))
        );
        assert_eq!(
            ConsoleInput::parse("set on"),
            Err(InputError::MissingValue("on".into()))
        );
    }

    #[test]
    fn test_edit_applies_to_settings() {
        let mut settings = DeviceSettings::default();
        SettingsEdit::parse("off", "22:15").unwrap().apply(&mut settings);
        SettingsEdit::parse("duration", "30").unwrap().apply(&mut settings);

        assert_eq!(settings.light_off.minutes(), 22 * 60 + 15);
        assert_eq!(settings.light_duration_minutes, 30);
    }

    #[test]
    fn test_render_state() {
        let mut state = ControllerState::default();
        assert_eq!(
            render_state(&state),
            "gate: unknown | light: unknown | action: [Open] | Stop"
        );

        state.gate = GateState::Moving;
        state.action.enabled = false;
        state.action.label = ActionLabel::InProgress;
        state.connectivity = Connectivity::Offline;
        assert_eq!(
            render_state(&state),
            "gate: moving | light: unknown | action: [-] (disabled) | Stop | OFFLINE, showing last known state"
        );
    }

    #[test]
    fn test_render_settings_masks_password() {
        let settings = DeviceSettings {
            password: "abc".to_string(),
            light_on: MinuteOfDay::new(90).unwrap(),
            ..Default::default()
        };

        let rendered = render_settings(&settings);
        assert!(rendered.contains("light on: 01:30"));
        assert!(rendered.contains("password: ***"));
        assert!(!rendered.contains("abc"));
    }
}
