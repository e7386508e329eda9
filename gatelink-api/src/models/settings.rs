use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Outcome, TimeOfDayError};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since midnight, always in `0..=1439`.
///
/// Travels on the wire as a bare integer and is only presented as `HH:MM`
/// through [`fmt::Display`] and [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minutes: u32) -> Result<Self, TimeOfDayError> {
        if minutes < MINUTES_PER_DAY {
            Ok(Self(minutes as u16))
        } else {
            Err(TimeOfDayError::OutOfRange(minutes))
        }
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self, TimeOfDayError> {
        if hours > 23 || minutes > 59 {
            return Err(TimeOfDayError::InvalidFormat(format!("{hours}:{minutes}")));
        }
        Self::new(hours * 60 + minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0 as u32
    }

    pub fn hours_part(&self) -> u32 {
        self.minutes() / 60
    }

    pub fn minutes_part(&self) -> u32 {
        self.minutes() % 60
    }
}

impl TryFrom<u32> for MinuteOfDay {
    type Error = TimeOfDayError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<MinuteOfDay> for u32 {
    fn from(value: MinuteOfDay) -> Self {
        value.minutes()
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours_part(), self.minutes_part())
    }
}

impl FromStr for MinuteOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeOfDayError::InvalidFormat(s.to_string());

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let parse = |part: &str| {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        };

        Self::from_hm(parse(hours)?, parse(minutes)?).map_err(|_| invalid())
    }
}

/// Device-defined behavior mode, kept verbatim so a load/save cycle never
/// rewrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BehaviorMode(pub String);

impl BehaviorMode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BehaviorMode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for BehaviorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Light schedule and access configuration stored on the device.
///
/// Always sent whole on `POST /setsettings`; the device has no partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Whether the scheduled light is enabled
    #[serde(rename = "enableL")]
    pub light_enabled: bool,
    /// Time the light switches on
    #[serde(rename = "lightOnTime")]
    pub light_on: MinuteOfDay,
    /// Time the light switches off
    #[serde(rename = "lightOffTime")]
    pub light_off: MinuteOfDay,
    /// How long the light stays on, in minutes
    #[serde(rename = "lightDuration")]
    pub light_duration_minutes: u32,
    pub password: String,
    pub behavior: BehaviorMode,
}

/// Decoded body of `GET /getsettings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsReply {
    /// Code 8 with a complete settings object
    Settings(DeviceSettings),
    /// Code 8 whose settings object is missing or invalid
    Malformed,
    /// Any other code
    Other(Outcome),
}

impl SettingsReply {
    pub fn decode(body: &Value) -> Self {
        match super::reply_outcome(body) {
            Outcome::SettingsReturned => body
                .get("settings")
                .cloned()
                .and_then(|settings| serde_json::from_value(settings).ok())
                .map(SettingsReply::Settings)
                .unwrap_or(SettingsReply::Malformed),
            other => SettingsReply::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_minute_of_day_range() {
        assert!(MinuteOfDay::new(0).is_ok());
        assert!(MinuteOfDay::new(1439).is_ok());
        assert_eq!(MinuteOfDay::new(1440), Err(TimeOfDayError::OutOfRange(1440)));
    }

    #[test]
    fn test_hhmm_round_trip_for_whole_day() {
        for minutes in 0..MINUTES_PER_DAY {
            let value = MinuteOfDay::new(minutes).unwrap();
            let text = value.to_string();
            assert_eq!(text.len(), 5);
            assert_eq!(text.parse::<MinuteOfDay>().unwrap(), value);
        }
    }

    #[test]
    fn test_hhmm_presentation() {
        assert_eq!(MinuteOfDay::new(90).unwrap().to_string(), "01:30");
        assert_eq!(MinuteOfDay::new(1439).unwrap().to_string(), "23:59");
        assert_eq!("7:05".parse::<MinuteOfDay>().unwrap().minutes(), 425);
    }

    #[test]
    fn test_hhmm_rejects_invalid_text() {
        for text in ["", "12", "24:00", "12:60", "ab:cd", "1:2:3", "-1:30", "123:00", "12:"] {
            assert!(text.parse::<MinuteOfDay>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_settings_wire_format() {
        let settings = DeviceSettings {
            light_enabled: true,
            light_on: MinuteOfDay::new(90).unwrap(),
            light_off: MinuteOfDay::new(1380).unwrap(),
            light_duration_minutes: 15,
            password: "secret".to_string(),
            behavior: BehaviorMode::from("auto"),
        };

        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"enableL":true,"lightOnTime":90,"lightOffTime":1380,"lightDuration":15,"password":"secret","behavior":"auto"}"#
        );
    }

    #[test]
    fn test_decode_settings_reply() {
        let body = json!({
            "code": 8,
            "settings": {
                "enableL": false,
                "lightOnTime": 0,
                "lightOffTime": 1439,
                "lightDuration": 5,
                "password": "",
                "behavior": "manual"
            }
        });

        let SettingsReply::Settings(settings) = SettingsReply::decode(&body) else {
            panic!("expected settings");
        };
        assert_eq!(settings.light_off.to_string(), "23:59");
        assert_eq!(settings.behavior.as_str(), "manual");
    }

    #[test]
    fn test_decode_settings_reply_malformed() {
        assert_eq!(SettingsReply::decode(&json!({ "code": 8 })), SettingsReply::Malformed);

        let out_of_range = json!({
            "code": 8,
            "settings": {
                "enableL": true,
                "lightOnTime": 2000,
                "lightOffTime": 0,
                "lightDuration": 0,
                "password": "",
                "behavior": ""
            }
        });
        assert_eq!(SettingsReply::decode(&out_of_range), SettingsReply::Malformed);
    }

    #[test]
    fn test_decode_settings_reply_other_code() {
        assert_eq!(
            SettingsReply::decode(&json!({ "code": 5 })),
            SettingsReply::Other(Outcome::SettingsDeserializationError)
        );
    }
}
