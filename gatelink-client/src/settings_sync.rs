use std::sync::Arc;

use gatelink_api::Outcome;
use gatelink_api::models::{DeviceSettings, SettingsReply, reply_outcome};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::notify::{Notifier, Origin};
use crate::transport::DeviceTransport;

const GET_SETTINGS_PATH: &str = "/getsettings";
const SET_SETTINGS_PATH: &str = "/setsettings";

/// Mirror of the device configuration.
///
/// The held copy only ever changes to a complete payload the device
/// returned (code 8) or accepted (code 6). Settings traffic never touches
/// connectivity; that signal belongs to commands and status polls.
pub struct SettingsSync {
    transport: Arc<dyn DeviceTransport>,
    notifier: Notifier,
    current: RwLock<Option<DeviceSettings>>,
}

impl SettingsSync {
    pub fn new(transport: Arc<dyn DeviceTransport>, notifier: Notifier) -> Self {
        Self {
            transport,
            notifier,
            current: RwLock::new(None),
        }
    }

    /// Last loaded or saved settings, or defaults if none were obtained yet.
    pub async fn current(&self) -> DeviceSettings {
        self.current.read().await.clone().unwrap_or_default()
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Fetches `/getsettings` and adopts the payload on code 8.
    pub async fn load(&self) -> Outcome {
        let body = match self.transport.get(GET_SETTINGS_PATH).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Settings load failed: {}", e);
                return Outcome::OperationFailed;
            }
        };

        let outcome = match SettingsReply::decode(&body) {
            SettingsReply::Settings(settings) => {
                info!("Loaded device settings");
                *self.current.write().await = Some(settings);
                Outcome::SettingsReturned
            }
            SettingsReply::Malformed => {
                warn!("Settings reply without a valid settings object: {}", body);
                Outcome::OperationFailed
            }
            SettingsReply::Other(outcome) => {
                debug!("Settings load answered with {:?}", outcome);
                outcome
            }
        };

        self.notifier.publish(Origin::SettingsLoad, outcome);
        outcome
    }

    /// Pushes the complete settings record to `/setsettings`.
    pub async fn save(&self, pending: &DeviceSettings) -> Outcome {
        let payload = match serde_json::to_value(pending) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode settings: {}", e);
                return Outcome::OperationFailed;
            }
        };

        let body = match self.transport.post(SET_SETTINGS_PATH, &payload).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Settings save failed: {}", e);
                return Outcome::OperationFailed;
            }
        };

        let outcome = reply_outcome(&body);
        if outcome == Outcome::SettingsSaved {
            info!("Device accepted new settings");
            *self.current.write().await = Some(pending.clone());
        } else {
            debug!("Settings save answered with {:?}", outcome);
        }

        self.notifier.publish(Origin::SettingsSave, outcome);
        outcome
    }
}
