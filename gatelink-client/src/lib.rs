use std::sync::Arc;
use std::time::Duration;

use gatelink_api::Outcome;
use gatelink_api::models::Command;
use tracing::info;

use crate::configs::Settings;
use crate::dispatcher::CommandDispatcher;
use crate::error::TransportError;
use crate::notify::Notifier;
use crate::poller::{PollerHandle, StatusPoller};
use crate::settings_sync::SettingsSync;
use crate::state::StateStore;
use crate::transport::{DeviceTransport, HttpTransport};

pub mod configs;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod notify;
pub mod poller;
pub mod settings_sync;
pub mod state;
pub mod transport;

/// Client-side controller for one gate device.
pub struct Controller {
    store: StateStore,
    notifier: Notifier,
    dispatcher: CommandDispatcher,
    poller: StatusPoller,
    settings: SettingsSync,
    poll_interval: Duration,
}

impl Controller {
    pub fn new(transport: Arc<dyn DeviceTransport>, poll_interval: Duration) -> Self {
        let store = StateStore::new();
        let notifier = Notifier::new();

        Self {
            dispatcher: CommandDispatcher::new(transport.clone(), store.clone(), notifier.clone()),
            poller: StatusPoller::new(transport.clone(), store.clone()),
            settings: SettingsSync::new(transport, notifier.clone()),
            store,
            notifier,
            poll_interval,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, TransportError> {
        let transport = Arc::new(HttpTransport::new(&settings.device)?);

        Ok(Self::new(transport, settings.poller.interval()))
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn settings(&self) -> &SettingsSync {
        &self.settings
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Dispatches a command and, if the device answered, refreshes status
    /// right away so the provisional control state is corrected early.
    pub async fn command(&self, command: impl Into<Command>) -> Outcome {
        match self.dispatcher.send(command).await {
            Ok(outcome) => {
                self.poller.poll().await;
                outcome
            }
            Err(_) => Outcome::OperationFailed,
        }
    }

    /// Loads settings, polls once, then keeps polling on the configured
    /// interval until the returned handle is stopped.
    pub async fn start(&self) -> PollerHandle {
        self.settings.load().await;
        self.poller.poll().await;

        info!("Polling device status every {:?}", self.poll_interval);

        // first tick already happened above
        self.poller
            .clone()
            .spawn_after(self.poll_interval, self.poll_interval)
    }
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn std::error::Error>> {
    let controller = Arc::new(Controller::from_settings(settings)?);

    info!("Controlling device at {}", settings.device.base_url);

    console::run(controller).await?;

    Ok(())
}
