use std::sync::Arc;

use gatelink_api::Outcome;
use gatelink_api::models::{Command, reply_outcome};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::notify::{Notifier, Origin};
use crate::state::{StateEvent, StateStore, StopAffordance};
use crate::transport::DeviceTransport;

/// Sends user commands to the device and applies their provisional effects.
///
/// Overlapping calls are not coalesced: each one is an independent round
/// trip and whichever finishes last wins.
pub struct CommandDispatcher {
    transport: Arc<dyn DeviceTransport>,
    store: StateStore,
    notifier: Notifier,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn DeviceTransport>, store: StateStore, notifier: Notifier) -> Self {
        Self {
            transport,
            store,
            notifier,
        }
    }

    /// Issues `GET /<command>` and returns the interpreted outcome.
    ///
    /// A transport failure marks the device offline and yields
    /// [`Outcome::OperationFailed`] without a notification; the connectivity
    /// signal is what tells the user.
    pub async fn dispatch(&self, command: impl Into<Command>) -> Outcome {
        self.send(command).await.unwrap_or(Outcome::OperationFailed)
    }

    /// Like [`dispatch`](Self::dispatch), but reports transport failures.
    pub async fn send(&self, command: impl Into<Command>) -> Result<Outcome, TransportError> {
        let command = command.into();
        let path = command.path();

        let body = match self.transport.get(&path).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Command {} failed: {}", command, e);
                self.store.apply(StateEvent::RoundTripFailed);
                return Err(e);
            }
        };

        let outcome = reply_outcome(&body);
        debug!("Command {} answered with {:?}", command, outcome);

        self.store.apply(StateEvent::RoundTripCompleted);

        if let Some(affordance) = Self::affordance_after(&command, outcome) {
            info!("Stop control now {:?}", affordance);
            self.store.apply(StateEvent::AffordanceChanged(affordance));
        }

        self.notifier
            .publish(Origin::Command(command.verb().to_string()), outcome);

        Ok(outcome)
    }

    /// Stop control transition for a (command, outcome) pair, if any.
    pub fn affordance_after(command: &Command, outcome: Outcome) -> Option<StopAffordance> {
        match (command, outcome) {
            (Command::Stop, Outcome::StopCompleted) => Some(StopAffordance::Resume),
            (Command::Open, Outcome::OpenCompleted) => Some(StopAffordance::Stop),
            _ => None,
        }
    }
}
