use std::sync::Arc;
use std::time::Duration;

use gatelink_api::models::StatusReply;
use time::OffsetDateTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::state::{StateEvent, StateStore};
use crate::transport::DeviceTransport;

const STATUS_PATH: &str = "/getstatus";

/// Result of one status round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// Trusted state was applied
    Updated,
    /// The device answered, but not with a usable status
    Ignored(StatusReply),
    /// The request never completed
    Unreachable,
}

/// Fetches `/getstatus` and is the only writer of gate and light state.
#[derive(Clone)]
pub struct StatusPoller {
    transport: Arc<dyn DeviceTransport>,
    store: StateStore,
}

impl StatusPoller {
    pub fn new(transport: Arc<dyn DeviceTransport>, store: StateStore) -> Self {
        Self { transport, store }
    }

    /// Runs a single poll tick. Never notifies the user.
    pub async fn poll(&self) -> PollResult {
        let body = match self.transport.get(STATUS_PATH).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Status poll failed: {}", e);
                self.store.apply(StateEvent::RoundTripFailed);
                return PollResult::Unreachable;
            }
        };

        // StatusReported also completes the round trip
        match StatusReply::decode(&body) {
            StatusReply::Status(report) => {
                self.store.apply(StateEvent::StatusReported {
                    report,
                    at: OffsetDateTime::now_utc(),
                });
                PollResult::Updated
            }
            reply @ StatusReply::Malformed => {
                warn!("Status reply without gate or light status: {}", body);
                self.store.apply(StateEvent::RoundTripCompleted);
                PollResult::Ignored(reply)
            }
            reply @ StatusReply::Other(outcome) => {
                debug!("Status poll answered with {:?}: {}", outcome, outcome);
                self.store.apply(StateEvent::RoundTripCompleted);
                PollResult::Ignored(reply)
            }
        }
    }

    /// Polls immediately, then every `period` until the handle is stopped.
    pub fn spawn(self, period: Duration) -> PollerHandle {
        self.spawn_after(Duration::ZERO, period)
    }

    /// Like [`spawn`](Self::spawn), with the first tick delayed by `delay`.
    pub fn spawn_after(self, delay: Duration, period: Duration) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        self.poll().await;
                    }
                }
            }

            debug!("Status poller stopped");
        });

        PollerHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Owner of a running poll loop.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the loop after any in-flight tick and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Err(e) = (&mut self.task).await {
            warn!("Status poller ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.task.abort();
        }
    }
}
