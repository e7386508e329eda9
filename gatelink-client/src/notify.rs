use core::fmt;

use gatelink_api::Outcome;
use time::OffsetDateTime;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// User action that produced a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Command(String),
    SettingsLoad,
    SettingsSave,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Command(verb) => write!(f, "command '{}'", verb),
            Origin::SettingsLoad => f.write_str("settings load"),
            Origin::SettingsSave => f.write_str("settings save"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub origin: Origin,
    pub outcome: Outcome,
    pub at: OffsetDateTime,
}

/// One-shot outcome notifications for user-triggered round trips.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            sender: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }

    /// Returns the number of observers reached. No observers is not an error.
    pub fn publish(&self, origin: Origin, outcome: Outcome) -> usize {
        let notification = Notification {
            origin,
            outcome,
            at: OffsetDateTime::now_utc(),
        };

        self.sender.send(notification).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let notifier = Notifier::new();

        let mut receiver1 = notifier.subscribe();
        let mut receiver2 = notifier.subscribe();

        let reached = notifier.publish(Origin::Command("open".into()), Outcome::OpenCompleted);
        assert_eq!(reached, 2);

        for receiver in [&mut receiver1, &mut receiver2] {
            let notification = receiver.recv().await.unwrap();
            assert_eq!(notification.outcome, Outcome::OpenCompleted);
            assert_eq!(notification.origin, Origin::Command("open".into()));
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = Notifier::new();

        assert!(!notifier.has_subscribers());
        assert_eq!(notifier.publish(Origin::SettingsSave, Outcome::SettingsSaved), 0);
    }
}
