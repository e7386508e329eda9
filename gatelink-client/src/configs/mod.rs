mod settings;

pub use settings::{Device, Logger, Poller, Settings, SettingsError};
