use gatelink_api::models::{GateState, LightState, StatusReport};
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

/// Label of the primary open/close control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionLabel {
    #[default]
    Open,
    Close,
    /// Shown while the gate is moving
    InProgress,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionControl {
    pub enabled: bool,
    pub label: ActionLabel,
}

impl ActionControl {
    /// Control presentation derived from a trusted gate state.
    pub fn for_gate(gate: GateState) -> Self {
        match gate {
            GateState::Moving => Self {
                enabled: false,
                label: ActionLabel::InProgress,
            },
            GateState::Open => Self {
                enabled: true,
                label: ActionLabel::Close,
            },
            _ => Self {
                enabled: true,
                label: ActionLabel::Open,
            },
        }
    }
}

/// What the stop control does when pressed next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopAffordance {
    /// Sends `stop`: a motion is underway and can be interrupted
    #[default]
    Stop,
    /// Sends `open`: the gate is paused
    Resume,
}

impl StopAffordance {
    pub fn verb(&self) -> &'static str {
        match self {
            StopAffordance::Stop => "stop",
            StopAffordance::Resume => "open",
        }
    }
}

/// Snapshot of everything the client believes about the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub gate: GateState,
    pub light: LightState,
    pub connectivity: Connectivity,
    pub action: ActionControl,
    pub affordance: StopAffordance,
    /// Arrival time of the last trusted status report
    pub reported_at: Option<OffsetDateTime>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            gate: GateState::Unknown,
            light: LightState::Unknown,
            connectivity: Connectivity::Online,
            action: ActionControl::for_gate(GateState::Unknown),
            affordance: StopAffordance::Stop,
            reported_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A request reached the device and came back
    RoundTripCompleted,
    /// A request failed below the application layer
    RoundTripFailed,
    /// A code 9 status reply with both fields present. Also completes the
    /// round trip that carried it.
    StatusReported {
        report: StatusReport,
        at: OffsetDateTime,
    },
    /// A command result moved the stop control
    AffordanceChanged(StopAffordance),
}

impl ControllerState {
    pub fn is_online(&self) -> bool {
        self.connectivity == Connectivity::Online
    }

    /// Applies one event and reports whether an observer could tell the
    /// difference. Report timestamps alone do not count as a change.
    pub fn apply(&mut self, event: StateEvent) -> bool {
        match event {
            StateEvent::RoundTripCompleted => self.set_connectivity(Connectivity::Online),
            StateEvent::RoundTripFailed => self.set_connectivity(Connectivity::Offline),
            StateEvent::StatusReported { report, at } => {
                let reconnected = self.set_connectivity(Connectivity::Online);
                self.reported_at = Some(at);

                let action = ActionControl::for_gate(report.gate);
                let changed =
                    self.gate != report.gate || self.light != report.light || self.action != action;

                if changed {
                    info!(
                        "Device reports gate {:?}, light {:?}",
                        report.gate, report.light
                    );
                    self.gate = report.gate;
                    self.light = report.light;
                    self.action = action;
                }
                changed || reconnected
            }
            StateEvent::AffordanceChanged(affordance) => {
                let changed = self.affordance != affordance;
                self.affordance = affordance;
                changed
            }
        }
    }

    fn set_connectivity(&mut self, connectivity: Connectivity) -> bool {
        if self.connectivity == connectivity {
            return false;
        }

        match connectivity {
            Connectivity::Online => info!("Device connection restored"),
            Connectivity::Offline => warn!("Device connection lost"),
        }
        self.connectivity = connectivity;
        true
    }
}

/// Single owner of [`ControllerState`].
///
/// Writers never touch fields directly; they submit [`StateEvent`]s which
/// are applied atomically. Observers are woken only when a snapshot changed.
#[derive(Clone)]
pub struct StateStore {
    sender: watch::Sender<ControllerState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_state(ControllerState::default())
    }

    pub fn with_state(state: ControllerState) -> Self {
        let (sender, _) = watch::channel(state);
        Self { sender }
    }

    pub fn apply(&self, event: StateEvent) -> bool {
        self.sender.send_if_modified(|state| state.apply(event))
    }

    pub fn snapshot(&self) -> ControllerState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.sender.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
