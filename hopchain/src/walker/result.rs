//! What a walk produces.

use std::fmt;

use serde::Serialize;

/// Reason recorded when no /30 neighbor could be inferred.
pub const NO_NEXT_HOP: &str = "no next hop detected";

/// Position label of the `position`-th device, starting at `R1`.
pub fn hop_label(position: usize) -> String {
    format!("R{position}")
}

/// A device that was reached, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceHop {
    /// `R1`, `R2`, ...
    #[serde(rename = "name")]
    pub label: String,

    /// Address the administrative session was opened against.
    #[serde(rename = "mgmt_ip")]
    pub address: String,

    /// Previous hop's address; `None` only for the seed.
    pub jump_via: Option<String>,
}

/// How one attempted hop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HopOutcome {
    /// Protocol commands were sent; `output` is what the device printed.
    Configured { output: String },

    /// Reaching or configuring the device failed.
    Failed { error: String },

    /// Discovery found no further device; the walk stopped normally.
    Halted { reason: String },
}

/// Record of one attempted hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HopResult {
    #[serde(rename = "device")]
    pub label: String,

    /// Target address; unknown when discovery failed.
    #[serde(rename = "ip")]
    pub address: Option<String>,

    /// Jump host the device was (to be) reached through.
    pub via: Option<String>,

    /// Whether an administrative session to the device was established.
    pub reached: bool,

    #[serde(flatten)]
    pub outcome: HopOutcome,
}

impl HopResult {
    pub(crate) fn configured(
        position: usize,
        address: &str,
        via: Option<&str>,
        output: String,
    ) -> Self {
        Self {
            label: hop_label(position),
            address: Some(address.to_string()),
            via: via.map(str::to_string),
            reached: true,
            outcome: HopOutcome::Configured { output },
        }
    }

    /// The device could not be reached.
    pub(crate) fn failed(
        position: usize,
        address: Option<&str>,
        via: Option<&str>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            label: hop_label(position),
            address: address.map(str::to_string),
            via: via.map(str::to_string),
            reached: false,
            outcome: HopOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    /// The device was reached but its configuration failed.
    pub(crate) fn rejected(
        position: usize,
        address: &str,
        via: Option<&str>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            reached: true,
            ..Self::failed(position, Some(address), via, error)
        }
    }

    pub(crate) fn halted(position: usize) -> Self {
        Self {
            label: hop_label(position),
            address: None,
            via: None,
            reached: false,
            outcome: HopOutcome::Halted {
                reason: NO_NEXT_HOP.to_string(),
            },
        }
    }

    /// Whether the device was reached and configured.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, HopOutcome::Configured { .. })
    }

    /// Device output when configured.
    pub fn output(&self) -> Option<&str> {
        match self.outcome {
            HopOutcome::Configured { ref output } => Some(output),
            _ => None,
        }
    }
}

/// Where the walk's state machine was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Seeding,
    Configuring(usize),
    Discovering(usize),
    Tunneling { from: usize, to: usize },
    Done,
    Halted,
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeding => f.write_str("Seeding"),
            Self::Configuring(k) => write!(f, "Configuring({k})"),
            Self::Discovering(k) => write!(f, "Discovering({k})"),
            Self::Tunneling { from, to } => write!(f, "Tunneling({from}->{to})"),
            Self::Done => f.write_str("Done"),
            Self::Halted => f.write_str("Halted"),
        }
    }
}

/// Complete output of one walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// `RIP` or `OSPF`.
    pub protocol: String,

    #[serde(rename = "seed_ip")]
    pub seed: String,

    /// Reached devices; `devices[0]` is the seed.
    pub devices: Vec<DeviceHop>,

    /// One entry per attempted hop, including a failed or halted last one.
    pub results: Vec<HopResult>,

    /// States visited, in order.
    #[serde(skip)]
    pub states: Vec<WalkState>,
}

impl RunResult {
    pub(crate) fn new(protocol: &str, seed: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            seed: seed.to_string(),
            devices: Vec::new(),
            results: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Whether the walk ended because discovery ran dry or a hop failed.
    pub fn halted(&self) -> bool {
        self.states.last() == Some(&WalkState::Halted)
    }

    /// Number of devices that were configured.
    pub fn configured_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}
