//! Routing protocol bring-up command sequences.
//!
//! The sequences are sent as-is and their combined output is returned for
//! auditing. Whether the protocol actually converges is not checked.

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::driver::AdminSession;
use crate::error::{Result, WalkError};

/// Enter global configuration mode.
pub const CONFIGURE_TERMINAL: &str = "configure terminal";
/// Leave configuration mode.
pub const END: &str = "end";
/// Persist the running configuration.
pub const WRITE_MEMORY: &str = "write memory";

/// Default OSPF process id.
pub const DEFAULT_OSPF_PROCESS_ID: u32 = 1;
/// Default OSPF area.
pub const DEFAULT_OSPF_AREA: u32 = 0;

/// Routing protocol to enable on every device of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// RIP version 2 without auto-summary.
    Rip,

    /// OSPF with a catch-all network statement.
    Ospf { process_id: u32, area: u32 },
}

impl Protocol {
    /// OSPF with process 1, area 0.
    pub fn ospf() -> Self {
        Self::Ospf {
            process_id: DEFAULT_OSPF_PROCESS_ID,
            area: DEFAULT_OSPF_AREA,
        }
    }

    /// `RIP` or `OSPF`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rip => "RIP",
            Self::Ospf { .. } => "OSPF",
        }
    }

    /// The full command sequence, from entering to leaving configuration
    /// mode and saving.
    pub fn commands(&self) -> Vec<String> {
        let body = match *self {
            Self::Rip => vec![
                "router rip".to_string(),
                "version 2".to_string(),
                "no auto-summary".to_string(),
            ],
            Self::Ospf { process_id, area } => vec![
                format!("router ospf {process_id}"),
                format!("network 0.0.0.0 255.255.255.255 area {area}"),
            ],
        };

        let mut commands = Vec::with_capacity(body.len() + 3);
        commands.push(CONFIGURE_TERMINAL.to_string());
        commands.extend(body);
        commands.push(END.to_string());
        commands.push(WRITE_MEMORY.to_string());
        commands
    }

    /// Send this protocol's sequence over `session`.
    pub async fn enable<S: AdminSession>(&self, session: &mut S) -> Result<String> {
        info!("enabling {}", self);
        session.send_config_set(&self.commands()).await
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = crate::Error;

    /// Case-insensitive, surrounding whitespace ignored. OSPF gets the
    /// default process id and area.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("RIP") {
            Ok(Self::Rip)
        } else if name.eq_ignore_ascii_case("OSPF") {
            Ok(Self::ospf())
        } else {
            Err(WalkError::UnknownProtocol {
                name: s.to_string(),
            }
            .into())
        }
    }
}

/// Enable RIPv2 on the device behind `session`.
pub async fn enable_rip<S: AdminSession>(session: &mut S) -> Result<String> {
    Protocol::Rip.enable(session).await
}

/// Enable OSPF `process_id` with every address in `area`.
pub async fn enable_ospf<S: AdminSession>(
    session: &mut S,
    process_id: u32,
    area: u32,
) -> Result<String> {
    Protocol::Ospf { process_id, area }.enable(session).await
}
