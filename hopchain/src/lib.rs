//! # Hopchain
//!
//! Async seed-and-jump routing bring-up for chains of Cisco IOS style
//! devices.
//!
//! Starting from one directly reachable seed, hopchain enables RIP or OSPF
//! on each device, infers the next device from the current one's /30
//! links, and reaches it by tunneling SSH through the devices already
//! reached.
//!
//! ## Features
//!
//! - Async SSH connections via russh, direct or through `direct-tcpip`
//!   channels of a jump host
//! - Nested tunnels for devices several hops away
//! - Efficient pattern buffer matching (tail search over ANSI-stripped output)
//! - Privilege level management with graph-based navigation
//! - Pure parsers for `show ip interface brief` and running-config
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), hopchain::Error> {
//!     let result = hopchain::run_orchestration(
//!         "148.204.58.1",
//!         "cisco",
//!         "cisco",
//!         "OSPF",
//!         3,
//!         10,
//!     )
//!     .await?;
//!
//!     for device in &result.devices {
//!         println!("{} {} via {:?}", device.label, device.address, device.jump_via);
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod parse;
pub mod platform;
pub mod routing;
pub mod transport;
pub mod tunnel;
pub mod walker;

// Re-export main types for convenience
pub use driver::{AdminSession, DeviceSession, Response, SessionBuilder, connect_direct};
pub use error::{Error, Result};
pub use inventory::{Inventory, MemoryInventory, record_run};
pub use platform::{PlatformDefinition, PrivilegeLevel};
pub use routing::{Protocol, enable_ospf, enable_rip};
pub use transport::{HostKeyVerification, SshConfig, Timeouts};
pub use tunnel::TunnelSession;
pub use walker::{
    Connector, DeviceHop, HopOutcome, HopResult, RunResult, SshConnector, WalkRequest, Walker,
    WalkerBuilder, run_orchestration,
};
