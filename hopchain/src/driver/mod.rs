//! Administrative sessions: the command/response layer over SSH.
//!
//! [`AdminSession`] is the only thing the configurator and the walker see.
//! [`DeviceSession`] implements it the same way whether its SSH transport
//! is a direct TCP connection or a channel forwarded through a jump host.

mod builder;
mod privilege;
pub(crate) mod response;
mod session;

pub use builder::{SessionBuilder, connect_direct};
pub use privilege::{PrivilegeManager, Transition};
pub use response::Response;
pub use session::DeviceSession;

use std::future::Future;

use crate::error::Result;

/// An authenticated command/response session against one device.
pub trait AdminSession: Send {
    /// Run one command and return its output without echo or prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Run commands in order and return their combined raw output.
    ///
    /// Output that signals a rejected command does not stop the sequence.
    fn send_config_set(
        &mut self,
        commands: &[String],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Close the session. Idempotent; failures are logged, never returned.
    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;
}
