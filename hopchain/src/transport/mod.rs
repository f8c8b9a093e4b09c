//! SSH transport layer wrapping russh.
//!
//! This module provides the low-level SSH connection management:
//! connection setup over TCP or over a forwarded channel, password
//! authentication, and creation of shell and direct-tcpip channels.

pub mod config;
mod ssh;

pub use config::{HostKeyVerification, SshConfig, Timeouts};
pub use ssh::SshTransport;
