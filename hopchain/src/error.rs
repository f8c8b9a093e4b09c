//! Error types for hopchain.
//!
//! Only [`WalkError`] variants ever escape a walk. Everything that goes wrong
//! on a non-seed hop is folded into the run's [`HopResult`](crate::walker::HopResult)
//! list instead.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for hopchain operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Administrative session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Jump host tunnel errors
    #[error("Tunnel error: {0}")]
    Tunnel(#[from] TunnelError),

    /// Run-level failures
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Host key does not match the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt matching, shell I/O).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt was not seen in time
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Administrative session errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session not connected
    #[error("Session not connected")]
    NotConnected,

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// Jump host tunnel errors.
#[derive(Error, Debug)]
pub enum TunnelError {
    /// Forwarding requested before `open()` succeeded or after `close()`
    #[error("Tunnel through {jump_host} is not open")]
    NotReady { jump_host: String },

    /// `open()` called twice
    #[error("Tunnel through {jump_host} is already open")]
    AlreadyOpen { jump_host: String },
}

/// Errors that abort a whole walk.
#[derive(Error, Debug)]
pub enum WalkError {
    /// Protocol name other than RIP or OSPF
    #[error("Unknown routing protocol '{name}', expected RIP or OSPF")]
    UnknownProtocol { name: String },

    /// Malformed walk parameters
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Seed could not be reached or authenticated
    #[error("Seed {address} unreachable: {source}")]
    SeedUnreachable {
        address: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type alias using hopchain's Error.
pub type Result<T> = std::result::Result<T, Error>;
