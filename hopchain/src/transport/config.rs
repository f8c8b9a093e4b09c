//! SSH connection configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;
use secrecy::SecretString;

/// Default for both the connect and the auth timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Longest accepted connect or auth timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For lab use only.
    Disabled,
}

/// Connect and authentication deadlines shared by every hop of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Bound on TCP connect, on the SSH banner/key exchange, and on each
    /// command round-trip. Each phase gets the full budget.
    pub connect: Duration,

    /// Bound on password authentication.
    pub auth: Duration,
}

impl Timeouts {
    /// Both phases bounded by the same duration.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            connect: timeout,
            auth: timeout,
        }
    }

    /// Whether both timeouts are non-zero and at most [`MAX_TIMEOUT`].
    pub fn is_valid(&self) -> bool {
        [self.connect, self.auth]
            .iter()
            .all(|t| !t.is_zero() && *t <= MAX_TIMEOUT)
    }

    /// Read `SSH_CONNECT_TIMEOUT` and `SSH_AUTH_TIMEOUT` (seconds).
    pub fn from_env() -> Self {
        Self {
            connect: secs_from_env("SSH_CONNECT_TIMEOUT"),
            auth: secs_from_env("SSH_AUTH_TIMEOUT"),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

fn secs_from_env(key: &str) -> Duration {
    parse_secs(key, env::var(key).ok().as_deref())
}

fn parse_secs(key: &str, value: Option<&str>) -> Duration {
    let secs = match value.map(str::trim) {
        None | Some("") => DEFAULT_TIMEOUT_SECS,
        Some(raw) => match raw.parse::<u64>() {
            Ok(0) | Err(_) => {
                warn!(
                    "{} has unusable value {:?}, using {}s",
                    key, raw, DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }
            Ok(secs) => secs,
        },
    };
    Duration::from_secs(secs)
}

/// SSH connection configuration for a single device.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Password for authentication, also answered at the `enable` prompt.
    pub password: SecretString,

    /// Connect, banner and command timeouts plus the auth timeout.
    pub timeouts: Timeouts,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Create a config with default port, terminal size and verification.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            password,
            timeouts,
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// The same credentials and settings aimed at another host.
    pub fn for_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self.clone()
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
