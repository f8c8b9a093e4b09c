//! Builder for administrative sessions.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::session::DeviceSession;
use crate::error::{Result, SessionError};
use crate::platform::PlatformDefinition;
use crate::platform::vendors::cisco_ios;
use crate::transport::{HostKeyVerification, SshConfig, Timeouts};

/// Builder for direct administrative sessions.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use hopchain::{AdminSession, SessionBuilder};
///
/// # async fn example() -> Result<(), hopchain::Error> {
/// let mut session = SessionBuilder::new("148.204.58.1")
///     .username("cisco")
///     .password("cisco")
///     .timeout(Duration::from_secs(10))
///     .connect()
///     .await?;
///
/// let brief = session.send_command("show ip interface brief").await?;
/// println!("{brief}");
/// session.disconnect().await;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    timeouts: Timeouts,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    platform: Option<PlatformDefinition>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            timeouts: Timeouts::default(),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            platform: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password for authentication and `enable`.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Bound connect, banner, authentication and each command by `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeouts = Timeouts::uniform(timeout);
        self
    }

    /// Set connect and auth timeouts separately.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Use a platform other than Cisco IOS.
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Validate and produce the SSH configuration and platform.
    pub fn build(self) -> Result<(SshConfig, PlatformDefinition)> {
        let username = self.username.ok_or_else(|| SessionError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;
        let password = self.password.ok_or_else(|| SessionError::InvalidConfig {
            message: "Password is required".to_string(),
        })?;

        if self.host.trim().is_empty() {
            return Err(SessionError::InvalidConfig {
                message: "Host is required".to_string(),
            }
            .into());
        }

        if !self.timeouts.is_valid() {
            return Err(SessionError::InvalidConfig {
                message: "Timeouts must be non-zero and at most 24h".to_string(),
            }
            .into());
        }

        let platform = self.platform.unwrap_or_else(cisco_ios::platform);

        let mut config = SshConfig::new(self.host, username, password, self.timeouts);
        config.port = self.port;
        config.host_key_verification = self.host_key_verification;
        config.known_hosts_path = self.known_hosts_path;
        config.terminal_width = platform.terminal_width;
        config.terminal_height = platform.terminal_height;

        Ok((config, platform))
    }

    /// Connect directly to the host.
    pub async fn connect(self) -> Result<DeviceSession> {
        let (config, platform) = self.build()?;
        DeviceSession::connect(config, platform).await
    }
}

/// Open an administrative session straight to `address`.
pub async fn connect_direct(
    address: &str,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<DeviceSession> {
    SessionBuilder::new(address)
        .username(username)
        .password(password)
        .timeout(timeout)
        .connect()
        .await
}
