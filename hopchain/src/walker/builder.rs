//! Builder for walks.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::connector::SshConnector;
use super::{RunResult, WalkRequest, Walker};
use crate::error::{Result, WalkError};
use crate::platform::PlatformDefinition;
use crate::platform::vendors::cisco_ios;
use crate::routing::{DEFAULT_OSPF_AREA, DEFAULT_OSPF_PROCESS_ID, Protocol};
use crate::transport::{HostKeyVerification, SshConfig, Timeouts};

/// Default number of devices to configure, seed included.
pub const DEFAULT_MAX_DEVICES: usize = 3;

/// Builder for a [`Walker`] over real SSH.
///
/// Every input is checked in [`build`](Self::build), before any device is
/// contacted.
///
/// # Example
///
/// ```rust,no_run
/// use hopchain::WalkerBuilder;
///
/// # async fn example() -> Result<(), hopchain::Error> {
/// let result = WalkerBuilder::new("148.204.58.1")
///     .username("cisco")
///     .password("cisco")
///     .protocol("ospf")
///     .max_devices(3)
///     .build()?
///     .run()
///     .await?;
///
/// for hop in &result.results {
///     println!("{} configured: {}", hop.label, hop.is_success());
/// }
/// # Ok(())
/// # }
/// ```
pub struct WalkerBuilder {
    seed: String,
    username: Option<String>,
    password: Option<SecretString>,
    protocol: Option<String>,
    max_devices: usize,
    ospf_process_id: u32,
    ospf_area: u32,
    timeouts: Timeouts,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    platform: Option<PlatformDefinition>,
}

impl WalkerBuilder {
    /// Start a walk at `seed`, the one address reachable without a jump host.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            username: None,
            password: None,
            protocol: None,
            max_devices: DEFAULT_MAX_DEVICES,
            ospf_process_id: DEFAULT_OSPF_PROCESS_ID,
            ospf_area: DEFAULT_OSPF_AREA,
            timeouts: Timeouts::default(),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            platform: None,
        }
    }

    /// Username used on every device.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Password used on every device, login and `enable` alike.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// `RIP` or `OSPF`, any case.
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Configure at most this many devices, seed included (default: 3).
    pub fn max_devices(mut self, max_devices: usize) -> Self {
        self.max_devices = max_devices;
        self
    }

    /// OSPF process id (default: 1). Ignored for RIP.
    pub fn ospf_process_id(mut self, process_id: u32) -> Self {
        self.ospf_process_id = process_id;
        self
    }

    /// OSPF area (default: 0). Ignored for RIP.
    pub fn ospf_area(mut self, area: u32) -> Self {
        self.ospf_area = area;
        self
    }

    /// Bound every connect phase and authentication by `timeout`.
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

    fn protocol_choice(&self) -> Result<Protocol> {
        let name = self.protocol.as_deref().ok_or_else(|| invalid("protocol is required"))?;
        Ok(match name.parse::<Protocol>()? {
            Protocol::Ospf { .. } => Protocol::Ospf {
                process_id: self.ospf_process_id,
                area: self.ospf_area,
            },
            Protocol::Rip => Protocol::Rip,
        })
    }

    /// Validate the inputs without building a connector.
    pub fn request(&self) -> Result<WalkRequest> {
        let protocol = self.protocol_choice()?;
        WalkRequest::new(self.seed.trim(), protocol, self.max_devices)
    }

    /// Validate and produce a walker.
    pub fn build(self) -> Result<Walker<SshConnector>> {
        let request = self.request()?;

        let username = match self.username {
            Some(ref name) if !name.trim().is_empty() => name.clone(),
            _ => return Err(invalid("username is required")),
        };
        let password = self.password.ok_or_else(|| invalid("password is required"))?;
        if !self.timeouts.is_valid() {
            return Err(invalid("timeouts must be non-zero and at most 24h"));
        }

        let platform = self.platform.unwrap_or_else(cisco_ios::platform);

        let mut template = SshConfig::new(request.seed(), username, password, self.timeouts);
        template.host_key_verification = self.host_key_verification;
        template.known_hosts_path = self.known_hosts_path;
        template.terminal_width = platform.terminal_width;
        template.terminal_height = platform.terminal_height;

        Ok(Walker::with_connector(
            request,
            SshConnector::new(template, platform),
        ))
    }
}

fn invalid(message: &str) -> crate::Error {
    WalkError::InvalidInput {
        message: message.to_string(),
    }
    .into()
}

/// Walk from `seed` and enable `protocol` on up to `max_devices` devices.
///
/// `connect_timeout_secs` bounds every connect phase and authentication.
/// Fails only on bad input or an unreachable seed; everything after the
/// seed is reported in the returned [`RunResult`].
pub async fn run_orchestration(
    seed: &str,
    username: &str,
    password: &str,
    protocol: &str,
    max_devices: usize,
    connect_timeout_secs: u64,
) -> Result<RunResult> {
    WalkerBuilder::new(seed)
        .username(username)
        .password(password)
        .protocol(protocol)
        .max_devices(max_devices)
        .timeout(Duration::from_secs(connect_timeout_secs))
        .build()?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn builder() -> WalkerBuilder {
        WalkerBuilder::new("148.204.58.1")
            .username("cisco")
            .password("cisco")
            .protocol("OSPF")
    }

    fn invalid_message(result: Result<Walker<SshConnector>>) -> String {
        match result {
            Err(Error::Walk(WalkError::InvalidInput { message })) => message,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("invalid input accepted"),
        }
    }

    #[test]
    fn test_defaults() {
        let walker = tokio_test::assert_ok!(builder().build());
        assert_eq!(walker.request().max_devices(), 3);
        assert_eq!(walker.request().protocol(), Protocol::ospf());
        assert_eq!(walker.request().seed(), "148.204.58.1");
    }

    #[test]
    fn test_ospf_overrides() {
        let request = builder().ospf_process_id(7).ospf_area(2).request().unwrap();
        assert_eq!(
            request.protocol(),
            Protocol::Ospf {
                process_id: 7,
                area: 2
            }
        );

        let rip = builder().protocol("rip").ospf_process_id(7).request().unwrap();
        assert_eq!(rip.protocol(), Protocol::Rip);
    }

    #[test]
    fn test_unknown_protocol() {
        let result = builder().protocol("EIGRP").build();
        assert!(matches!(
            result,
            Err(Error::Walk(WalkError::UnknownProtocol { ref name })) if name == "EIGRP"
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            invalid_message(builder().max_devices(0).build()),
            "max_devices must be at least 1"
        );
        let blank_seed = WalkerBuilder::new("  ")
            .username("a")
            .password("b")
            .protocol("rip");
        assert_eq!(invalid_message(blank_seed.build()), "seed address is required");
        assert_eq!(
            invalid_message(WalkerBuilder::new("10.0.0.1").password("b").protocol("rip").build()),
            "username is required"
        );
        assert_eq!(
            invalid_message(WalkerBuilder::new("10.0.0.1").username("a").protocol("rip").build()),
            "password is required"
        );
        assert_eq!(
            invalid_message(WalkerBuilder::new("10.0.0.1").username("a").password("b").build()),
            "protocol is required"
        );
        assert_eq!(
            invalid_message(builder().timeout(Duration::ZERO).build()),
            "timeouts must be non-zero and at most 24h"
        );
    }

    #[test]
    fn test_oversized_timeout_is_rejected() {
        assert_eq!(
            invalid_message(builder().timeout(Duration::from_secs(u64::MAX)).build()),
            "timeouts must be non-zero and at most 24h"
        );
        assert!(builder().timeout(crate::transport::config::MAX_TIMEOUT).build().is_ok());
    }

    #[tokio::test]
    async fn test_run_orchestration_rejects_huge_timeout() {
        let result =
            run_orchestration("148.204.58.1", "cisco", "cisco", "OSPF", 3, u64::MAX).await;
        assert!(matches!(
            result,
            Err(Error::Walk(WalkError::InvalidInput { .. }))
        ));
    }

    #[tokio::test]
    async fn test_run_orchestration_rejects_input_before_connecting() {
        let result = run_orchestration("148.204.58.1", "cisco", "cisco", "BGP", 3, 10).await;
        assert!(matches!(
            result,
            Err(Error::Walk(WalkError::UnknownProtocol { .. }))
        ));
    }
}
