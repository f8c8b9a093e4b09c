//! How a walk reaches devices.

use std::future::Future;

use crate::driver::{AdminSession, DeviceSession};
use crate::error::Result;
use crate::platform::PlatformDefinition;
use crate::transport::SshConfig;
use crate::tunnel::TunnelSession;

/// Opens administrative sessions and jump host tunnels.
///
/// A walk only talks to devices through this trait, so a scripted network
/// can stand in for real SSH.
pub trait Connector: Send + Sync {
    /// Administrative session on one device.
    type Session: AdminSession;

    /// Forwarding-only connection to a jump host.
    type Tunnel: Send + Sync;

    /// Log straight into `address`.
    fn connect_direct(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Self::Session>> + Send;

    /// Open a tunnel to `jump_host`, itself reached through `via` when given.
    fn open_tunnel(
        &self,
        jump_host: &str,
        via: Option<&Self::Tunnel>,
    ) -> impl Future<Output = Result<Self::Tunnel>> + Send;

    /// Log into `destination` through `tunnel`.
    fn connect_through(
        &self,
        tunnel: &Self::Tunnel,
        destination: &str,
    ) -> impl Future<Output = Result<Self::Session>> + Send;

    /// Tear down `tunnel`. Failures are logged, never returned.
    fn close_tunnel(&self, tunnel: &mut Self::Tunnel) -> impl Future<Output = ()> + Send;
}

/// [`Connector`] over real SSH.
///
/// Every device and jump host is logged into with the same credentials and
/// timeouts; only the address changes.
pub struct SshConnector {
    template: SshConfig,
    platform: PlatformDefinition,
}

impl SshConnector {
    /// `template.host` is ignored; each connection replaces it.
    pub fn new(template: SshConfig, platform: PlatformDefinition) -> Self {
        Self { template, platform }
    }

    /// Settings shared by every connection.
    pub fn template(&self) -> &SshConfig {
        &self.template
    }
}

impl Connector for SshConnector {
    type Session = DeviceSession;
    type Tunnel = TunnelSession;

    async fn connect_direct(&self, address: &str) -> Result<DeviceSession> {
        DeviceSession::connect(self.template.for_host(address), self.platform.clone()).await
    }

    async fn open_tunnel(
        &self,
        jump_host: &str,
        via: Option<&TunnelSession>,
    ) -> Result<TunnelSession> {
        let mut tunnel = TunnelSession::new(self.template.for_host(jump_host));
        match via {
            Some(upstream) => tunnel.open_via(upstream).await?,
            None => tunnel.open().await?,
        }
        Ok(tunnel)
    }

    async fn connect_through(
        &self,
        tunnel: &TunnelSession,
        destination: &str,
    ) -> Result<DeviceSession> {
        tunnel.connect_device(destination, self.platform.clone()).await
    }

    async fn close_tunnel(&self, tunnel: &mut TunnelSession) {
        tunnel.close().await;
    }
}
