//! Jump host tunnels.
//!
//! A [`TunnelSession`] holds one authenticated SSH transport to a device
//! that has already been reached and opens `direct-tcpip` channels through
//! it. A channel to port 22 of the next device is then upgraded into a
//! [`DeviceSession`] exactly as a TCP socket would be.
//!
//! Tunnels nest: the transport of a tunnel into hop *k* can itself ride on a
//! forwarded channel of the tunnel into hop *k*-1. The outer tunnel must
//! therefore outlive every tunnel and session opened through it.

use log::{debug, info, warn};
use russh::Channel;
use russh::client::Msg;

use crate::driver::DeviceSession;
use crate::error::{Result, TunnelError};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// Port forwarded channels are opened to on the inner device.
pub const SSH_PORT: u16 = 22;

enum TunnelState {
    Idle,
    Open(SshTransport),
    Closed,
}

/// An SSH transport to a jump host, used only for forwarding.
pub struct TunnelSession {
    /// Jump host address and the credentials used against it.
    config: SshConfig,

    state: TunnelState,
}

impl TunnelSession {
    /// Prepare a tunnel to `config.host`. Nothing is connected yet.
    pub fn new(config: SshConfig) -> Self {
        Self {
            config,
            state: TunnelState::Idle,
        }
    }

    /// Connect to the jump host over TCP and authenticate.
    pub async fn open(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let transport = SshTransport::connect(self.config.clone()).await?;
        info!("tunnel transport to {} open", self.config.host);
        self.state = TunnelState::Open(transport);
        Ok(())
    }

    /// Connect to the jump host through a forwarded channel of `upstream`.
    pub async fn open_via(&mut self, upstream: &TunnelSession) -> Result<()> {
        self.ensure_idle()?;
        let channel = upstream
            .open_forwarded_channel(&self.config.host, self.config.port)
            .await?;
        let transport =
            SshTransport::connect_stream(self.config.clone(), channel.into_stream()).await?;
        info!(
            "tunnel transport to {} open via {}",
            self.config.host,
            upstream.jump_host()
        );
        self.state = TunnelState::Open(transport);
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            TunnelState::Idle => Ok(()),
            TunnelState::Open(_) => Err(TunnelError::AlreadyOpen {
                jump_host: self.config.host.clone(),
            }
            .into()),
            TunnelState::Closed => Err(self.not_ready()),
        }
    }

    fn not_ready(&self) -> crate::Error {
        TunnelError::NotReady {
            jump_host: self.config.host.clone(),
        }
        .into()
    }

    /// Open a raw channel to `destination:port` through the jump host.
    ///
    /// Fails with [`TunnelError::NotReady`] before a successful `open` or
    /// after `close`.
    pub async fn open_forwarded_channel(
        &self,
        destination: &str,
        port: u16,
    ) -> Result<Channel<Msg>> {
        match self.state {
            TunnelState::Open(ref transport) if transport.is_alive() => {
                transport.open_direct_tcpip(destination, port).await
            }
            _ => Err(self.not_ready()),
        }
    }

    /// Log into `destination` through the jump host.
    ///
    /// The returned session uses the tunnel's credentials and timeouts.
    pub async fn connect_device(
        &self,
        destination: &str,
        platform: PlatformDefinition,
    ) -> Result<DeviceSession> {
        let channel = self.open_forwarded_channel(destination, SSH_PORT).await?;
        debug!("upgrading {} -> {} channel to a session", self.config.host, destination);
        DeviceSession::connect_over(
            self.config.for_host(destination),
            platform,
            channel.into_stream(),
        )
        .await
    }

    /// The jump host this tunnel goes through.
    pub fn jump_host(&self) -> &str {
        &self.config.host
    }

    /// Whether `open` succeeded and `close` has not been called.
    pub fn is_open(&self) -> bool {
        matches!(self.state, TunnelState::Open(_))
    }

    /// Tear down the transport. Idempotent; failures are only logged.
    pub async fn close(&mut self) {
        match std::mem::replace(&mut self.state, TunnelState::Closed) {
            TunnelState::Open(transport) => match transport.close().await {
                Ok(()) => debug!("tunnel transport to {} closed", self.config.host),
                Err(e) => warn!("closing tunnel to {} failed: {}", self.config.host, e),
            },
            TunnelState::Idle | TunnelState::Closed => {}
        }
    }
}
