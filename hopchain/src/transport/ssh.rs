//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::Channel;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use secrecy::ExposeSecret;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::config::{HostKeyVerification, SshConfig};
use crate::error::{Result, TransportError};

/// Originator reported in direct-tcpip requests. Devices ignore it.
const ORIGINATOR: (&str, u32) = ("127.0.0.1", 0);

/// One authenticated SSH connection.
///
/// The underlying byte stream is either a TCP socket (direct connection) or
/// a forwarded channel of another `SshTransport` (tunneled connection); the
/// rest of the crate cannot tell the two apart.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Configuration used for this connection.
    config: SshConfig,
}

impl SshTransport {
    /// Open a TCP socket to the configured host, then run the SSH handshake
    /// and authenticate over it.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let limit = config.timeouts.connect;
        let stream = timeout(limit, TcpStream::connect((config.host.as_str(), config.port)))
            .await
            .map_err(|_| TransportError::Timeout(limit))?
            .map_err(|source| TransportError::ConnectionFailed {
                host: config.host.clone(),
                port: config.port,
                source,
            })?;

        debug!("tcp connected to {}", config.socket_addr());
        Self::connect_stream(config, stream).await
    }

    /// Run the SSH handshake and authenticate over an already-open stream.
    ///
    /// The banner/key exchange and authentication are bounded separately by
    /// `timeouts.connect` and `timeouts.auth`.
    pub async fn connect_stream<S>(config: SshConfig, stream: S) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        let limit = config.timeouts.connect;
        let mut session = timeout(limit, client::connect_stream(ssh_config, stream, handler))
            .await
            .map_err(|_| TransportError::Timeout(limit))?
            .map_err(|e| {
                // Prefer the detailed host key error over russh's UnknownKey
                match host_key_error.lock().ok().and_then(|mut slot| slot.take()) {
                    Some(hk_err) => hk_err,
                    None => TransportError::Ssh(e),
                }
            })?;

        let limit = config.timeouts.auth;
        timeout(limit, Self::authenticate(&mut session, &config))
            .await
            .map_err(|_| TransportError::Timeout(limit))??;

        debug!("authenticated to {} as {}", config.socket_addr(), config.username);
        Ok(Self { session, config })
    }

    /// Open a new PTY shell channel on this connection.
    pub async fn open_shell(&self) -> Result<Channel<Msg>> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "xterm",
                self.config.terminal_width,
                self.config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel)
    }

    /// Ask the remote end to open a TCP connection to `host:port` and
    /// forward it over this transport.
    pub async fn open_direct_tcpip(&self, host: &str, port: u16) -> Result<Channel<Msg>> {
        let limit = self.config.timeouts.connect;
        let channel = timeout(
            limit,
            self.session.channel_open_direct_tcpip(
                host,
                u32::from(port),
                ORIGINATOR.0,
                ORIGINATOR.1,
            ),
        )
        .await
        .map_err(|_| TransportError::Timeout(limit))?
        .map_err(TransportError::Ssh)?;

        debug!(
            "forwarded channel {} -> {}:{} opened",
            self.config.host, host, port
        );
        Ok(channel)
    }

    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = session
            .authenticate_password(&config.username, config.password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success();

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Whether the session's background task is still running.
    pub fn is_alive(&self) -> bool {
        !self.session.is_closed()
    }

    /// The configuration this transport was opened with.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = match self.known_hosts_path {
            Some(ref path) => {
                russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
            }
            None => russh::keys::check_known_hosts(&self.host, self.port, pubkey),
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        use russh::keys::known_hosts::{learn_known_hosts, learn_known_hosts_path};

        let result = match self.known_hosts_path {
            Some(ref path) => learn_known_hosts_path(&self.host, self.port, pubkey, path),
            None => learn_known_hosts(&self.host, self.port, pubkey),
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let accepted = match self.host_key_verification {
            HostKeyVerification::Disabled => true,

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key for {}: {}", self.host, e);
                    }
                    true
                }
                Err(e) => self.reject(e),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                }),
                Err(e) => self.reject(e),
            },
        };

        Ok(accepted)
    }
}
