//! SSH-backed administrative session for Cisco IOS style CLIs.

use std::time::Instant;

use log::{debug, info, warn};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncWrite};

use super::AdminSession;
use super::privilege::PrivilegeManager;
use super::response::Response;
use crate::channel::PtyChannel;
use crate::error::{ChannelError, Result, SessionError};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// An authenticated interactive shell on one device.
///
/// The transport underneath may be a direct TCP connection or a channel
/// forwarded through a jump host; nothing here depends on which.
pub struct DeviceSession {
    host: String,

    platform: PlatformDefinition,

    /// Answered at the `enable` password prompt.
    password: SecretString,

    /// SSH transport and shell (None once disconnected).
    transport: Option<SshTransport>,
    channel: Option<PtyChannel>,

    privilege_manager: PrivilegeManager,

    /// Matches the prompt of any privilege level.
    prompt_pattern: Regex,
}

impl DeviceSession {
    /// Connect over TCP straight to `config.host`.
    pub async fn connect(config: SshConfig, platform: PlatformDefinition) -> Result<Self> {
        let transport = SshTransport::connect(config).await?;
        Self::start(transport, platform).await
    }

    /// Connect over an already-open byte stream, e.g. a forwarded channel.
    pub async fn connect_over<S>(
        config: SshConfig,
        platform: PlatformDefinition,
        stream: S,
    ) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let transport = SshTransport::connect_stream(config, stream).await?;
        Self::start(transport, platform).await
    }

    async fn start(transport: SshTransport, platform: PlatformDefinition) -> Result<Self> {
        let config = transport.config().clone();
        let prompt_pattern = build_combined_pattern(&platform)?;

        let shell = match transport.open_shell().await {
            Ok(shell) => shell,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    debug!("closing {} after shell failure: {}", config.host, close_err);
                }
                return Err(e);
            }
        };

        let mut session = Self {
            host: config.host.clone(),
            privilege_manager: PrivilegeManager::new(platform.privilege_levels.clone()),
            platform,
            password: config.password.clone(),
            transport: Some(transport),
            channel: Some(PtyChannel::new(shell, config.timeouts.connect)),
            prompt_pattern,
        };

        if let Err(e) = session.on_open().await {
            session.disconnect().await;
            return Err(e);
        }

        info!(
            "session to {} ready at privilege {:?}",
            session.host,
            session.current_privilege()
        );
        Ok(session)
    }

    /// Wait for the login prompt, reach the default privilege level and run
    /// the platform's on-open commands.
    async fn on_open(&mut self) -> Result<()> {
        let pattern = self.prompt_pattern.clone();
        let banner = self.channel_mut()?.read_until_pattern(&pattern).await?;
        let (_, prompt) = super::response::normalize_output(&String::from_utf8_lossy(&banner), "");
        self.privilege_manager.observe_prompt(&prompt);

        let default = self.platform.default_privilege.clone();
        if !default.is_empty() {
            self.acquire_privilege(&default).await?;
        }

        for command in self.platform.on_open_commands.clone() {
            self.execute(&command).await?;
        }
        Ok(())
    }

    fn channel_mut(&mut self) -> Result<&mut PtyChannel> {
        self.channel
            .as_mut()
            .ok_or_else(|| SessionError::NotConnected.into())
    }

    /// Send one command and wait for the next prompt.
    pub async fn execute(&mut self, command: &str) -> Result<Response> {
        let pattern = self.prompt_pattern.clone();
        let start = Instant::now();

        let channel = self.channel_mut()?;
        channel.send(command).await?;
        let data = channel.read_until_pattern(&pattern).await?;

        let response =
            Response::from_raw(command, String::from_utf8_lossy(&data), start.elapsed());
        self.privilege_manager.observe_prompt(&response.prompt);

        match self.platform.detect_failure(&response.result) {
            Some(failure) => {
                warn!("{}: '{}' failed: {}", self.host, command, failure);
                Ok(response.with_failure(failure))
            }
            None => Ok(response),
        }
    }

    /// Move to `target`, one adjacent level at a time.
    pub async fn acquire_privilege(&mut self, target: &str) -> Result<()> {
        let current = self
            .privilege_manager
            .current()
            .map(|level| level.name.clone())
            .unwrap_or_default();

        if current == target {
            return Ok(());
        }

        let path = self.privilege_manager.find_path(&current, target)?;
        for step in path.windows(2) {
            let (from, to) = (&step[0], &step[1]);
            let transition = self.privilege_manager.transition(from, to).ok_or_else(|| {
                SessionError::NoPrivilegePath {
                    from: from.clone(),
                    to: to.clone(),
                }
            })?;
            let command = transition.command.to_string();
            let auth_prompt = transition.auth_prompt.cloned();
            debug!("{}: {} -> {} via '{}'", self.host, from, to, command);

            let prompt_pattern = self.prompt_pattern.clone();
            let mut output = {
                let wait_for = match auth_prompt {
                    Some(ref auth) => Regex::new(&format!(
                        "(?:{})|(?:{})",
                        prompt_pattern.as_str(),
                        auth.as_str()
                    ))
                    .map_err(ChannelError::InvalidPattern)?,
                    None => prompt_pattern.clone(),
                };
                let channel = self.channel_mut()?;
                channel.send(&command).await?;
                channel.read_until_pattern(&wait_for).await?
            };

            if auth_prompt.as_ref().is_some_and(|auth| auth.is_match(&output)) {
                let password = self.password.expose_secret().to_string();
                let channel = self.channel_mut()?;
                channel.send(&password).await?;
                output = channel.read_until_pattern(&prompt_pattern).await?;
            }

            let (_, prompt) =
                super::response::normalize_output(&String::from_utf8_lossy(&output), &command);
            let reached = self.privilege_manager.observe_prompt(&prompt);
            if reached != Some(to.as_str()) {
                return Err(SessionError::PrivilegeAcquisitionFailed { target: to.clone() }.into());
            }
        }

        Ok(())
    }

    /// Name of the current privilege level.
    pub fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current().map(|level| level.name.as_str())
    }

    /// Management address this session was opened against.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether the shell is open and the SSH session is still running.
    pub fn is_alive(&self) -> bool {
        self.channel.is_some() && self.transport.as_ref().is_some_and(SshTransport::is_alive)
    }

    /// Close shell and transport, reporting the first failure.
    pub async fn close(&mut self) -> Result<()> {
        let channel_result = match self.channel.take() {
            Some(channel) => channel.close().await,
            None => Ok(()),
        };
        let transport_result = match self.transport.take() {
            Some(transport) => transport.close().await,
            None => Ok(()),
        };
        channel_result.and(transport_result)
    }
}

impl AdminSession for DeviceSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        Ok(self.execute(command).await?.result)
    }

    async fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
        let mut combined = String::new();
        for command in commands {
            let response = self.execute(command).await?;
            combined.push_str(&response.raw_result.replace('\r', ""));
            if !combined.ends_with('\n') {
                combined.push('\n');
            }
        }
        Ok(combined)
    }

    async fn disconnect(&mut self) {
        if self.transport.is_none() && self.channel.is_none() {
            return;
        }
        match self.close().await {
            Ok(()) => debug!("disconnected from {}", self.host),
            Err(e) => warn!("disconnect from {} failed: {}", self.host, e),
        }
    }
}

/// Build a regex that matches the prompt of any privilege level.
fn build_combined_pattern(platform: &PlatformDefinition) -> Result<Regex> {
    let combined = platform
        .privilege_levels
        .values()
        .map(|level| format!("(?:{})", level.pattern.as_str()))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&combined).map_err(ChannelError::InvalidPattern)?)
}
