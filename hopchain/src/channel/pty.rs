//! PTY channel abstraction for interactive sessions.

use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// An interactive shell channel with prompt-driven reads.
pub struct PtyChannel {
    channel: Channel<Msg>,

    /// Output received since the last matched pattern.
    buffer: PatternBuffer,

    /// Deadline for each `read_until_pattern` call.
    timeout: Duration,
}

impl PtyChannel {
    /// Wrap a channel that already has a PTY and shell.
    pub fn new(channel: Channel<Msg>, timeout: Duration) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::default(),
            timeout,
        }
    }

    /// Send one line of input.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        trace!("send: {:?}", line);
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.channel
            .data(data.as_slice())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` shows up in the tail of the output.
    ///
    /// Returns everything up to and including the match. Bytes that arrived
    /// after the match stay buffered for the next read.
    pub async fn read_until_pattern(&mut self, pattern: &Regex) -> Result<Vec<u8>> {
        // An unrepresentable deadline means no deadline.
        let deadline = Instant::now().checked_add(self.timeout);

        loop {
            if let Some(found) = self.buffer.search_tail(pattern) {
                let mut data = self.buffer.take();
                let rest = data.split_off(found.end);
                self.buffer.extend(&rest);
                return Ok(data);
            }

            let msg = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, self.channel.wait())
                    .await
                    .map_err(|_| ChannelError::PatternTimeout(self.timeout))?,
                None => self.channel.wait().await,
            };

            match msg {
                Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    debug!("channel closed with {} bytes unread", self.buffer.len());
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Signal EOF and close the channel.
    pub async fn close(self) -> Result<()> {
        // EOF may fail if the peer already hung up; close is what matters
        let _ = self.channel.eof().await;
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}
