//! Change streams as delivered by a Simperium bucket channel.
//!
//! Changes arrive as a JSON array of [`DocumentChange`]s, framed by the channel
//! protocol as `<channel>:c:<json-array>`.

use super::DocumentChange;
use crate::error::ApplyError;

/// Command carrying a change stream.
pub const CHANGES_COMMAND: &str = "c";

/// Parse a JSON array of changes.
pub fn parse_changes(json: &str) -> Result<Vec<DocumentChange>, ApplyError> {
    Ok(serde_json::from_str(json)?)
}

/// One `<channel>:<command>:<payload>` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMessage<'a> {
    pub channel: u32,
    pub command: &'a str,
    pub payload: &'a str,
}

impl<'a> ChannelMessage<'a> {
    /// Split a raw message. The payload may itself contain `:`.
    pub fn parse(message: &'a str) -> Result<Self, ApplyError> {
        let (channel, rest) = message
            .split_once(':')
            .ok_or_else(|| ApplyError::InvalidMessage(format!("missing channel in {message:?}")))?;
        let channel = channel
            .parse::<u32>()
            .map_err(|_| ApplyError::InvalidMessage(format!("invalid channel {channel:?}")))?;
        let (command, payload) = rest.split_once(':').unwrap_or((rest, ""));
        if command.is_empty() {
            return Err(ApplyError::InvalidMessage(format!("missing command in {message:?}")));
        }
        Ok(Self {
            channel,
            command,
            payload,
        })
    }

    pub fn is_changes(&self) -> bool {
        self.command == CHANGES_COMMAND
    }
}

/// Parse a `<channel>:c:[...]` message into its channel and changes.
pub fn parse_channel_changes(message: &str) -> Result<(u32, Vec<DocumentChange>), ApplyError> {
    let msg = ChannelMessage::parse(message)?;
    if !msg.is_changes() {
        return Err(ApplyError::InvalidMessage(format!(
            "expected a '{CHANGES_COMMAND}' message, got '{}'",
            msg.command
        )));
    }
    Ok((msg.channel, parse_changes(msg.payload)?))
}
