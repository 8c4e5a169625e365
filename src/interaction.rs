//! Interaction context handed to every node of a slash command.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::events::{ClientEvent, EventSink, TracingEventSink};

/// Option tree supplied by the transport: each value is either a scalar
/// argument or a nested object for a selected group/sub-command.
pub type Options = Map<String, Value>;

/// Arguments bound for a handler call, keyed by handler parameter name.
pub type Arguments = Map<String, Value>;

/// Deserializable form of an interaction, as produced by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionPayload {
    #[serde(default)]
    pub id: u64,
    /// Name of the invoked top-level command.
    pub name: String,
    #[serde(default)]
    pub guild_id: Option<u64>,
    #[serde(default)]
    pub channel_id: u64,
    #[serde(default)]
    pub author_id: u64,
    #[serde(default)]
    pub options: Options,
}

/// A single slash command interaction.
pub struct Interaction {
    id: u64,
    name: String,
    guild_id: Option<u64>,
    channel_id: u64,
    author_id: u64,
    options: Options,
    command_failed: AtomicBool,
    cancellation: CancellationToken,
    events: Arc<dyn EventSink>,
}

impl Interaction {
    /// Create an interaction for `name` with the given option tree.
    pub fn new(name: impl Into<String>, options: Options) -> Self {
        Self {
            id: 0,
            name: name.into(),
            guild_id: None,
            channel_id: 0,
            author_id: 0,
            options,
            command_failed: AtomicBool::new(false),
            cancellation: CancellationToken::new(),
            events: Arc::new(TracingEventSink),
        }
    }

    pub fn from_payload(payload: InteractionPayload) -> Self {
        Self::new(payload.name, payload.options)
            .with_id(payload.id)
            .with_channel(payload.channel_id)
            .with_author(payload.author_id)
            .with_guild(payload.guild_id)
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_guild(mut self, guild_id: Option<u64>) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn with_channel(mut self, channel_id: u64) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn with_author(mut self, author_id: u64) -> Self {
        self.author_id = author_id;
        self
    }

    /// Route client events for this interaction to `events`.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn command_name(&self) -> &str {
        &self.name
    }

    pub fn guild_id(&self) -> Option<u64> {
        self.guild_id
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn author_id(&self) -> u64 {
        self.author_id
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether any node of this invocation failed or was cancelled.
    pub fn command_failed(&self) -> bool {
        self.command_failed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_failed(&self) {
        self.command_failed.store(true, Ordering::Release);
    }

    /// Token whose cancellation stops the invocation at its next suspension point.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Publish an event to the global sink.
    pub fn dispatch(&self, event: ClientEvent<'_>) {
        self.events.dispatch(&event);
    }
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .field("author_id", &self.author_id)
            .field("options", &self.options)
            .field("command_failed", &self.command_failed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_payload() {
        let payload: InteractionPayload = serde_json::from_value(json!({
            "id": 42,
            "name": "ban",
            "guild_id": 7,
            "author_id": 9,
            "options": {"temp": {"add": {"user": 5}}}
        }))
        .unwrap();

        let inter = Interaction::from_payload(payload);
        assert_eq!(inter.id(), 42);
        assert_eq!(inter.command_name(), "ban");
        assert_eq!(inter.guild_id(), Some(7));
        assert_eq!(inter.channel_id(), 0);
        assert_eq!(inter.author_id(), 9);
        assert!(inter.options()["temp"].is_object());
        assert!(!inter.command_failed());
    }

    #[test]
    fn test_mark_failed() {
        let inter = Interaction::new("ping", Options::new());
        inter.mark_failed();
        assert!(inter.command_failed());
    }
}
