//! Client events dispatched around slash command invocation.

use crate::{commands::CommandError, interaction::Interaction};

/// An event published to the client's global event sink.
#[derive(Debug)]
pub enum ClientEvent<'a> {
    /// A slash command is about to be invoked.
    SlashCommand { interaction: &'a Interaction },
    /// A slash command finished without failing.
    SlashCommandCompletion { interaction: &'a Interaction },
    /// A command, group or sub-command failed.
    SlashCommandError {
        interaction: &'a Interaction,
        error: &'a CommandError,
    },
}

impl ClientEvent<'_> {
    /// The event name listeners subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SlashCommand { .. } => "slash_command",
            Self::SlashCommandCompletion { .. } => "slash_command_completion",
            Self::SlashCommandError { .. } => "slash_command_error",
        }
    }

    pub fn interaction(&self) -> &Interaction {
        match self {
            Self::SlashCommand { interaction }
            | Self::SlashCommandCompletion { interaction }
            | Self::SlashCommandError { interaction, .. } => interaction,
        }
    }
}

/// Global event-dispatch sink.
///
/// Dispatch is fire-and-forget: sinks that need to do async work should hand
/// the event off (for example over a channel) rather than block.
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event: &ClientEvent<'_>);
}

/// Default sink that writes every event to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn dispatch(&self, event: &ClientEvent<'_>) {
        let interaction = event.interaction();
        match event {
            ClientEvent::SlashCommandError { error, .. } => tracing::warn!(
                event = event.name(),
                interaction = interaction.id(),
                command = interaction.command_name(),
                "{error}"
            ),
            _ => tracing::debug!(
                event = event.name(),
                interaction = interaction.id(),
                command = interaction.command_name(),
                "client event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let inter = Interaction::new("ping", serde_json::Map::new());
        let err = CommandError::failure("x");

        assert_eq!(
            ClientEvent::SlashCommand { interaction: &inter }.name(),
            "slash_command"
        );
        assert_eq!(
            ClientEvent::SlashCommandCompletion { interaction: &inter }.name(),
            "slash_command_completion"
        );
        let event = ClientEvent::SlashCommandError {
            interaction: &inter,
            error: &err,
        };
        assert_eq!(event.name(), "slash_command_error");
        assert_eq!(event.interaction().command_name(), "ping");
    }
}
