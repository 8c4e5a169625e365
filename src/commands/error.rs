//! Error types for command registration and invocation.

use std::time::Duration;

use thiserror::Error;

use super::cooldown::BucketType;

/// Errors surfaced by invoking a slash command.
///
/// This is the uniform error every node in a command tree reports, whether the
/// failure happened in a pre-invoke check, the root body, a group or a leaf.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Expected, user-facing failure raised by a handler.
    #[error("{0}")]
    Failure(String),

    /// A pre-invoke check rejected the interaction.
    #[error("Check failed: {0}")]
    CheckFailure(String),

    /// The command is rate limited for this bucket.
    #[error("Command is on cooldown, retry after {:.2}s", retry_after.as_secs_f64())]
    CommandOnCooldown { retry_after: Duration },

    /// Every concurrency slot for this bucket is taken.
    #[error("Too many people are using this command, it can only be used {number} time(s) per {per} concurrently")]
    MaxConcurrencyReached { number: usize, per: BucketType },

    /// No registered command carries the interaction's name.
    #[error("Slash command not found: {0}")]
    CommandNotFound(String),

    /// Any other fault raised while running a handler, with its original cause.
    #[error("Command '{command}' raised an exception: {source}")]
    Invoke {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CommandError {
    /// Build a user-facing command failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Returns `true` if this error wraps an unexpected handler fault.
    pub fn is_invoke_error(&self) -> bool {
        matches!(self, Self::Invoke { .. })
    }
}

/// What a handler body can return besides success.
#[derive(Debug)]
pub enum HandlerError {
    /// A domain command error, propagated unchanged.
    Command(CommandError),
    /// Cooperative cancellation: the invocation stops without an error.
    Cancelled,
    /// Anything else; wrapped into [`CommandError::Invoke`] by the pipeline.
    Other(anyhow::Error),
}

impl From<CommandError> for HandlerError {
    fn from(err: CommandError) -> Self {
        Self::Command(err)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

/// Result type for handler bodies.
pub type HandlerResult = Result<(), HandlerError>;

/// How an invocation ended when it did not fail.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// Every matched node ran to completion.
    Completed,
    /// The invocation was cancelled; the interaction is marked as failed.
    Cancelled,
}

impl InvokeOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors raised while building or registering commands.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Command, group or sub-command name is not a valid slash command name.
    #[error("Slash command name {0:?} should consist of these symbols: a-z, 0-9, -, _")]
    InvalidName(String),

    /// An option descriptor is malformed or nested where it may not be.
    #[error("Invalid option {name:?}: {reason}")]
    InvalidOption { name: String, reason: String },

    /// A child with this name is already registered under the parent.
    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateChild { parent: String, name: String },

    /// Flat options cannot be declared on a command that has children.
    #[error("'{0}' has sub-commands and cannot declare its own options")]
    OptionsWithChildren(String),

    /// A concurrency limit must admit at least one invocation.
    #[error("'{command}' max concurrency must be at least 1, got {number}")]
    InvalidMaxConcurrency { command: String, number: usize },

    /// A command with this name is already registered.
    #[error("Slash command '{0}' is already registered")]
    AlreadyRegistered(String),

    /// IO error while reading a definition file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A definition file could not be parsed.
    #[error("Failed to parse command definitions: {0}")]
    Parse(#[from] serde_json::Error),
}
