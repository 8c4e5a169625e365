//! The shape every command node shares: identity, handler, connectors and
//! the local error handler.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use super::{
    checks::{Cog, ErrorHandler},
    error::{CommandError, HandlerError, HandlerResult, InvokeOutcome},
};
use crate::{
    events::ClientEvent,
    interaction::{Arguments, Interaction},
};

/// Handler body of a command, group or sub-command.
///
/// Groups and commands with children are called with empty arguments; leaves and
/// flat commands receive their options, renamed through the node's connectors.
#[async_trait]
pub trait CommandCallback: Send + Sync {
    async fn call(&self, inter: &Interaction, args: Arguments) -> HandlerResult;
}

/// Maps option names to handler parameter names.
///
/// Options whose name already matches the parameter do not need an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectors(HashMap<String, String>);

impl Connectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, option: impl Into<String>, param: impl Into<String>) {
        self.0.insert(option.into(), param.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameter name an option is passed under.
    pub fn param_for<'a>(&'a self, option: &'a str) -> &'a str {
        self.0.get(option).map_or(option, String::as_str)
    }

    /// Rename every connected key of `args`, keeping order and passing
    /// unconnected keys through unchanged.
    pub fn apply(&self, args: Arguments) -> Arguments {
        if self.0.is_empty() {
            return args;
        }
        args.into_iter()
            .map(|(name, value)| (self.param_for(&name).to_string(), value))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Connectors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(option, param)| (option.into(), param.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Connectors {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for Connectors {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// Identity and handler of a node in a command tree.
#[derive(Clone)]
pub struct CommandCore {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) callback: Arc<dyn CommandCallback>,
    pub(crate) connectors: Connectors,
    pub(crate) on_error: Option<Arc<dyn ErrorHandler>>,
    pub(crate) cog: Option<Arc<Cog>>,
}

impl CommandCore {
    pub(crate) fn new(name: String, callback: Arc<dyn CommandCallback>) -> Self {
        Self {
            qualified_name: name.clone(),
            name,
            callback,
            connectors: Connectors::default(),
            on_error: None,
            cog: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Space-joined path from the root command to this node.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn connectors(&self) -> &Connectors {
        &self.connectors
    }

    pub fn cog(&self) -> Option<&Cog> {
        self.cog.as_deref()
    }

    /// Call the handler with `args`, racing it against the interaction's
    /// cancellation token.
    ///
    /// Command errors are re-raised unchanged and any other failure is wrapped
    /// into [`CommandError::Invoke`]; both mark the interaction as failed and
    /// go through the local error handler first. Cancellation marks the
    /// interaction as failed and ends with [`InvokeOutcome::Cancelled`].
    pub(crate) async fn run(
        &self,
        inter: &Interaction,
        args: Arguments,
    ) -> Result<InvokeOutcome, CommandError> {
        tracing::debug!(command = %self.qualified_name, ?args, "calling handler");

        let result = tokio::select! {
            biased;
            _ = inter.cancellation().cancelled() => Err(HandlerError::Cancelled),
            result = self.callback.call(inter, args) => result,
        };

        let error = match result {
            Ok(()) => return Ok(InvokeOutcome::Completed),
            Err(HandlerError::Cancelled) => {
                tracing::debug!(command = %self.qualified_name, "invocation cancelled");
                inter.mark_failed();
                return Ok(InvokeOutcome::Cancelled);
            }
            Err(HandlerError::Command(error)) => error,
            Err(HandlerError::Other(source)) => CommandError::Invoke {
                command: self.qualified_name.clone(),
                source,
            },
        };

        inter.mark_failed();
        self.dispatch_error(inter, &error).await;
        Err(error)
    }

    /// Local error handling: the node's own handler, then the cog's, then the
    /// global `slash_command_error` event.
    ///
    /// A failing handler is logged and never stops the steps after it.
    pub(crate) async fn dispatch_error(&self, inter: &Interaction, error: &CommandError) {
        if let Some(handler) = &self.on_error
            && let Err(err) = handler.on_error(inter, error).await
        {
            tracing::warn!(command = %self.qualified_name, "error handler failed: {err:#}");
        }

        if let Some(handler) = self.cog.as_deref().and_then(Cog::error_handler)
            && let Err(err) = handler.on_error(inter, error).await
        {
            tracing::warn!(command = %self.qualified_name, "cog error handler failed: {err:#}");
        }

        inter.dispatch(ClientEvent::SlashCommandError {
            interaction: inter,
            error,
        });
    }
}
