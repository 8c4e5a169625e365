//! Pre-invoke checks, invoke hooks and cog-level hooks.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    concurrency::{ConcurrencySlot, MaxConcurrency},
    cooldown::CooldownMapping,
    error::CommandError,
};
use crate::interaction::Interaction;

/// A predicate an interaction must pass before the command runs.
#[async_trait]
pub trait Check: Send + Sync {
    /// Return `Ok(false)` to reject with a generic [`CommandError::CheckFailure`],
    /// or an error to reject with a specific one.
    async fn check(&self, inter: &Interaction) -> Result<bool, CommandError>;
}

/// Hook run before or after a command invocation.
#[async_trait]
pub trait InvokeHook: Send + Sync {
    async fn call(&self, inter: &Interaction) -> anyhow::Result<()>;
}

/// Local error handler attached to a node or a cog.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn on_error(&self, inter: &Interaction, error: &CommandError) -> anyhow::Result<()>;
}

/// Hooks shared by every command a cog owns.
///
/// Each capability is optional and set explicitly when the cog is built.
#[derive(Clone, Default)]
pub struct Cog {
    name: String,
    slash_command_check: Option<Arc<dyn Check>>,
    slash_command_error: Option<Arc<dyn ErrorHandler>>,
    before_slash_command_invoke: Option<Arc<dyn InvokeHook>>,
    after_slash_command_invoke: Option<Arc<dyn InvokeHook>>,
}

impl Cog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_check(mut self, check: Arc<dyn Check>) -> Self {
        self.slash_command_check = Some(check);
        self
    }

    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.slash_command_error = Some(handler);
        self
    }

    pub fn with_before_invoke(mut self, hook: Arc<dyn InvokeHook>) -> Self {
        self.before_slash_command_invoke = Some(hook);
        self
    }

    pub fn with_after_invoke(mut self, hook: Arc<dyn InvokeHook>) -> Self {
        self.after_slash_command_invoke = Some(hook);
        self
    }

    pub(crate) fn error_handler(&self) -> Option<&Arc<dyn ErrorHandler>> {
        self.slash_command_error.as_ref()
    }
}

/// Everything a top-level command runs around its handlers: checks, cooldown,
/// concurrency limit and invoke hooks.
#[derive(Default)]
pub struct InvokeGuards {
    pub(crate) checks: Vec<Arc<dyn Check>>,
    pub(crate) cooldown: Option<CooldownMapping>,
    pub(crate) max_concurrency: Option<MaxConcurrency>,
    pub(crate) before_invoke: Option<Arc<dyn InvokeHook>>,
    pub(crate) after_invoke: Option<Arc<dyn InvokeHook>>,
}

impl InvokeGuards {
    pub fn max_concurrency(&self) -> Option<&MaxConcurrency> {
        self.max_concurrency.as_ref()
    }

    pub fn cooldown(&self) -> Option<&CooldownMapping> {
        self.cooldown.as_ref()
    }

    /// Run checks, cooldown, concurrency acquisition and before-invoke hooks.
    ///
    /// An acquired concurrency slot is stored in `slot` as soon as it is held,
    /// so the caller can release it whether or not the remaining steps succeed.
    pub async fn prepare(
        &self,
        command: &str,
        cog: Option<&Cog>,
        inter: &Interaction,
        slot: &mut Option<ConcurrencySlot>,
    ) -> Result<(), CommandError> {
        let cog_check = cog.and_then(|cog| cog.slash_command_check.as_ref());
        for check in cog_check.into_iter().chain(self.checks.iter()) {
            if !check.check(inter).await? {
                return Err(CommandError::CheckFailure(format!(
                    "The check functions for command {command} failed."
                )));
            }
        }

        if let Some(cooldown) = &self.cooldown {
            cooldown.update_rate_limit(inter)?;
        }

        if let Some(limiter) = &self.max_concurrency {
            *slot = Some(limiter.acquire(inter).await?);
        }

        let cog_hook = cog.and_then(|cog| cog.before_slash_command_invoke.as_ref());
        for hook in cog_hook.into_iter().chain(self.before_invoke.iter()) {
            hook.call(inter)
                .await
                .map_err(|source| CommandError::Invoke {
                    command: command.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Run the cog's and the command's after-invoke hooks.
    ///
    /// Failures are logged and never raised.
    pub async fn call_after_hooks(&self, command: &str, cog: Option<&Cog>, inter: &Interaction) {
        let cog_hook = cog.and_then(|cog| cog.after_slash_command_invoke.as_ref());
        for hook in cog_hook.into_iter().chain(self.after_invoke.iter()) {
            if let Err(err) = hook.call(inter).await {
                tracing::warn!(command, "after-invoke hook failed: {err:#}");
            }
        }
    }
}
