//! Registry of top-level slash commands and interaction dispatch.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use serde_json::Value;

use super::{
    error::{CommandError, InvokeOutcome, RegistrationError},
    slash_core::InvokableSlashCommand,
};
use crate::{config::RouterConfig, events::ClientEvent, interaction::Interaction};

/// Registry mapping command names to their trees.
///
/// Invocation only needs `&self`, so a registry wrapped in an `Arc` can serve
/// many interactions concurrently.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<InvokableSlashCommand>>,
    config: RouterConfig,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            commands: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a command. A name can only be registered once.
    pub fn register(
        &mut self,
        command: InvokableSlashCommand,
    ) -> Result<Arc<InvokableSlashCommand>, RegistrationError> {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(RegistrationError::AlreadyRegistered(name));
        }
        let command = Arc::new(command);
        self.commands.insert(name, Arc::clone(&command));
        Ok(command)
    }

    pub fn get(&self, name: &str) -> Option<Arc<InvokableSlashCommand>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Find the command an interaction targets and invoke it.
    ///
    /// Dispatches `slash_command` before invoking and `slash_command_completion`
    /// when the invocation completed without failure.
    pub async fn process(&self, inter: &Interaction) -> Result<InvokeOutcome, CommandError> {
        let command = self
            .get(inter.command_name())
            .ok_or_else(|| CommandError::CommandNotFound(inter.command_name().to_string()))?;

        inter.dispatch(ClientEvent::SlashCommand { interaction: inter });
        let outcome = command.invoke(inter).await?;
        if !inter.command_failed() {
            inter.dispatch(ClientEvent::SlashCommandCompletion { interaction: inter });
        }
        Ok(outcome)
    }

    fn sorted(&self) -> Vec<&Arc<InvokableSlashCommand>> {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Where a command is registered: its own guilds, the configured test
    /// guilds, or globally (`None`).
    fn target_guilds<'a>(&'a self, command: &'a InvokableSlashCommand) -> Option<&'a [u64]> {
        command
            .guild_ids()
            .or(self.config.test_guilds.as_deref())
    }

    /// Registration payloads of auto-synced global commands.
    pub fn global_payloads(&self) -> Vec<Value> {
        self.sorted()
            .into_iter()
            .filter(|cmd| cmd.auto_sync() && self.target_guilds(cmd).is_none())
            .map(|cmd| cmd.body().to_json())
            .collect()
    }

    /// Registration payloads of auto-synced guild commands, per guild.
    pub fn guild_payloads(&self) -> BTreeMap<u64, Vec<Value>> {
        let mut payloads: BTreeMap<u64, Vec<Value>> = BTreeMap::new();
        for cmd in self.sorted().into_iter().filter(|cmd| cmd.auto_sync()) {
            for guild in self.target_guilds(cmd).unwrap_or_default() {
                payloads.entry(*guild).or_default().push(cmd.body().to_json());
            }
        }
        payloads
    }
}
