//! Slash command trees and their invocation pipeline.
//!
//! A tree is at most two levels deep: a root [`InvokableSlashCommand`] holds
//! either its own flat options or children, each child being a
//! [`SubCommand`] or a [`SubCommandGroup`] of sub-commands. The root's schema
//! always mirrors its children in registration order.

use std::{sync::Arc, time::Duration};

use super::{
    checks::{Check, Cog, ErrorHandler, InvokeGuards, InvokeHook},
    concurrency::{ConcurrencySlot, MaxConcurrency},
    cooldown::{BucketType, Cooldown, CooldownMapping},
    core::{CommandCallback, CommandCore, Connectors},
    error::{CommandError, InvokeOutcome, RegistrationError},
    route::options_as_route,
};
use crate::{
    app_commands::{
        CommandOption, DEFAULT_DESCRIPTION, OptionType, SlashCommandSchema, validate_command_name,
    },
    interaction::{Arguments, Interaction},
};

/// Start building a top-level slash command.
pub fn slash_command(name: impl Into<String>, callback: Arc<dyn CommandCallback>) -> SlashCommandBuilder {
    SlashCommandBuilder::new(name, callback)
}

/// Start building a sub-command.
pub fn sub_command(name: impl Into<String>, callback: Arc<dyn CommandCallback>) -> SubCommandBuilder {
    SubCommandBuilder::new(name, callback)
}

/// Start building a sub-command group.
pub fn sub_command_group(
    name: impl Into<String>,
    callback: Arc<dyn CommandCallback>,
) -> SubCommandGroupBuilder {
    SubCommandGroupBuilder::new(name, callback)
}

fn validate_value_options(options: &[CommandOption]) -> Result<(), RegistrationError> {
    for option in options {
        if option.kind.is_sub_command_like() {
            return Err(RegistrationError::InvalidOption {
                name: option.name.clone(),
                reason: "sub-commands and groups are registered as children, not options"
                    .to_string(),
            });
        }
        option.validate()?;
    }
    Ok(())
}

/// A terminal sub-command receiving the actual arguments.
#[derive(Clone)]
pub struct SubCommand {
    core: CommandCore,
    description: String,
    options: Vec<CommandOption>,
}

impl SubCommand {
    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn qualified_name(&self) -> &str {
        self.core.qualified_name()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn connectors(&self) -> &Connectors {
        self.core.connectors()
    }

    pub fn cog(&self) -> Option<&Cog> {
        self.core.cog()
    }

    /// Schema descriptor of this sub-command.
    pub fn option(&self) -> CommandOption {
        CommandOption {
            options: self.options.clone(),
            ..CommandOption::new(self.name(), &self.description, OptionType::SubCommand)
        }
    }

    fn attach(&mut self, parent: &str, cog: Option<&Arc<Cog>>) {
        self.core.qualified_name = format!("{parent} {}", self.core.name);
        if self.core.cog.is_none() {
            self.core.cog = cog.cloned();
        }
    }
}

/// A named group of sub-commands.
#[derive(Clone)]
pub struct SubCommandGroup {
    core: CommandCore,
    description: String,
    children: Vec<SubCommand>,
}

impl SubCommandGroup {
    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn qualified_name(&self) -> &str {
        self.core.qualified_name()
    }

    pub fn children(&self) -> &[SubCommand] {
        &self.children
    }

    pub fn get(&self, name: &str) -> Option<&SubCommand> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Register a sub-command in this group.
    ///
    /// Its qualified name is built from the group's qualified name, or from the
    /// group's own name while the group is not attached to a command yet.
    pub fn add_sub_command(&mut self, mut sub: SubCommand) -> Result<&mut SubCommand, RegistrationError> {
        if self.get(sub.name()).is_some() {
            return Err(RegistrationError::DuplicateChild {
                parent: self.core.qualified_name.clone(),
                name: sub.core.name,
            });
        }
        sub.attach(&self.core.qualified_name, self.core.cog.as_ref());
        tracing::debug!(command = %sub.qualified_name(), "registered sub-command");
        self.children.push(sub);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Schema descriptor of this group, listing its sub-commands in registration order.
    pub fn option(&self) -> CommandOption {
        CommandOption {
            options: self.children.iter().map(SubCommand::option).collect(),
            ..CommandOption::new(self.name(), &self.description, OptionType::SubCommandGroup)
        }
    }

    fn attach(&mut self, parent: &str, cog: Option<&Arc<Cog>>) {
        self.core.qualified_name = format!("{parent} {}", self.core.name);
        if self.core.cog.is_none() {
            self.core.cog = cog.cloned();
        }
        let qualified = self.core.qualified_name.clone();
        let cog = self.core.cog.clone();
        for child in &mut self.children {
            child.attach(&qualified, cog.as_ref());
        }
    }
}

/// A direct child of a top-level command.
#[derive(Clone)]
pub enum Child {
    Group(SubCommandGroup),
    SubCommand(SubCommand),
}

impl Child {
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => group.name(),
            Self::SubCommand(sub) => sub.name(),
        }
    }

    pub fn option(&self) -> CommandOption {
        match self {
            Self::Group(group) => group.option(),
            Self::SubCommand(sub) => sub.option(),
        }
    }
}

/// A top-level slash command.
pub struct InvokableSlashCommand {
    core: CommandCore,
    guards: InvokeGuards,
    description: String,
    options: Vec<CommandOption>,
    default_permission: bool,
    guild_ids: Option<Vec<u64>>,
    auto_sync: bool,
    children: Vec<Child>,
}

impl InvokableSlashCommand {
    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn qualified_name(&self) -> &str {
        self.core.qualified_name()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Guilds this command is restricted to; `None` means global.
    pub fn guild_ids(&self) -> Option<&[u64]> {
        self.guild_ids.as_deref()
    }

    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    pub fn connectors(&self) -> &Connectors {
        self.core.connectors()
    }

    pub fn guards(&self) -> &InvokeGuards {
        &self.guards
    }

    pub fn cog(&self) -> Option<&Cog> {
        self.core.cog()
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Flat options declared on the command itself.
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Direct sub-command child named `name`.
    pub fn sub_command(&self, name: &str) -> Option<&SubCommand> {
        self.children.iter().find_map(|child| match child {
            Child::SubCommand(sub) if sub.name() == name => Some(sub),
            _ => None,
        })
    }

    /// Group child named `name`.
    pub fn group(&self, name: &str) -> Option<&SubCommandGroup> {
        self.children.iter().find_map(|child| match child {
            Child::Group(group) if group.name() == name => Some(group),
            _ => None,
        })
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut SubCommandGroup> {
        self.children.iter_mut().find_map(|child| match child {
            Child::Group(group) if group.name() == name => Some(group),
            _ => None,
        })
    }

    /// Declare a flat option. Only allowed while the command has no children.
    pub fn add_option(&mut self, option: CommandOption) -> Result<(), RegistrationError> {
        if self.has_children() {
            return Err(RegistrationError::OptionsWithChildren(self.name().to_string()));
        }
        validate_value_options(std::slice::from_ref(&option))?;
        self.options.push(option);
        Ok(())
    }

    /// Register a sub-command directly under this command.
    ///
    /// Registering the first child discards any flat options.
    pub fn add_sub_command(&mut self, mut sub: SubCommand) -> Result<(), RegistrationError> {
        self.prepare_child_slot(sub.name())?;
        sub.attach(&self.core.qualified_name, self.core.cog.as_ref());
        tracing::debug!(command = %sub.qualified_name(), "registered sub-command");
        self.children.push(Child::SubCommand(sub));
        Ok(())
    }

    /// Register a sub-command group under this command.
    ///
    /// Sub-commands already in the group are re-qualified under this command.
    pub fn add_sub_command_group(&mut self, mut group: SubCommandGroup) -> Result<(), RegistrationError> {
        self.prepare_child_slot(group.name())?;
        group.attach(&self.core.qualified_name, self.core.cog.as_ref());
        tracing::debug!(command = %group.qualified_name(), "registered sub-command group");
        self.children.push(Child::Group(group));
        Ok(())
    }

    fn prepare_child_slot(&mut self, name: &str) -> Result<(), RegistrationError> {
        if self.children.iter().any(|child| child.name() == name) {
            return Err(RegistrationError::DuplicateChild {
                parent: self.core.qualified_name.clone(),
                name: name.to_string(),
            });
        }
        if self.children.is_empty() && !self.options.is_empty() {
            tracing::debug!(
                command = %self.core.qualified_name,
                discarded = self.options.len(),
                "first child registered, discarding flat options"
            );
            self.options.clear();
        }
        Ok(())
    }

    /// Externally visible schema: the flat options, or one descriptor per child
    /// in registration order.
    pub fn body(&self) -> SlashCommandSchema {
        let options = if self.children.is_empty() {
            self.options.clone()
        } else {
            self.children.iter().map(Child::option).collect()
        };
        SlashCommandSchema {
            name: self.name().to_string(),
            description: self.description.clone(),
            options,
            default_permission: self.default_permission,
        }
    }

    /// Find the group and sub-command a route path selects.
    ///
    /// An empty path targets the command itself. Absent names resolve to `None`.
    pub fn resolve(&self, path: &[String]) -> (Option<&SubCommandGroup>, Option<&SubCommand>) {
        match path {
            [] => (None, None),
            [sub] => (None, self.sub_command(sub)),
            [group, sub] => {
                let group = self.group(group);
                (group, group.and_then(|group| group.get(sub)))
            }
            _ => {
                tracing::warn!(
                    command = %self.core.qualified_name,
                    depth = path.len(),
                    "route is nested deeper than a group"
                );
                (None, None)
            }
        }
    }

    /// Invoke this command for an interaction.
    ///
    /// Runs prepare, the command body, then the selected group and sub-command
    /// in that order. Whatever happens, the concurrency slot is released and the
    /// after-invoke hooks run exactly once before this returns. Cancellation is
    /// reported as [`InvokeOutcome::Cancelled`], not as an error.
    ///
    /// Cancel through [`Interaction::cancellation`] rather than by dropping this
    /// future: a dropped invocation still gives back its concurrency slot, but its
    /// after-invoke hooks never run.
    pub async fn invoke(&self, inter: &Interaction) -> Result<InvokeOutcome, CommandError> {
        let mut slot = None;
        let result = self.prepare_and_dispatch(inter, &mut slot).await;

        if let Some(slot) = slot.take() {
            slot.release();
        }
        self.guards
            .call_after_hooks(&self.core.qualified_name, self.core.cog(), inter)
            .await;

        tracing::debug!(
            command = %self.core.qualified_name,
            failed = inter.command_failed(),
            "invocation finalized"
        );
        result
    }

    async fn prepare_and_dispatch(
        &self,
        inter: &Interaction,
        slot: &mut Option<ConcurrencySlot>,
    ) -> Result<InvokeOutcome, CommandError> {
        let prepared = tokio::select! {
            biased;
            _ = inter.cancellation().cancelled() => None,
            result = self.guards.prepare(&self.core.qualified_name, self.core.cog(), inter, slot) => Some(result),
        };

        match prepared {
            None => {
                inter.mark_failed();
                return Ok(InvokeOutcome::Cancelled);
            }
            Some(Err(error)) => {
                inter.mark_failed();
                self.core.dispatch_error(inter, &error).await;
                return Err(error);
            }
            Some(Ok(())) => {}
        }

        if self.children.is_empty() {
            let args = self.core.connectors.apply(inter.options().clone());
            return self.core.run(inter, args).await;
        }

        if self.core.run(inter, Arguments::new()).await?.is_cancelled() {
            return Ok(InvokeOutcome::Cancelled);
        }
        self.invoke_children(inter).await
    }

    async fn invoke_children(&self, inter: &Interaction) -> Result<InvokeOutcome, CommandError> {
        let (path, args) = options_as_route(inter.options());
        let (group, sub) = self.resolve(&path);
        tracing::debug!(
            command = %self.core.qualified_name,
            ?path,
            group = group.map(SubCommandGroup::name),
            sub_command = sub.map(SubCommand::name),
            "resolved route"
        );

        if sub.is_none() && !path.is_empty() {
            tracing::warn!(
                command = %self.core.qualified_name,
                route = %path.join(" "),
                "no sub-command registered for route"
            );
        }

        if let Some(group) = group
            && group.core.run(inter, Arguments::new()).await?.is_cancelled()
        {
            return Ok(InvokeOutcome::Cancelled);
        }

        match sub {
            Some(sub) => sub.core.run(inter, sub.core.connectors.apply(args)).await,
            None => Ok(InvokeOutcome::Completed),
        }
    }
}

/// Builder for [`InvokableSlashCommand`].
pub struct SlashCommandBuilder {
    core: CommandCore,
    guards: InvokeGuards,
    description: Option<String>,
    options: Vec<CommandOption>,
    default_permission: bool,
    guild_ids: Option<Vec<u64>>,
    auto_sync: bool,
}

impl SlashCommandBuilder {
    pub fn new(name: impl Into<String>, callback: Arc<dyn CommandCallback>) -> Self {
        Self {
            core: CommandCore::new(name.into(), callback),
            guards: InvokeGuards::default(),
            description: None,
            options: Vec::new(),
            default_permission: true,
            guild_ids: None,
            auto_sync: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = CommandOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Whether the command is enabled by default when the app joins a guild.
    pub fn default_permission(mut self, default_permission: bool) -> Self {
        self.default_permission = default_permission;
        self
    }

    /// Register the command in these guilds only instead of globally.
    pub fn guild_ids(mut self, guild_ids: impl IntoIterator<Item = u64>) -> Self {
        self.guild_ids = Some(guild_ids.into_iter().collect());
        self
    }

    pub fn connectors(mut self, connectors: impl Into<Connectors>) -> Self {
        self.core.connectors = connectors.into();
        self
    }

    pub fn auto_sync(mut self, auto_sync: bool) -> Self {
        self.auto_sync = auto_sync;
        self
    }

    pub fn check(mut self, check: Arc<dyn Check>) -> Self {
        self.guards.checks.push(check);
        self
    }

    pub fn cooldown(mut self, rate: u32, per: Duration, bucket: BucketType) -> Self {
        self.guards.cooldown = Some(CooldownMapping::new(Cooldown::new(rate, per), bucket));
        self
    }

    pub fn max_concurrency(mut self, number: usize, per: BucketType, wait: bool) -> Self {
        self.guards.max_concurrency = Some(MaxConcurrency::new(number, per, wait));
        self
    }

    pub fn before_invoke(mut self, hook: Arc<dyn InvokeHook>) -> Self {
        self.guards.before_invoke = Some(hook);
        self
    }

    pub fn after_invoke(mut self, hook: Arc<dyn InvokeHook>) -> Self {
        self.guards.after_invoke = Some(hook);
        self
    }

    pub fn on_error(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.core.on_error = Some(handler);
        self
    }

    pub fn cog(mut self, cog: Arc<Cog>) -> Self {
        self.core.cog = Some(cog);
        self
    }

    pub fn build(self) -> Result<InvokableSlashCommand, RegistrationError> {
        validate_command_name(&self.core.name)?;
        validate_value_options(&self.options)?;
        if let Some(limiter) = &self.guards.max_concurrency
            && limiter.number() == 0
        {
            return Err(RegistrationError::InvalidMaxConcurrency {
                command: self.core.name,
                number: 0,
            });
        }
        Ok(InvokableSlashCommand {
            core: self.core,
            guards: self.guards,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            options: self.options,
            default_permission: self.default_permission,
            guild_ids: self.guild_ids,
            auto_sync: self.auto_sync,
            children: Vec::new(),
        })
    }
}

/// Builder for [`SubCommand`].
pub struct SubCommandBuilder {
    core: CommandCore,
    description: Option<String>,
    options: Vec<CommandOption>,
}

impl SubCommandBuilder {
    pub fn new(name: impl Into<String>, callback: Arc<dyn CommandCallback>) -> Self {
        Self {
            core: CommandCore::new(name.into(), callback),
            description: None,
            options: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = CommandOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn connectors(mut self, connectors: impl Into<Connectors>) -> Self {
        self.core.connectors = connectors.into();
        self
    }

    pub fn on_error(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.core.on_error = Some(handler);
        self
    }

    pub fn cog(mut self, cog: Arc<Cog>) -> Self {
        self.core.cog = Some(cog);
        self
    }

    pub fn build(self) -> Result<SubCommand, RegistrationError> {
        validate_command_name(&self.core.name)?;
        validate_value_options(&self.options)?;
        Ok(SubCommand {
            core: self.core,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            options: self.options,
        })
    }
}

/// Builder for [`SubCommandGroup`].
pub struct SubCommandGroupBuilder {
    core: CommandCore,
    description: Option<String>,
}

impl SubCommandGroupBuilder {
    pub fn new(name: impl Into<String>, callback: Arc<dyn CommandCallback>) -> Self {
        Self {
            core: CommandCore::new(name.into(), callback),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn on_error(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.core.on_error = Some(handler);
        self
    }

    pub fn cog(mut self, cog: Arc<Cog>) -> Self {
        self.core.cog = Some(cog);
        self
    }

    pub fn build(self) -> Result<SubCommandGroup, RegistrationError> {
        validate_command_name(&self.core.name)?;
        Ok(SubCommandGroup {
            core: self.core,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            children: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::commands::error::HandlerResult;

    struct Noop;

    #[async_trait]
    impl CommandCallback for Noop {
        async fn call(&self, _inter: &Interaction, _args: Arguments) -> HandlerResult {
            Ok(())
        }
    }

    fn noop() -> Arc<dyn CommandCallback> {
        Arc::new(Noop)
    }

    fn leaf(name: &str) -> SubCommand {
        sub_command(name, noop()).build().unwrap()
    }

    fn group(name: &str) -> SubCommandGroup {
        sub_command_group(name, noop()).build().unwrap()
    }

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_build_rejects_invalid_names() {
        assert!(matches!(
            slash_command("Ban", noop()).build(),
            Err(RegistrationError::InvalidName(_))
        ));
        assert!(sub_command("two words", noop()).build().is_err());
        assert!(sub_command_group("", noop()).build().is_err());
    }

    #[test]
    fn test_build_rejects_sub_command_options() {
        let result = slash_command("ban", noop())
            .option(CommandOption::new("add", "-", OptionType::SubCommand))
            .build();
        assert!(matches!(result, Err(RegistrationError::InvalidOption { .. })));
    }

    #[test]
    fn test_build_rejects_zero_max_concurrency() {
        let result = slash_command("ban", noop())
            .max_concurrency(0, BucketType::User, false)
            .build();
        assert!(matches!(
            result,
            Err(RegistrationError::InvalidMaxConcurrency { ref command, number: 0 }) if command == "ban"
        ));
        assert!(
            slash_command("ban", noop())
                .max_concurrency(1, BucketType::User, false)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_defaults() {
        let cmd = slash_command("ping", noop()).build().unwrap();
        assert_eq!(cmd.description(), "-");
        assert!(cmd.auto_sync());
        assert!(cmd.guild_ids().is_none());
        assert!(cmd.body().default_permission);
    }

    #[test]
    fn test_first_child_discards_flat_options() {
        let mut cmd = slash_command("ban", noop())
            .option(CommandOption::new("user", "-", OptionType::User))
            .option(CommandOption::new("reason", "-", OptionType::String))
            .build()
            .unwrap();
        assert_eq!(cmd.body().options.len(), 2);

        cmd.add_sub_command(leaf("add")).unwrap();
        let body = cmd.body();
        assert_eq!(body.options.len(), 1);
        assert_eq!(body.options[0].name, "add");
        assert_eq!(body.options[0].kind, OptionType::SubCommand);
        assert!(cmd.options().is_empty());

        cmd.add_sub_command_group(group("temp")).unwrap();
        let names: Vec<_> = cmd.body().options.into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["add", "temp"]);
    }

    #[test]
    fn test_flat_options_rejected_once_children_exist() {
        let mut cmd = slash_command("ban", noop()).build().unwrap();
        cmd.add_sub_command(leaf("add")).unwrap();
        assert!(matches!(
            cmd.add_option(CommandOption::new("user", "-", OptionType::User)),
            Err(RegistrationError::OptionsWithChildren(_))
        ));
    }

    #[test]
    fn test_duplicate_children_are_rejected() {
        let mut cmd = slash_command("ban", noop()).build().unwrap();
        cmd.add_sub_command(leaf("add")).unwrap();
        assert!(matches!(
            cmd.add_sub_command(leaf("add")),
            Err(RegistrationError::DuplicateChild { .. })
        ));
        assert!(matches!(
            cmd.add_sub_command_group(group("add")),
            Err(RegistrationError::DuplicateChild { .. })
        ));

        let mut temp = group("temp");
        temp.add_sub_command(leaf("add")).unwrap();
        assert!(temp.add_sub_command(leaf("add")).is_err());

        // schema stays in step with the children
        cmd.add_sub_command_group(temp).unwrap();
        let body = cmd.body();
        assert_eq!(body.options.len(), 2);
        assert_eq!(body.options[1].options.len(), 1);
    }

    #[test]
    fn test_qualified_names() {
        let mut cmd = slash_command("ban", noop()).build().unwrap();
        cmd.add_sub_command(leaf("kick")).unwrap();

        let mut temp = group("temp");
        temp.add_sub_command(leaf("add")).unwrap();
        assert_eq!(temp.get("add").unwrap().qualified_name(), "temp add");

        cmd.add_sub_command_group(temp).unwrap();
        cmd.group_mut("temp")
            .unwrap()
            .add_sub_command(leaf("remove"))
            .unwrap();

        assert_eq!(cmd.qualified_name(), "ban");
        assert_eq!(cmd.sub_command("kick").unwrap().qualified_name(), "ban kick");
        let temp = cmd.group("temp").unwrap();
        assert_eq!(temp.qualified_name(), "ban temp");
        assert_eq!(temp.get("add").unwrap().qualified_name(), "ban temp add");
        assert_eq!(temp.get("remove").unwrap().qualified_name(), "ban temp remove");
    }

    #[test]
    fn test_children_inherit_cog() {
        let cog = Arc::new(Cog::new("moderation"));
        let mut cmd = slash_command("ban", noop()).cog(cog).build().unwrap();
        let mut temp = group("temp");
        temp.add_sub_command(leaf("add")).unwrap();
        cmd.add_sub_command_group(temp).unwrap();
        cmd.add_sub_command(leaf("kick")).unwrap();

        let add = cmd.group("temp").unwrap().get("add").unwrap();
        assert_eq!(add.cog().map(Cog::name), Some("moderation"));
        assert_eq!(cmd.sub_command("kick").unwrap().cog().map(Cog::name), Some("moderation"));
    }

    #[test]
    fn test_resolve() {
        let mut cmd = slash_command("ban", noop()).build().unwrap();
        cmd.add_sub_command(leaf("a")).unwrap();
        cmd.add_sub_command(leaf("b")).unwrap();
        let mut g = group("g");
        g.add_sub_command(leaf("c")).unwrap();
        cmd.add_sub_command_group(g).unwrap();

        let (group, sub) = cmd.resolve(&[]);
        assert!(group.is_none() && sub.is_none());

        let (group, sub) = cmd.resolve(&path(&["a"]));
        assert!(group.is_none());
        assert_eq!(sub.unwrap().name(), "a");

        let (group, sub) = cmd.resolve(&path(&["g", "c"]));
        assert_eq!(group.unwrap().name(), "g");
        assert_eq!(sub.unwrap().qualified_name(), "ban g c");

        let (group, sub) = cmd.resolve(&path(&["g", "z"]));
        assert_eq!(group.unwrap().name(), "g");
        assert!(sub.is_none());

        // a group is not a sub-command and vice versa
        assert!(cmd.resolve(&path(&["g"])).1.is_none());
        assert!(cmd.resolve(&path(&["a", "c"])).0.is_none());
        assert!(cmd.resolve(&path(&["g", "c", "x"])).1.is_none());
    }

    #[test]
    fn test_body_to_json() {
        let mut cmd = slash_command("ban", noop())
            .description("Ban members")
            .default_permission(false)
            .build()
            .unwrap();
        let mut temp = sub_command_group("temp", noop())
            .description("Temporary bans")
            .build()
            .unwrap();
        temp.add_sub_command(
            sub_command("add", noop())
                .description("Add a temporary ban")
                .option(CommandOption::new("user", "Who", OptionType::User).required(true))
                .build()
                .unwrap(),
        )
        .unwrap();
        cmd.add_sub_command_group(temp).unwrap();

        assert_eq!(
            cmd.body().to_json(),
            json!({
                "type": 1,
                "name": "ban",
                "description": "Ban members",
                "default_permission": false,
                "options": [{
                    "name": "temp",
                    "description": "Temporary bans",
                    "type": 2,
                    "options": [{
                        "name": "add",
                        "description": "Add a temporary ban",
                        "type": 1,
                        "options": [{"name": "user", "description": "Who", "type": 6, "required": true}]
                    }]
                }]
            })
        );
    }
}
