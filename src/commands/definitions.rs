//! Command definition files: JSON descriptions of command trees.
//!
//! A definition file describes names, options and connectors; the handler of
//! every node is supplied by the caller, keyed by qualified name.

use std::{collections::HashMap, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    core::{CommandCallback, Connectors},
    error::RegistrationError,
    registry::CommandRegistry,
    slash_core::{slash_command, sub_command, sub_command_group},
};
use crate::{app_commands::CommandOption, config::RouterConfig};

fn default_true() -> bool {
    true
}

/// Top-level definition document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandDefinitions {
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

/// Definition of a top-level command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default = "default_true")]
    pub default_permission: bool,
    #[serde(default)]
    pub guild_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub connectors: HashMap<String, String>,
    #[serde(default = "default_true")]
    pub auto_sync: bool,
    #[serde(default)]
    pub children: Vec<ChildDefinition>,
}

/// Definition of a direct child of a command or a group.
///
/// Groups may only appear directly under a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildDefinition {
    SubCommand(SubCommandDefinition),
    Group(GroupDefinition),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCommandDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub connectors: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildDefinition>,
}

/// Parse a definition document.
pub fn parse_definitions(content: &str) -> Result<CommandDefinitions, RegistrationError> {
    Ok(serde_json::from_str(content)?)
}

/// Load a definition document from a file.
pub fn load_definitions(path: &Path) -> Result<CommandDefinitions, RegistrationError> {
    let content = std::fs::read_to_string(path)?;
    parse_definitions(&content)
}

impl SubCommandDefinition {
    fn build(
        &self,
        parent: &str,
        factory: &dyn Fn(&str) -> Arc<dyn CommandCallback>,
    ) -> Result<super::SubCommand, RegistrationError> {
        let qualified = format!("{parent} {}", self.name);
        let mut builder = sub_command(&self.name, factory(&qualified))
            .options(self.options.iter().cloned())
            .connectors(Connectors::from(self.connectors.clone()));
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        builder.build()
    }
}

impl GroupDefinition {
    fn build(
        &self,
        parent: &str,
        factory: &dyn Fn(&str) -> Arc<dyn CommandCallback>,
    ) -> Result<super::SubCommandGroup, RegistrationError> {
        let qualified = format!("{parent} {}", self.name);
        let mut builder = sub_command_group(&self.name, factory(&qualified));
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        let mut group = builder.build()?;
        for child in &self.children {
            match child {
                ChildDefinition::SubCommand(sub) => {
                    group.add_sub_command(sub.build(&qualified, factory)?)?;
                }
                ChildDefinition::Group(nested) => {
                    return Err(RegistrationError::InvalidOption {
                        name: nested.name.clone(),
                        reason: format!(
                            "sub_command_group cannot be nested in sub_command_group '{qualified}'"
                        ),
                    });
                }
            }
        }
        Ok(group)
    }
}

impl CommandDefinitions {
    /// Build every defined command, asking `factory` for the handler of each
    /// node by its qualified name.
    pub fn into_registry(
        self,
        config: RouterConfig,
        factory: impl Fn(&str) -> Arc<dyn CommandCallback>,
    ) -> Result<CommandRegistry, RegistrationError> {
        let mut registry = CommandRegistry::with_config(config);

        for def in self.commands {
            let mut builder = slash_command(&def.name, factory(&def.name))
                .options(def.options)
                .default_permission(def.default_permission)
                .connectors(Connectors::from(def.connectors))
                .auto_sync(def.auto_sync);
            if let Some(description) = def.description {
                builder = builder.description(description);
            }
            if let Some(guild_ids) = def.guild_ids {
                builder = builder.guild_ids(guild_ids);
            }
            let mut command = builder.build()?;

            for child in &def.children {
                match child {
                    ChildDefinition::SubCommand(sub) => {
                        command.add_sub_command(sub.build(&def.name, &factory)?)?;
                    }
                    ChildDefinition::Group(group) => {
                        command.add_sub_command_group(group.build(&def.name, &factory)?)?;
                    }
                }
            }

            registry.register(command)?;
        }

        Ok(registry)
    }
}
