//! Registration-time descriptors for slash commands and their options.
//!
//! These types describe what the platform shows to users. They carry no
//! behaviour; the command tree in [`crate::commands`] keeps them in sync with
//! its registered nodes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::commands::RegistrationError;

static COMMAND_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w-]{1,32}$").unwrap_or_else(|err| panic!("invalid command name regex: {err}"))
});

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "-";

/// Check that `name` is a valid command, group or sub-command name.
pub fn validate_command_name(name: &str) -> Result<(), RegistrationError> {
    if COMMAND_NAME.is_match(name) && !name.chars().any(char::is_uppercase) {
        Ok(())
    } else {
        Err(RegistrationError::InvalidName(name.to_string()))
    }
}

/// Application command type of slash (chat input) commands.
pub const CHAT_INPUT_COMMAND_TYPE: u8 = 1;

/// Option type tags, with the platform's integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    #[default]
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
}

impl OptionType {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether this option selects a nested node rather than carrying a value.
    pub fn is_sub_command_like(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

/// A predefined value users can pick for an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: Value,
}

impl OptionChoice {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// A slash command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: OptionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub choices: Vec<OptionChoice>,
    /// Nested options; only meaningful for sub-commands and groups.
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Mark the option as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Add a choice.
    pub fn choice(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_choice(name, value);
        self
    }

    pub fn add_choice(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.choices.push(OptionChoice::new(name, value));
    }

    /// Append a nested option, enforcing the nesting rules: a sub-command holds
    /// only value options, a group holds only sub-commands.
    pub fn add_option(&mut self, option: CommandOption) -> Result<(), RegistrationError> {
        match self.kind {
            OptionType::SubCommand if option.kind.is_sub_command_like() => {
                return Err(RegistrationError::InvalidOption {
                    name: option.name,
                    reason: "sub_command can only be nested in a sub_command_group".to_string(),
                });
            }
            OptionType::SubCommandGroup if option.kind != OptionType::SubCommand => {
                return Err(RegistrationError::InvalidOption {
                    name: option.name,
                    reason: "expected sub_command in this sub_command_group".to_string(),
                });
            }
            _ => {}
        }
        option.validate()?;
        self.options.push(option);
        Ok(())
    }

    /// Validate the name of this option and of every nested option.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.kind.is_sub_command_like() {
            validate_command_name(&self.name)?;
        } else if self.name.is_empty() || self.name.chars().any(char::is_uppercase) {
            return Err(RegistrationError::InvalidOption {
                name: self.name.clone(),
                reason: "option name must be lowercase".to_string(),
            });
        }
        self.options.iter().try_for_each(CommandOption::validate)
    }

    /// Registration payload for this option.
    pub fn to_json(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(self.name));
        payload.insert("description".to_string(), json!(self.description));
        payload.insert("type".to_string(), json!(self.kind.value()));
        if self.required {
            payload.insert("required".to_string(), json!(true));
        }
        if !self.choices.is_empty() {
            payload.insert("choices".to_string(), json!(self.choices));
        }
        if !self.options.is_empty() {
            payload.insert(
                "options".to_string(),
                Value::Array(self.options.iter().map(CommandOption::to_json).collect()),
            );
        }
        Value::Object(payload)
    }
}

/// Top-level slash command descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashCommandSchema {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
    pub default_permission: bool,
}

impl SlashCommandSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            default_permission: true,
        }
    }

    /// Registration payload for this command.
    pub fn to_json(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("type".to_string(), json!(CHAT_INPUT_COMMAND_TYPE));
        payload.insert("name".to_string(), json!(self.name));
        payload.insert("description".to_string(), json!(self.description));
        payload.insert(
            "options".to_string(),
            Value::Array(self.options.iter().map(CommandOption::to_json).collect()),
        );
        if !self.default_permission {
            payload.insert("default_permission".to_string(), json!(false));
        }
        Value::Object(payload)
    }
}
