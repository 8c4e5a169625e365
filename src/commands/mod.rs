//! Slash command trees: registration, routing and invocation.

pub mod checks;
pub mod concurrency;
pub mod cooldown;
pub mod core;
pub mod definitions;
pub mod error;
pub mod registry;
pub mod route;
pub mod slash_core;

pub use checks::{Check, Cog, ErrorHandler, InvokeGuards, InvokeHook};
pub use concurrency::{ConcurrencySlot, MaxConcurrency};
pub use cooldown::{BucketType, Cooldown, CooldownMapping};
pub use core::{CommandCallback, CommandCore, Connectors};
pub use definitions::{
    ChildDefinition, CommandDefinition, CommandDefinitions, GroupDefinition, SubCommandDefinition,
    load_definitions, parse_definitions,
};
pub use error::{CommandError, HandlerError, HandlerResult, InvokeOutcome, RegistrationError};
pub use registry::CommandRegistry;
pub use route::options_as_route;
pub use slash_core::{
    Child, InvokableSlashCommand, SlashCommandBuilder, SubCommand, SubCommandBuilder,
    SubCommandGroup, SubCommandGroupBuilder, slash_command, sub_command, sub_command_group,
};
