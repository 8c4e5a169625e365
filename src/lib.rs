//! Routing and invocation of slash commands.
//!
//! Commands are trees of at most two levels: a top-level command with either
//! flat options or children, where each child is a sub-command or a group of
//! sub-commands. An incoming [`interaction::Interaction`] carries nested
//! options; the registry finds the command, routes the options to the
//! selected node and runs its handlers under checks, cooldowns, concurrency
//! limits and invoke hooks.

pub mod app_commands;
pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod interaction;
