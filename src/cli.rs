//! CLI entry for slash-router, defining clap subcommands to inspect routes,
//! print registration payloads and run interactions against definition files.
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use crate::{
    commands::{CommandCallback, CommandRegistry, HandlerResult, load_definitions, options_as_route},
    config::{RouterConfig, load_router_config},
    interaction::{Arguments, Interaction, InteractionPayload},
};

// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(about = "slash-router: route and invoke slash command interactions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Print the route path and leaf arguments of an interaction")]
    Route {
        #[arg(help = "Interaction payload (JSON)")]
        interaction: PathBuf,
    },
    #[command(about = "Print registration payloads of the defined commands")]
    Schema {
        #[arg(help = "Command definition file (JSON)")]
        definitions: PathBuf,
        #[arg(long, help = "Print the payloads of this guild instead of the global ones")]
        guild: Option<u64>,
    },
    #[command(about = "Invoke an interaction against the defined commands with echo handlers")]
    Invoke {
        #[arg(help = "Command definition file (JSON)")]
        definitions: PathBuf,
        #[arg(help = "Interaction payload (JSON)")]
        interaction: PathBuf,
    },
}

/// Handler that prints the node it was called for and its arguments.
struct EchoCallback {
    qualified_name: String,
}

#[async_trait]
impl CommandCallback for EchoCallback {
    async fn call(&self, _inter: &Interaction, args: Arguments) -> HandlerResult {
        println!("{} {}", self.qualified_name, Value::Object(args));
        Ok(())
    }
}

fn read_interaction(path: &Path) -> anyhow::Result<InteractionPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read interaction {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse interaction {}", path.display()))
}

fn build_registry(definitions: &Path, config: RouterConfig) -> anyhow::Result<CommandRegistry> {
    let defs = load_definitions(definitions)
        .with_context(|| format!("failed to load definitions {}", definitions.display()))?;
    let registry = defs.into_registry(config, |qualified_name| {
        Arc::new(EchoCallback {
            qualified_name: qualified_name.to_string(),
        })
    })?;
    Ok(registry)
}

/// Parse the command line (or `args` when given) and run the subcommand.
///
/// Configuration is loaded from the current directory.
pub async fn parse(args: Option<&[&str]>) -> anyhow::Result<()> {
    let cli = match args {
        Some(args) => Cli::try_parse_from(args)?,
        None => Cli::parse(),
    };
    let config = load_router_config(&std::env::current_dir()?);
    execute(cli.command, config).await
}

async fn execute(command: Commands, config: RouterConfig) -> anyhow::Result<()> {
    match command {
        Commands::Route { interaction } => {
            let payload = read_interaction(&interaction)?;
            let (path, args) = options_as_route(&payload.options);
            let output = json!({"command": payload.name, "path": path, "arguments": args});
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Schema { definitions, guild } => {
            let registry = build_registry(&definitions, config)?;
            let payloads = match guild {
                Some(guild) => registry.guild_payloads().remove(&guild).unwrap_or_default(),
                None => registry.global_payloads(),
            };
            println!("{}", serde_json::to_string_pretty(&payloads)?);
        }
        Commands::Invoke {
            definitions,
            interaction,
        } => {
            let registry = build_registry(&definitions, config)?;
            let inter = Interaction::from_payload(read_interaction(&interaction)?);
            let outcome = registry.process(&inter).await?;
            println!("outcome: {outcome:?}, failed: {}", inter.command_failed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// this test is to verify that the CLI can be built without panicking
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;

        Cli::command().debug_assert()
    }

    #[tokio::test]
    async fn test_invoke_from_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let definitions = tmp.path().join("commands.json");
        std::fs::write(
            &definitions,
            r#"{"commands": [{"name": "ban", "children": [{"kind": "sub_command", "name": "kick"}]}]}"#,
        )
        .unwrap();
        let interaction = tmp.path().join("interaction.json");
        std::fs::write(
            &interaction,
            r#"{"name": "ban", "options": {"kick": {"user": 3}}}"#,
        )
        .unwrap();

        let command = Commands::Invoke {
            definitions: definitions.clone(),
            interaction: interaction.clone(),
        };
        execute(command, RouterConfig::default()).await.unwrap();

        let route = Commands::Route { interaction };
        execute(route, RouterConfig::default()).await.unwrap();

        let schema = Commands::Schema {
            definitions,
            guild: None,
        };
        execute(schema, RouterConfig::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_unknown_command_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let definitions = tmp.path().join("commands.json");
        std::fs::write(&definitions, r#"{"commands": []}"#).unwrap();
        let interaction = tmp.path().join("interaction.json");
        std::fs::write(&interaction, r#"{"name": "ban"}"#).unwrap();

        let command = Commands::Invoke {
            definitions,
            interaction,
        };
        assert!(execute(command, RouterConfig::default()).await.is_err());
    }
}
