//! Router configuration: loading and defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Directory name used for project-local and user-global configuration.
pub const CONFIG_DIR: &str = "slash-router";

/// Settings shared by the registry and the command-line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Guilds that receive every command without its own guild restriction,
    /// instead of registering those commands globally.
    #[serde(default)]
    pub test_guilds: Option<Vec<u64>>,
    /// Default tracing filter directive (e.g. `"slash_router=debug"`).
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Load router configuration from the two-tier hierarchy.
///
/// 1. `{working_dir}/.slash-router/config.json` (project-local)
/// 2. `~/.config/slash-router/config.json` (user-global)
///
/// The first file that exists and parses wins; otherwise defaults are used.
pub fn load_router_config(working_dir: &Path) -> RouterConfig {
    // 1. Project-local
    let project_config = working_dir.join(format!(".{CONFIG_DIR}")).join("config.json");
    if let Some(config) = load_config_file(&project_config) {
        return config;
    }

    // 2. User-global
    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(CONFIG_DIR).join("config.json");
        if let Some(config) = load_config_file(&user_config) {
            return config;
        }
    }

    RouterConfig::default()
}

fn load_config_file(path: &Path) -> Option<RouterConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!("Failed to parse router config {}: {}", path.display(), e);
            e
        })
        .ok()
}
