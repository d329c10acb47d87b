//! Application configuration for Inkling.
//!
//! User config lives at `~/.inkling/inkling.toml`.
//! API keys are never stored in the file; the config names the environment
//! variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InklingError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "inkling.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".inkling";

// ---------------------------------------------------------------------------
// Config structs (matching inkling.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion integration settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// OpenRouter settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Name of the env var holding the integration token (never the token itself).
    #[serde(default = "default_notion_key_env")]
    pub api_key_env: String,

    /// Base URL of the Notion API.
    #[serde(default = "default_notion_base")]
    pub api_base: String,

    /// Value for the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub api_version: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_notion_key_env(),
            api_base: default_notion_base(),
            api_version: default_notion_version(),
        }
    }
}

fn default_notion_key_env() -> String {
    "NOTION_API_KEY".into()
}
fn default_notion_base() -> String {
    "https://api.notion.com".into()
}
fn default_notion_version() -> String {
    "2022-06-28".into()
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_openrouter_key_env")]
    pub api_key_env: String,

    /// Default model to use for answering.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Base URL of the completion API.
    #[serde(default = "default_openrouter_base")]
    pub api_base: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openrouter_key_env(),
            default_model: default_model(),
            api_base: default_openrouter_base(),
        }
    }
}

fn default_openrouter_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}
fn default_openrouter_base() -> String {
    "https://openrouter.ai/api/v1".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.inkling/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| InklingError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.inkling/inkling.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| InklingError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| InklingError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| InklingError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| InklingError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| InklingError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that both API key env vars are set and non-empty.
pub fn validate_api_keys(config: &AppConfig) -> Result<()> {
    require_env(&config.notion.api_key_env, "Notion integration token")?;
    require_env(&config.openrouter.api_key_env, "OpenRouter API key")?;
    Ok(())
}

fn require_env(var_name: &str, what: &str) -> Result<()> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(InklingError::config(format!(
            "{what} not found. Set the {var_name} environment variable."
        ))),
    }
}
