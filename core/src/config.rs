//! Client configuration: service endpoint, auth requirement, extra
//! directory entries.
//!
//! Loaded once at startup from `config.toml` under the bidforge home,
//! then layered with environment overrides. Components receive the
//! result by reference and never mutate it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::directory::DirectoryEntry;
use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_BASE_URL: &str = "http://localhost:5050";

const HOME_ENV: &str = "BIDFORGE_HOME";
const BASE_URL_ENV: &str = "BIDFORGE_BASE_URL";
const REQUIRE_AUTH_ENV: &str = "BIDFORGE_REQUIRE_AUTH";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the generation service.
    pub base_url: String,
    /// Whether generation requires a session token.
    pub require_auth: bool,
    /// Where generated artifacts are written; `None` means the current
    /// directory at save time.
    pub output_dir: Option<PathBuf>,
    /// Extra directory entries merged over the built-ins.
    pub directory: Vec<DirectoryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            require_auth: true,
            output_dir: None,
            directory: Vec::new(),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional; absent keys
/// fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigToml {
    base_url: Option<String>,
    require_auth: Option<bool>,
    output_dir: Option<PathBuf>,
    #[serde(default)]
    directory: Vec<DirectoryEntryToml>,
}

#[derive(Debug, Clone, Deserialize)]
struct DirectoryEntryToml {
    label: String,
    #[serde(default)]
    overrides: BTreeMap<String, String>,
}

impl From<DirectoryEntryToml> for DirectoryEntry {
    fn from(entry: DirectoryEntryToml) -> Self {
        DirectoryEntry {
            label: entry.label,
            overrides: entry.overrides,
        }
    }
}

/// Bidforge home: `$BIDFORGE_HOME` when set and non-empty, else
/// `~/.bidforge`.
pub fn find_bidforge_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let mut home = dirs::home_dir()
        .ok_or_else(|| Error::config("could not resolve the user home directory"))?;
    home.push(".bidforge");
    Ok(home)
}

/// Load configuration from `home/config.toml`, then apply environment
/// overrides. A missing file yields the defaults.
pub fn load_config(home: &Path) -> Result<Config> {
    let path = home.join(CONFIG_FILE_NAME);
    let file = match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str::<ConfigToml>(&contents)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            ConfigToml::default()
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let mut config = Config {
        base_url: file
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        require_auth: file.require_auth.unwrap_or(true),
        output_dir: file.output_dir,
        directory: file.directory.into_iter().map(DirectoryEntry::from).collect(),
    };

    // An empty override behaves like an unset one for both variables.
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.is_empty() {
            config.base_url = base_url;
        }
    }
    if let Ok(require_auth) = std::env::var(REQUIRE_AUTH_ENV) {
        if !require_auth.is_empty() {
            config.require_auth = parse_bool_env(REQUIRE_AUTH_ENV, &require_auth)?;
        }
    }

    Ok(config)
}

fn parse_bool_env(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(Error::config(format!("invalid {name} value: {other}"))),
    }
}
