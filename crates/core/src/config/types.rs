use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Platform key whose extra arguments apply to every launch.
pub const COMMON_PLATFORM: &str = "common";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub game_server: Option<GameServerConfig>,
    #[serde(default)]
    pub game_clients: Vec<GameClientConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the web frontend (served with index.html fallback)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Required when method = "api_key"
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    ApiKey,
}

/// Launch history database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cabinet.db")
}

/// Game catalog source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("games.yaml")
}

/// Host running the emulator, reached over ssh
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameServerConfig {
    /// Address passed to ssh (e.g., "192.168.1.20" or "pi@arcade")
    pub host: String,
    /// Directory containing launch.sh, stopall.sh, query.sh and set_volume.sh
    pub path: String,
    /// Remote shell binary (default: "ssh")
    #[serde(default = "default_ssh_command")]
    pub ssh_command: String,
    /// Timeout for a single remote command in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Per-platform launch options, keyed by app id ("common" applies to all)
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformConfig>,
}

impl GameServerConfig {
    /// Extra launch arguments configured for the given app id, common ones first.
    pub fn platform_args(&self, app_id: &str) -> Vec<&str> {
        [COMMON_PLATFORM, app_id]
            .iter()
            .filter_map(|key| self.platforms.get(*key))
            .map(|p| p.extra_args.as_str())
            .filter(|args| !args.is_empty())
            .collect()
    }
}

fn default_ssh_command() -> String {
    "ssh".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Per-platform launch options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub extra_args: String,
}

/// Display client that connects to the game server after a launch
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameClientConfig {
    /// Address passed to ssh
    pub host: String,
    /// Game server address the client connects back to
    pub server_ip: String,
    /// Working directory of the client binary
    pub path: String,
    /// Client executable name
    pub exe: String,
    #[serde(default)]
    pub extra_args: String,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_server: Option<GameServerConfig>,
    pub game_clients: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
                api_key_configured: config
                    .auth
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            catalog: config.catalog.clone(),
            game_server: config.game_server.clone(),
            game_clients: config.game_clients.len(),
        }
    }
}
