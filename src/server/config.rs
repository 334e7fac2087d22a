use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A login the user directory accepts.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub company_id: i32,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub mock_seed: Option<u64>,

    #[serde(default = "default_users")]
    pub users: Vec<UserAccount>,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    listen_addr: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_minutes: Option<i64>,
    log_dir: Option<String>,
    mock_seed: Option<u64>,
}

// Only the file can carry the account list.
#[derive(Deserialize, Default, Debug)]
struct FileServerConfig {
    #[serde(flatten)]
    base: PartialServerConfig,
    users: Option<Vec<UserAccount>>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_jwt_secret() -> String {
    // Development only; set JWT_SECRET in any shared deployment.
    "super-secret-key-change-this-in-production".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_role() -> String {
    "manager".to_string()
}

fn default_users() -> Vec<UserAccount> {
    vec![
        UserAccount {
            username: "admin".to_string(),
            password: "password123".to_string(),
            company_id: 1,
            role: default_role(),
        },
        UserAccount {
            username: "manager1".to_string(),
            password: "securepass".to_string(),
            company_id: 101,
            role: default_role(),
        },
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
            log_dir: default_log_dir(),
            mock_seed: None,
            users: default_users(),
        }
    }
}

impl ServerConfig {
    /// Loads the file at `config_path` (if any), then lets environment
    /// variables override individual settings.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Self::merge(Self::read_file(config_path)?, env_config)
    }

    fn read_file(config_path: Option<&str>) -> Result<FileServerConfig, String> {
        let Some(path_str) = config_path else {
            return Ok(FileServerConfig::default());
        };
        let path = Path::new(path_str);
        if !path.exists() {
            return Ok(FileServerConfig::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
    }

    // Environment overrides file.
    fn merge(file_config: FileServerConfig, env_config: PartialServerConfig) -> Result<Self, String> {
        let file = file_config.base;
        let config = ServerConfig {
            listen_addr: env_config
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or_else(default_listen_addr),
            jwt_secret: env_config
                .jwt_secret
                .or(file.jwt_secret)
                .unwrap_or_else(default_jwt_secret),
            token_ttl_minutes: env_config
                .token_ttl_minutes
                .or(file.token_ttl_minutes)
                .unwrap_or_else(default_token_ttl_minutes),
            log_dir: env_config.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
            mock_seed: env_config.mock_seed.or(file.mock_seed),
            users: file_config.users.unwrap_or_else(default_users),
        };

        if config.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        if config.token_ttl_minutes <= 0 {
            return Err("TOKEN_TTL_MINUTES must be positive".to_string());
        }
        Ok(config)
    }
}
