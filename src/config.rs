use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    8
}

/// Discrete Postgres connection settings, used when `DATABASE_URL` is not set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseParts {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
}

impl Default for DatabaseParts {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "password".to_string(),
            name: "subscriptions".to_string(),
            ssl_mode: "disable".to_string(),
        }
    }
}

impl DatabaseParts {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: get_env("DB_HOST").unwrap_or(defaults.host),
            port: get_env_parse("DB_PORT", defaults.port),
            user: get_env("DB_USER").unwrap_or(defaults.user),
            password: get_env("DB_PASSWORD").unwrap_or(defaults.password),
            name: get_env("DB_NAME").unwrap_or(defaults.name),
            ssl_mode: get_env("DB_SSLMODE").unwrap_or(defaults.ssl_mode),
        }
    }

    pub fn to_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_env(name)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            // 有配置文件：先解析再用环境变量覆盖
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("failed to parse config file {config_path}: {e}"))?,
            // 无配置文件：使用环境变量与默认值构建
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig {
                    host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                    port: get_env_parse("SERVER_PORT", 8080u16),
                    shutdown_timeout: get_env_parse(
                        "SERVER_SHUTDOWN_TIMEOUT",
                        default_shutdown_timeout(),
                    ),
                },
                database: DatabaseConfig {
                    url: get_env("DATABASE_URL")
                        .unwrap_or_else(|| DatabaseParts::from_env().to_url()),
                    max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    connect_timeout: get_env_parse(
                        "DB_CONNECT_TIMEOUT",
                        default_connect_timeout(),
                    ),
                },
                log: LogConfig {
                    level: get_env("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                },
            },
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Some(v) = get_env("SERVER_HOST") {
            config.server.host = v;
        }
        if let Some(p) = get_env("SERVER_PORT").and_then(|v| v.parse().ok()) {
            config.server.port = p;
        }
        if let Some(t) = get_env("SERVER_SHUTDOWN_TIMEOUT").and_then(|v| v.parse().ok()) {
            config.server.shutdown_timeout = t;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            config.database.url = v;
        }
        if let Some(mc) = get_env("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            config.database.max_connections = mc;
        }
        if let Some(t) = get_env("DB_CONNECT_TIMEOUT").and_then(|v| v.parse().ok()) {
            config.database.connect_timeout = t;
        }
        if let Some(v) = get_env("LOG_LEVEL") {
            config.log.level = v;
        }

        Ok(config)
    }
}
