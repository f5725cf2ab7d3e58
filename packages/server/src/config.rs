use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{RemoteStoreConfig, SqliteConfig, StorageBackend, StorageConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret required by mutating endpoints.
    pub admin_password: String,
    /// Whether `/api/add` requires the password. `/api/batch-add` always does.
    #[serde(default = "default_protect_add")]
    pub protect_add: bool,
}

fn default_protect_add() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.backend", "memory")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FLOWER__AUTH__ADMIN_PASSWORD)
            .add_source(
                Environment::with_prefix("FLOWER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Startup checks that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.admin_password.is_empty() {
            return Err(ConfigError::Message(
                "auth.admin_password must not be empty".into(),
            ));
        }
        self.storage
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}
