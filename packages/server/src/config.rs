use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::{ParseError, Url};

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL prepended to `/image/<filename>` in photo responses.
    pub public_url: String,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. When set, the individual fields below are ignored.
    #[serde(default)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL for the configured database.
    ///
    /// An explicit `url` is used verbatim. Otherwise a Postgres URL is built
    /// from the individual fields, percent-encoding the credentials.
    pub fn connection_url(&self) -> Result<String, ParseError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port))?;
        // Userinfo can only be rejected when the URL has no host.
        url.set_username(&self.user).map_err(|()| ParseError::EmptyHost)?;
        url.set_password(Some(&self.password)).map_err(|()| ParseError::EmptyHost)?;
        url.set_path(&self.name);
        Ok(url.into())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded images.
    pub image_dir: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.public_url", "localhost:8080")?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.max_connections", 20)?
            .set_default("storage.image_dir", "image")?
            .set_default("storage.max_upload_size", 32 * 1024 * 1024)?
            // Load from config/config.{toml,json,yaml}
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PHOTOS__DATABASE__PASSWORD)
            .add_source(
                Environment::with_prefix("PHOTOS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
