//! Configuration for Products API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;
use std::path::PathBuf;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where product rows live
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RepositoryKind {
    Postgres,
    /// Process-local; everything is lost on restart
    Memory,
}

/// Uploaded image location on disk and the URL it is served from
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub public_url: String,
}

impl FromEnv for StorageConfig {
    /// - STORAGE_ROOT: defaults to storage/app/public
    /// - STORAGE_PUBLIC_URL: defaults to http://localhost:8080/storage
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            root: PathBuf::from(env_or_default("STORAGE_ROOT", "storage/app/public")),
            public_url: env_or_default("STORAGE_PUBLIC_URL", "http://localhost:8080/storage")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub repository: RepositoryKind,
    /// `None` when running on the in-memory repository
    pub database: Option<PostgresConfig>,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub cors_allowed_origin: String,
    pub run_migrations: bool,
    pub seed_database: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let repository: RepositoryKind = env_parse("PRODUCTS_REPOSITORY", "postgres")?;
        let database = match repository {
            RepositoryKind::Postgres => Some(PostgresConfig::from_env()?), // requires DATABASE_URL
            RepositoryKind::Memory => None,
        };
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            repository,
            database,
            retry: RetryConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            server,
            environment,
            cors_allowed_origin: env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            seed_database: env_parse("SEED_DATABASE", "false")?,
        })
    }
}
