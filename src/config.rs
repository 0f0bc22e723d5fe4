use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `FORGE_SERVER__PORT=8000`.
const ENV_PREFIX: &str = "FORGE";
/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_STEM: &str = "ui-forge";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "BIND_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the generation service
    #[arg(long, env = "SERVICE_URL")]
    pub service_url: Option<String>,

    /// File holding the persisted session
    #[arg(long, env = "SESSION_PATH")]
    pub storage_path: Option<String>,

    /// Keep the session in memory only
    #[arg(long)]
    pub ephemeral: Option<bool>,

    /// Emit JSON logs
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub generate_path: String,
    pub login_path: String,
    pub register_path: String,
    pub health_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: String,
    pub ephemeral: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("service.base_url", "http://localhost:5000")?
            .set_default("service.generate_path", "/generate")?
            .set_default("service.login_path", "/login")?
            .set_default("service.register_path", "/register")?
            .set_default("service.health_path", "/health")?
            .set_default("storage.path", ".ui-forge/session.json")?
            .set_default("storage.ephemeral", false)?
            .set_default("log.json", false)?;

        // 2. Config file: explicit path must exist, the default one may not
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_STEM).required(false)),
        };

        // 3. Environment, e.g. FORGE_SERVICE__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env aliases) win
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.service_url {
            builder = builder.set_override("service.base_url", url)?;
        }
        if let Some(path) = cli.storage_path {
            builder = builder.set_override("storage.path", path)?;
        }
        if let Some(ephemeral) = cli.ephemeral {
            builder = builder.set_override("storage.ephemeral", ephemeral)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
