use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub portal: PortalConfig,
    pub catalog: CatalogConfig,
    pub artifacts: ArtifactsConfig,
    pub checkout: CheckoutConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    /// Portal driver backend; "memory" is the built-in one
    pub mode: String,
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckoutConfig {
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_agreement")]
    pub agreement: String,
    #[serde(default = "default_cart_retry_limit")]
    pub cart_retry_limit: u32,
}

fn default_priority() -> String {
    "ASAP".to_string()
}

fn default_agreement() -> String {
    "I acknowledge and agree".to_string()
}

fn default_cart_retry_limit() -> u32 {
    3
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file; optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file; shouldn't be checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of PROCURA)
            // Eg. `PROCURA__SERVER__PORT=9000` would set the server port
            .add_source(config::Environment::with_prefix("PROCURA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
