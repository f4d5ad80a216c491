use serde::Deserialize;
use std::collections::HashMap;
use std::env;

use seer_core::reporting::Surface;
use seer_core::scenarios::warehouse::DEFAULT_SNAPSHOT;
use seer_shared::Masked;

/// Plain environment names honoured on top of `SEER_`-prefixed variables,
/// mapped to their config key. Blank values are ignored.
pub const RECOGNIZED_ENV: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("SENTRY_BROWSER_DSN", "reporting.browser_dsn"),
    ("SENTRY_DSN", "reporting.server_dsn"),
    ("SENTRY_EDGE_DSN", "reporting.edge_dsn"),
    ("SENTRY_ENVIRONMENT", "reporting.environment"),
    ("RELEASE_VERSION", "reporting.release"),
    ("THIRD_PARTY_API_URL", "upstream.third_party_url"),
    ("FEATURE_FLAG_SYNC_TOKEN", "scenarios.feature_flag_sync_token"),
    ("WAREHOUSE_SNAPSHOT", "scenarios.warehouse_snapshot"),
];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub scenarios: ScenarioConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest request body accepted by the checkout endpoint.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    pub browser_dsn: Option<String>,
    pub server_dsn: Option<String>,
    pub edge_dsn: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
    pub release: Option<String>,
    #[serde(default = "default_sample_rate")]
    pub traces_sample_rate: f32,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            browser_dsn: None,
            server_dsn: None,
            edge_dsn: None,
            environment: default_environment(),
            release: None,
            traces_sample_rate: default_sample_rate(),
        }
    }
}

impl ReportingConfig {
    /// DSN for a surface. The server falls back to the browser DSN and the
    /// edge falls back to the server's.
    pub fn dsn_for(&self, surface: Surface) -> Option<&str> {
        let browser = non_blank(&self.browser_dsn);
        let server = non_blank(&self.server_dsn).or(browser);
        match surface {
            Surface::Browser => browser,
            Surface::Server => server,
            Surface::Edge => non_blank(&self.edge_dsn).or(server),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_third_party_url")]
    pub third_party_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            third_party_url: default_third_party_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    pub feature_flag_sync_token: Option<Masked<String>>,
    #[serde(default = "default_snapshot")]
    pub warehouse_snapshot: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            feature_flag_sync_token: None,
            warehouse_snapshot: default_snapshot(),
        }
    }
}

fn default_port() -> u16 { 3000 }
fn default_body_limit() -> usize { 1024 }
fn default_environment() -> String { "development".into() }
fn default_sample_rate() -> f32 { 1.0 }
fn default_third_party_url() -> String { "https://httpstat.us/503".into() }
fn default_user_agent() -> String { "seer-playground/1.0".into() }
fn default_snapshot() -> String { DEFAULT_SNAPSHOT.into() }

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::load_from(&vars)
    }

    /// Build the configuration from files and the given environment snapshot.
    pub fn load_from(vars: &HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());
        let env_source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SEER_SERVER__PORT=8080` sets `server.port`
            .add_source(
                config::Environment::with_prefix("SEER")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env_source)),
            );

        for (name, key) in RECOGNIZED_ENV {
            let value = vars
                .get(*name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}
