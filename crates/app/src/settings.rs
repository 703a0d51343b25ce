//! Settings for the service, read from `settings.toml` and `REPAS__*`
//! environment variables.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 3001
//! database = { sqlite = "./data/repas.db" }
//! cors_origin = "http://localhost:5173"
//!
//! [alerts]
//! min_servings_per_guest = 2.0
//! crowd_size = 15
//! ```
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use engine::AlertThresholds;
use serde::Deserialize;

const DEFAULT_SETTINGS_PATH: &str = "settings.toml";
const SETTINGS_PATH_ENV: &str = "REPAS_SETTINGS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    /// Browser origin allowed to call the API.
    pub cors_origin: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3001,
            database: Database::Sqlite("./data/repas.db".to_string()),
            cors_origin: server::DEFAULT_ORIGIN.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Alerts {
    pub min_servings_per_guest: f64,
    pub crowd_size: u64,
}

impl Default for Alerts {
    fn default() -> Self {
        let thresholds = AlertThresholds::default();
        Self {
            min_servings_per_guest: thresholds.min_servings_per_guest,
            crowd_size: thresholds.crowd_size,
        }
    }
}

impl From<&Alerts> for AlertThresholds {
    fn from(alerts: &Alerts) -> Self {
        Self {
            min_servings_per_guest: alerts.min_servings_per_guest,
            crowd_size: alerts.crowd_size,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub alerts: Alerts,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());

        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(
                    Environment::with_prefix("REPAS")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 3001);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("./data/repas.db".to_string())
        );
        assert_eq!(settings.server.cors_origin, "http://localhost:5173");
        assert_eq!(
            AlertThresholds::from(&settings.alerts),
            AlertThresholds::default()
        );
    }

    #[test]
    fn reads_every_section() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            port = 8080
            database = "memory"
            cors_origin = "https://repas.example"

            [alerts]
            min_servings_per_guest = 3.5
            crowd_size = 30
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database, Database::Memory);
        assert_eq!(settings.server.cors_origin, "https://repas.example");

        let thresholds = AlertThresholds::from(&settings.alerts);
        assert_eq!(thresholds.min_servings_per_guest, 3.5);
        assert_eq!(thresholds.crowd_size, 30);
    }

    #[test]
    fn sqlite_path() {
        let settings = from_toml(
            r#"
            [server]
            database = { sqlite = "/var/lib/repas/repas.db" }
            "#,
        );
        assert_eq!(
            settings.server.database,
            Database::Sqlite("/var/lib/repas/repas.db".to_string())
        );
    }
}
