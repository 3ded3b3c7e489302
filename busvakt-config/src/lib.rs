//! # Busvakt Configuration System
//!
//! Hierarchical configuration for the monitoring runtime.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of intervals, thresholds, and pools
//! - **Environment Awareness**: File plus `BUSVAKT_*` environment overrides

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod monitor;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use monitor::FlowMonitorConfig;
pub use monitor::RuntimeMonitorConfig;
pub use monitor::ThresholdConfig;
pub use monitor::WorkerPoolConfig;
pub use telemetry::TelemetryConfig;

/// Top-level configuration container for all busvakt components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct BusvaktConfig {
    /// Message-flow monitor (interval, alert thresholds).
    #[validate(nested)]
    pub flow: FlowMonitorConfig,

    /// Runtime monitor (interval, thread pattern, pool descriptors).
    #[validate(nested)]
    pub runtime: RuntimeMonitorConfig,

    /// Telemetry and observability configuration.
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl BusvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/busvakt.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `BUSVAKT_*` environment variables (`__` separates nesting).
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(BusvaktConfig::default()));

        if Path::new("config/busvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/busvakt.yaml"));
        } else {
            println!("config/busvakt.yaml not found, using default configuration");
        }

        let env = std::env::var("BUSVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("BUSVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(BusvaktConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("BUSVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
