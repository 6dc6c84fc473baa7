use super::{analysis::AnalysisConfig, data::DataConfig, traits::ConfigSection};
use crate::error::PortfolioLabError;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `PORTFOLIO_LAB__ANALYSIS__RISK_FREE_ANNUAL`
pub const ENV_PREFIX: &str = "PORTFOLIO_LAB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PortfolioLabError> {
        self.analysis.validate().map_err(section_error::<AnalysisConfig>)?;
        self.data.validate().map_err(section_error::<DataConfig>)?;
        Ok(())
    }
}

fn section_error<S: ConfigSection>(error: PortfolioLabError) -> PortfolioLabError {
    match error {
        PortfolioLabError::Configuration(msg) => {
            PortfolioLabError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Defaults, then the optional file (TOML or JSON by extension), then
    /// `PORTFOLIO_LAB__*` environment variables.
    pub fn load(&self, path: Option<&Path>) -> Result<(), PortfolioLabError> {
        self.load_with_environment(path, environment())
    }

    fn load_with_environment(
        &self,
        path: Option<&Path>,
        env: Environment,
    ) -> Result<(), PortfolioLabError> {
        let defaults = Config::try_from(&AppConfig::default())
            .map_err(|e| PortfolioLabError::Configuration(format!("Failed to build defaults: {}", e)))?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            if !path.is_file() {
                return Err(PortfolioLabError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let config: AppConfig = builder
            .add_source(env)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| PortfolioLabError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        if let Some(path) = path {
            log::info!("Loaded configuration from {}", path.display());
        }
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PortfolioLabError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| PortfolioLabError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| PortfolioLabError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), PortfolioLabError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = config.clone();
        f(&mut updated);
        updated.validate()?;
        *config = updated;
        Ok(())
    }
}
