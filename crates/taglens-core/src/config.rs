use serde::Deserialize;
use std::path::PathBuf;

use crate::error::CoreError;

// --- Struct Definitions ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PanelConfig {
    /// Optional TOML file with extra parameter-spec entries, merged over the
    /// built-in table at startup.
    pub spec_file: Option<PathBuf>,
}

// --- Loading Logic ---

pub fn load_config(source_path: Option<PathBuf>) -> Result<Config, CoreError> {
    let default_config_name = "taglens_config"; // Base name for config files

    let mut builder = config::Config::builder()
        .set_default("global.log_level", GlobalConfig::default().log_level)
        .map_err(CoreError::Config)?;

    // Load from specified file path if provided
    if let Some(path) = source_path {
        if path.exists() {
            log::debug!("Loading configuration from: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            log::warn!("Specified configuration file not found: {:?}", path);
        }
    } else {
        // Load from the default location if no specific path is given
        log::debug!(
            "Attempting to load configuration from default location ({}.toml)",
            default_config_name
        );
        builder = builder.add_source(config::File::with_name(default_config_name).required(false));
    }

    // Load from environment variables (e.g., TAGLENS_GLOBAL_LOG_LEVEL)
    builder = builder.add_source(
        config::Environment::with_prefix("TAGLENS")
            .separator("_")
            .try_parsing(true),
    );

    // Build and deserialize
    let cfg = builder
        .build()
        .map_err(CoreError::Config)?
        .try_deserialize::<Config>()
        .map_err(CoreError::Config)?;

    log::debug!("Successfully loaded configuration: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file_exists() {
        let cfg = load_config(Some(PathBuf::from("/nonexistent/taglens.toml"))).unwrap();
        assert_eq!(cfg.global.log_level, "info");
        assert!(cfg.panel.spec_file.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[global]\nlog_level = \"debug\"").unwrap();
        writeln!(file, "[panel]\nspec_file = \"specs/extra.toml\"").unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.global.log_level, "debug");
        assert_eq!(cfg.panel.spec_file, Some(PathBuf::from("specs/extra.toml")));
    }
}
