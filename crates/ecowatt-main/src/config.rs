// Copyright (c) 2025 ECOWATT LABS S.R.O.
//
// This file is part of EcoWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@ecowatt-labs.cz

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ecowatt_types::EcowattConfig;

/// Load configuration from a TOML file, falling back to the built-in
/// defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<EcowattConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(EcowattConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: EcowattConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/ecowatt.toml")).expect("fallback");
        assert_eq!(config.optimizer.training_episodes, 300);
    }

    #[test]
    fn test_loads_overrides_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ecowatt.toml");
        std::fs::write(
            &path,
            r#"
            [optimizer]
            training_episodes = 42

            [simulator]
            history_days = 7
            "#,
        )
        .expect("write config");

        let config = load_config(&path).expect("load");
        assert_eq!(config.optimizer.training_episodes, 42);
        assert_eq!(config.simulator.history_days, 7);
        assert_eq!(config.server.port, 8000, "untouched sections keep defaults");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ecowatt.toml");
        std::fs::write(&path, "not valid [ toml").expect("write config");
        assert!(load_config(&path).is_err());
    }
}
