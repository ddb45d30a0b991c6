use anyhow::{anyhow, Context, Result};
use docscope_docgen::GeneratorConfig;
use docscope_extractor::ExtractorConfig;
use docscope_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "docscope.toml";

/// Contents of `docscope.toml`; every table is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub extractor: ExtractorConfig,
    pub generator: GeneratorConfig,
    pub validator: ValidatorConfig,
}

impl AppConfig {
    /// Load an explicit config file, else `docscope.toml` if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .map_err(|e| anyhow!("[extractor] {e}"))?;
        self.validator
            .validate()
            .map_err(|e| anyhow!("[validator] {e}"))?;
        Ok(())
    }
}
