use serde::{Deserialize, Serialize};

/// Configuration for the external docstring linter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Python interpreter used to run the linter module
    pub interpreter: String,

    /// Linter module, run as `<interpreter> -m <module>`
    pub module: String,

    /// Extra arguments placed before the target path
    pub args: Vec<String>,

    /// Code prefixes classified as errors; any other block is a warning
    pub error_prefixes: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            module: "pydocstyle".to_string(),
            args: Vec::new(),
            error_prefixes: vec!["D1".to_string()],
        }
    }
}

impl ValidatorConfig {
    /// Every reported block is an error
    pub fn strict() -> Self {
        Self {
            error_prefixes: vec!["D".to_string()],
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.interpreter.trim().is_empty() {
            return Err("interpreter must not be empty".to_string());
        }

        if self.module.trim().is_empty() {
            return Err("module must not be empty".to_string());
        }

        if self.error_prefixes.iter().any(|p| p.is_empty()) {
            return Err("error_prefixes must not contain empty prefixes".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ValidatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.module, "pydocstyle");
        assert_eq!(config.error_prefixes, vec!["D1".to_string()]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ValidatorConfig::strict();
        assert!(config.validate().is_ok());

        config.error_prefixes.push(String::new());
        assert!(config.validate().is_err());

        let config = ValidatorConfig {
            interpreter: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
