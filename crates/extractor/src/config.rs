use serde::{Deserialize, Serialize};

/// Configuration for source extraction and directory scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,

    /// Files whose name starts with this prefix are skipped (empty = keep all)
    pub skip_file_prefix: String,

    /// File extensions treated as source units
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Width of one indentation unit, added to a definition's column
    pub indent_width: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|d| (*d).to_string()).collect(),
            skip_file_prefix: "__".to_string(),
            extensions: vec!["py".to_string()],
            recursive: true,
            indent_width: 4,
        }
    }
}

impl ExtractorConfig {
    /// Only the files directly inside the scanned directory
    pub fn shallow() -> Self {
        Self {
            recursive: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("extensions must not be empty".to_string());
        }

        if self.extensions.iter().any(|ext| ext.starts_with('.')) {
            return Err("extensions are given without a leading dot".to_string());
        }

        if self.indent_width == 0 {
            return Err("indent_width must be > 0".to_string());
        }

        Ok(())
    }

    pub(crate) fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|dir| dir == name)
    }

    pub(crate) fn is_source_file(&self, name: &str) -> bool {
        if !self.skip_file_prefix.is_empty() && name.starts_with(&self.skip_file_prefix) {
            return false;
        }

        name.rsplit_once('.')
            .is_some_and(|(_, ext)| self.extensions.iter().any(|candidate| candidate == ext))
    }
}

/// Version control, virtual environment and bytecode cache directories
const DEFAULT_SKIP_DIRS: &[&str] = &["venv", ".venv", "__pycache__", ".git"];
