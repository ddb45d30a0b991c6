use crate::config::ExtractorConfig;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Scanner for finding source files below a root directory
pub struct FileScanner {
    root: PathBuf,
    config: ExtractorConfig,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, config: ExtractorConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    /// Scan for source files, sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let filter_config = self.config.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if !self.config.recursive {
            builder.max_depth(Some(1));
        }
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !filter_config.is_skipped_dir(name))
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                        continue;
                    };
                    if !self.config.is_source_file(name) {
                        log::debug!("Skipping {}", path.display());
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files under {}", files.len(), self.root.display());
        files
    }
}
