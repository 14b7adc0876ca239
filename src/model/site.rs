use std::path::PathBuf;

use super::config::SiteConfig;

/// A discovered folio site
#[derive(Debug, Clone)]
pub struct Site {
    /// Root directory of the site (parent of `folio/`)
    pub root: PathBuf,
    /// Path to the `folio/` directory
    pub folio_dir: PathBuf,
    /// Parsed folio.toml
    pub config: SiteConfig,
}

impl Site {
    /// Directory backing the durable key-value store
    pub fn data_dir(&self) -> PathBuf {
        self.folio_dir.join("data")
    }

    /// Directory backing the CLI session store
    pub fn session_dir(&self) -> PathBuf {
        self.folio_dir.join(".session")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.folio_dir.join("logs")
    }

    pub fn config_path(&self) -> PathBuf {
        self.folio_dir.join("folio.toml")
    }
}
