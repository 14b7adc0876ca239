use std::fs;
use std::path::{Path, PathBuf};

use crate::io::kv::FileStore;
use crate::io::logging;
use crate::model::config::SiteConfig;
use crate::model::site::Site;

/// Error type for site discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("not a folio site: no folio/folio.toml found (run `folio init`)")]
    NotASite,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse folio.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit folio.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `folio/folio.toml`.
pub fn discover_site(start: &Path) -> Result<PathBuf, SiteError> {
    let mut current = start.to_path_buf();
    loop {
        let folio_dir = current.join("folio");
        if folio_dir.is_dir() && folio_dir.join("folio.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(SiteError::NotASite);
        }
    }
}

/// Load the site rooted at `root`.
pub fn load_site(root: &Path) -> Result<Site, SiteError> {
    let folio_dir = root.join("folio");
    if !folio_dir.is_dir() {
        return Err(SiteError::NotASite);
    }

    let config_path = folio_dir.join("folio.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| SiteError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: SiteConfig = toml::from_str(&config_text)?;

    Ok(Site {
        root: root.to_path_buf(),
        folio_dir,
        config,
    })
}

/// The durable store under `folio/data/`, salvaging into the recovery log.
pub fn durable_store(site: &Site) -> FileStore {
    FileStore::new(site.data_dir()).with_recovery(&site.folio_dir)
}

/// The CLI's session store under `folio/.session/`.
pub fn session_store(site: &Site) -> FileStore {
    FileStore::new(site.session_dir())
}

/// Start the diagnostic log for `site`. Failure only warns.
pub fn start_logging(site: &Site) {
    let level = logging::resolve_level(site.config.log.level.as_deref());
    if let Err(e) = logging::init_logging(&level, &site.log_dir()) {
        eprintln!("warning: logging disabled: {}", e);
    }
}
