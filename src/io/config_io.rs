use std::path::Path;

use crate::io::recovery::atomic_write;
use crate::io::site_io::SiteError;
use crate::model::config::SiteConfig;

/// Error type for `folio config` edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config key: {0:?} (expected dotted path like dashboard.week_start)")]
    InvalidKey(String),
    #[error("{key} is not a table")]
    NotATable { key: String },
    #[error("resulting config is invalid: {0}")]
    Invalid(#[from] toml::de::Error),
    #[error(transparent)]
    Site(#[from] SiteError),
}

/// Read folio.toml, returning both the parsed config and the raw
/// toml_edit document for comment-preserving edits.
pub fn read_config(folio_dir: &Path) -> Result<(SiteConfig, toml_edit::DocumentMut), SiteError> {
    let config_path = folio_dir.join("folio.toml");
    let config_text = std::fs::read_to_string(&config_path).map_err(|e| SiteError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: SiteConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the document back, preserving formatting.
pub fn write_config(folio_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), SiteError> {
    let config_path = folio_dir.join("folio.toml");
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| SiteError::ReadError {
        path: config_path,
        source: e,
    })
}

/// Set a dotted key (e.g. `ui.colors.accent`) to `raw`.
///
/// `true`/`false` become booleans and integers become integers; anything
/// else is stored as a string. Intermediate tables are created as needed.
/// The edited document must still parse as a [`SiteConfig`].
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    dotted_key: &str,
    raw: &str,
) -> Result<SiteConfig, ConfigError> {
    let parts: Vec<&str> = dotted_key.split('.').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidKey(dotted_key.to_string()));
    }
    let Some((last, tables)) = parts.split_last() else {
        return Err(ConfigError::InvalidKey(dotted_key.to_string()));
    };

    let mut table: &mut toml_edit::Table = doc.as_table_mut();
    let mut path = String::new();
    for part in tables {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(part);
        if !table.contains_key(part) {
            let mut new_table = toml_edit::Table::new();
            new_table.set_implicit(false);
            table.insert(part, toml_edit::Item::Table(new_table));
        }
        table = table
            .get_mut(part)
            .and_then(|item| item.as_table_mut())
            .ok_or_else(|| ConfigError::NotATable { key: path.clone() })?;
    }

    table[*last] = toml_edit::value(parse_scalar(raw));
    let config: SiteConfig = toml::from_str(&doc.to_string())?;
    Ok(config)
}

fn parse_scalar(raw: &str) -> toml_edit::Value {
    match raw {
        "true" => true.into(),
        "false" => false.into(),
        _ => match raw.parse::<i64>() {
            Ok(n) => n.into(),
            Err(_) => raw.into(),
        },
    }
}
