//! Raw bundle loading from disk.
//!
//! A section file is a flat TOML table named after its section
//! (`config-network.toml`). Scalar values are kept as their string form;
//! arrays and nested tables are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::raw::{RawData, RawUpdate};
use crate::error::LoadError;

/// File extension of section files.
pub const SECTION_FILE_EXTENSION: &str = "toml";

/// Load one section file. The section name is the file stem.
pub fn load_raw(path: &Path) -> Result<RawUpdate, LoadError> {
    let name = section_name(path).ok_or_else(|| LoadError::InvalidName(path.to_path_buf()))?;
    let content = fs::read_to_string(path)?;
    parse_raw(name, &content)
}

/// Parse section file content into a bundle for `name`.
pub fn parse_raw(name: &str, content: &str) -> Result<RawUpdate, LoadError> {
    let table: toml::Table = toml::from_str(content)?;

    let mut data = RawData::new();
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(LoadError::UnsupportedValue { key });
            }
        };
        data.insert(key, value);
    }

    Ok(RawUpdate::new(name, data))
}

/// Section name for a path, if it is a section file.
pub fn section_name(path: &Path) -> Option<&str> {
    if path.extension()?.to_str()? != SECTION_FILE_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str().filter(|s| !s.is_empty())
}

/// Load every section file in `dir`, sorted by path.
///
/// Files that fail to load are returned with their error so callers can
/// report them without losing the rest.
pub fn load_dir(dir: &Path) -> std::io::Result<Vec<(PathBuf, Result<RawUpdate, LoadError>)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && section_name(path).is_some())
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let loaded = load_raw(&path);
            (path, loaded)
        })
        .collect())
}
