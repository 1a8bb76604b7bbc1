//! RON content loader
//!
//! Loads item definitions, loot tables and modifier tables from a content
//! directory, with per-file fallback to the built-in catalog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::catalog::{default_items, default_loot_tables};
use super::registry::{Content, DefinitionRegistry};
use crate::items::ModifierTable;

pub const ITEMS_FILE: &str = "items.ron";
pub const LOOT_TABLES_FILE: &str = "loot_tables.ron";
pub const MODIFIERS_FILE: &str = "modifiers.ron";

/// Errors reading or writing content files
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: ron::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse one RON content file
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a file if present, otherwise (or on error) use the defaults
fn load_or<T: DeserializeOwned>(path: &Path, defaults: impl FnOnce() -> T) -> T {
    if !path.exists() {
        log::debug!("{} not found, using built-in content", path.display());
        return defaults();
    }
    match load_file(path) {
        Ok(loaded) => {
            log::info!("Loaded {}", path.display());
            loaded
        }
        Err(e) => {
            log::warn!("{}. Using built-in content.", e);
            defaults()
        }
    }
}

/// Load everything from a content directory into the registry.
/// Returns how many entries were registered.
pub fn load_content_dir(dir: &Path, registry: &mut DefinitionRegistry) -> usize {
    let items = load_or(&dir.join(ITEMS_FILE), default_items);
    let tables = load_or(&dir.join(LOOT_TABLES_FILE), default_loot_tables);
    let modifiers = load_or(&dir.join(MODIFIERS_FILE), || vec![ModifierTable::default()]);

    let mut content: Vec<Content> = items.into_iter().map(Content::from).collect();
    content.extend(tables.into_iter().map(Content::from));
    content.extend(modifiers.into_iter().map(Content::from));

    let count = content.len();
    registry.extend(content);
    count
}

/// Build a registry from a content directory
pub fn registry_from_dir(dir: &Path) -> DefinitionRegistry {
    let mut registry = DefinitionRegistry::new();
    load_content_dir(dir, &mut registry);
    registry
}

fn write_ron<T: Serialize>(dir: &Path, file: &str, what: &'static str, value: &T) -> Result<(), ContentError> {
    let ron = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|source| ContentError::Serialize { what, source })?;
    let path = dir.join(file);
    fs::write(&path, ron).map_err(|source| ContentError::Write { path, source })
}

/// Export the built-in catalog to RON files for easy editing
pub fn export_default_content(dir: &Path) -> Result<(), ContentError> {
    fs::create_dir_all(dir).map_err(|source| ContentError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    write_ron(dir, ITEMS_FILE, "items", &default_items())?;
    write_ron(dir, LOOT_TABLES_FILE, "loot tables", &default_loot_tables())?;
    write_ron(dir, MODIFIERS_FILE, "modifier tables", &vec![ModifierTable::default()])?;

    log::info!("Exported default content to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::registry::Domain;
    use crate::items::LootTable;
    use tempfile::tempdir;

    #[test]
    fn test_export_then_load() {
        let tmp = tempdir().unwrap();
        // Export creates missing directories
        let dir = tmp.path().join("content");
        let result = export_default_content(&dir);
        assert!(result.is_ok(), "Failed to export default content: {:?}", result.err());

        assert!(dir.join(ITEMS_FILE).exists(), "items.ron not created");
        assert!(dir.join(LOOT_TABLES_FILE).exists(), "loot_tables.ron not created");
        assert!(dir.join(MODIFIERS_FILE).exists(), "modifiers.ron not created");

        let loaded = registry_from_dir(&dir);
        let builtin = DefinitionRegistry::with_defaults();
        assert_eq!(loaded.len(Domain::Item), builtin.len(Domain::Item));
        assert_eq!(loaded.loot_table("chest"), builtin.loot_table("chest"));
        assert_eq!(loaded.item("war_axe"), builtin.item("war_axe"));
    }

    #[test]
    fn test_missing_dir_falls_back() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("missing");
        let registry = registry_from_dir(&dir);
        assert!(registry.len(Domain::Item) > 0);
        assert!(registry.contains(Domain::ModifierTable, ModifierTable::DEFAULT_ID));
    }

    #[test]
    fn test_bad_file_falls_back_per_file() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join(ITEMS_FILE), "this is not ron (").unwrap();
        fs::write(
            dir.join(LOOT_TABLES_FILE),
            r#"[(id: "tiny", entries: [(item_id: "iron_sword", rarity: Common, weight: 1.0)])]"#,
        )
        .unwrap();

        let registry = registry_from_dir(dir);
        // Items came from the catalog, tables from the file
        assert!(registry.item("iron_sword").is_some());
        assert_eq!(registry.loot_table_ids(), vec!["tiny"]);
        let tiny: &LootTable = registry.loot_table("tiny").unwrap();
        assert_eq!(tiny.quantity_multiplier, 1.0);
    }

    #[test]
    fn test_load_file_reports_parse_error() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let path = dir.join(MODIFIERS_FILE);
        fs::write(&path, "[(").unwrap();

        let result: Result<Vec<ModifierTable>, _> = load_file(&path);
        assert!(matches!(result, Err(ContentError::Parse { .. })));
    }
}
