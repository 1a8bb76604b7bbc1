//! Item persistence records
//!
//! Flat, JSON-friendly snapshots of equipment instances. Turning a record
//! back into an instance is up to the save system, which re-resolves base
//! stats through the definition registry.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::{EquipmentInstance, StatMap};

/// Bumped when the record layout changes
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record version {found} is newer than supported version {}", RECORD_VERSION)]
    Version { found: u32 },
}

/// Snapshot of one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub item_id: String,
    pub name: String,
    pub count: u32,
    /// Final stats at the time of saving
    pub stats: StatMap,
    pub enchantments: Vec<String>,
    pub curses: Vec<String>,
    pub identified: bool,
    pub stackable: bool,
}

impl ItemRecord {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl EquipmentInstance {
    /// Snapshot for the save system
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            item_id: self.definition_id().to_string(),
            name: self.display_name(),
            count: self.count(),
            stats: self.final_stats(),
            enchantments: self.enchantments().iter().map(|e| e.kind.name().to_string()).collect(),
            curses: self.curses().iter().map(|c| c.kind.name().to_string()).collect(),
            identified: self.is_identified(),
            stackable: self.is_stackable(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordFile {
    version: u32,
    items: Vec<ItemRecord>,
}

/// Write a batch of records as pretty JSON
pub fn write_records(path: &Path, records: &[ItemRecord]) -> Result<(), RecordError> {
    let file = RecordFile {
        version: RECORD_VERSION,
        items: records.to_vec(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    log::debug!("Wrote {} item record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Read records written by `write_records`
pub fn read_records(path: &Path) -> Result<Vec<ItemRecord>, RecordError> {
    let data = fs::read_to_string(path)?;
    let file: RecordFile = serde_json::from_str(&data)?;
    if file.version > RECORD_VERSION {
        return Err(RecordError::Version { found: file.version });
    }
    Ok(file.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Player;
    use crate::items::{stats, Curse, CurseKind, Enchantment, EnchantmentKind, ItemCategory, ItemDefinition, Rarity};

    fn cursed_blade() -> EquipmentInstance {
        let def = ItemDefinition::new("blade", "Blade", ItemCategory::Weapon, Rarity::Rare)
            .with_stat(stats::DAMAGE, 10.0);
        EquipmentInstance::new(3, &def, 2)
            .with_enchantment(Enchantment::new(EnchantmentKind::Flaming, 1))
            .with_curse(Curse::new(CurseKind::Dullness, 1, true))
    }

    #[test]
    fn test_record_fields() {
        let record = cursed_blade().to_record();
        assert_eq!(record.item_id, "blade");
        assert_eq!(record.name, "Sturdy Weapon");
        assert_eq!(record.stats[stats::DAMAGE], 8.0);
        assert_eq!(record.stats[stats::FIRE_DAMAGE], 3.0);
        assert_eq!(record.enchantments, vec!["Flaming"]);
        assert_eq!(record.curses, vec!["Dullness"]);
        assert!(!record.identified);
        assert!(!record.stackable);
    }

    #[test]
    fn test_identified_record_uses_true_name() {
        let mut item = cursed_blade();
        item.identify(&Player::new(1, "Hero", 10));
        let record = item.to_record();
        assert!(record.identified);
        assert_eq!(record.name, "Dull Flaming Blade");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = cursed_blade().to_record().to_json().unwrap();
        assert!(json.contains("\"itemId\":\"blade\""));
        assert_eq!(ItemRecord::from_json(&json).unwrap(), cursed_blade().to_record());
        assert!(ItemRecord::from_json("{").is_err());
    }

    #[test]
    fn test_write_and_read_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("saves").join("items.json");
        let records = vec![cursed_blade().to_record()];

        write_records(&path, &records).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn test_newer_version_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("items.json");
        fs::write(&path, r#"{"version": 99, "items": []}"#).unwrap();
        assert!(matches!(read_records(&path), Err(RecordError::Version { found: 99 })));
    }
}
