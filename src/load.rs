//! Dataset file loading and export.
//!
//! The dataset is published as three JSON files: the item database (map of
//! decimal item ID to record), the item values overlay (map of ID to zeny
//! value, maintained separately so market prices can update without
//! touching item data), and the quest groups file. This module
//! materializes them into the catalog and book the engine consumes, and
//! writes the editable halves back out.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{GroupData, Item, ItemCatalog, ItemId, QuestBook};

pub const ITEMS_FILE: &str = "osromr_items.json";
pub const VALUES_FILE: &str = "osromr_item_values.json";
pub const QUESTS_FILE: &str = "osromr_quests.json";

/// The one fallible surface around the core: dataset files that cannot be
/// read or parsed. Individual malformed references inside a parsed file
/// degrade to placeholders instead.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "dataset file error: {e}"),
            Self::Parse(e) => write!(f, "dataset parse error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QuestsFile {
    #[serde(default)]
    groups: Vec<GroupData>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a dataset directory into the catalog and book. Values merge onto
/// their items; a value for an ID the items file doesn't know creates a
/// stub record with an empty name.
pub fn load_dataset(dir: &Path) -> Result<(ItemCatalog, QuestBook), LoadError> {
    let items: HashMap<ItemId, Item> = read_json(&dir.join(ITEMS_FILE))?;
    let values: HashMap<ItemId, f64> = read_json(&dir.join(VALUES_FILE))?;
    let quests: QuestsFile = read_json(&dir.join(QUESTS_FILE))?;

    let mut catalog = ItemCatalog::from(items);
    for (id, value) in values {
        catalog.set_value(id, value);
    }
    let book = QuestBook::from_groups(quests.groups);
    log::info!(
        "loaded {} items, {} groups, {} quests from {}",
        catalog.len(),
        book.groups.len(),
        book.quest_count(),
        dir.display()
    );
    Ok((catalog, book))
}

/// Write the quest groups file back out in the wire shape.
pub fn save_quests(dir: &Path, book: &QuestBook) -> Result<(), LoadError> {
    let file = QuestsFile {
        groups: book.to_groups(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(dir.join(QUESTS_FILE), json)?;
    Ok(())
}

/// Write the values overlay: only items whose value is set, keyed by ID in
/// ascending order.
pub fn save_values(dir: &Path, catalog: &ItemCatalog) -> Result<(), LoadError> {
    let values: BTreeMap<ItemId, f64> = catalog
        .iter()
        .filter(|(_, item)| item.value > 0.0)
        .map(|(id, item)| (id, item.value))
        .collect();
    let json = serde_json::to_string_pretty(&values)?;
    std::fs::write(dir.join(VALUES_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dataset(dir: &Path, items: &str, values: &str, quests: &str) {
        std::fs::write(dir.join(ITEMS_FILE), items).unwrap();
        std::fs::write(dir.join(VALUES_FILE), values).unwrap();
        std::fs::write(dir.join(QUESTS_FILE), quests).unwrap();
    }

    #[test]
    fn test_load_merges_values_onto_items() {
        let dir = tempfile::TempDir::new().unwrap();
        write_dataset(
            dir.path(),
            r#"{"501": {"name": "Red Potion"}, "502": {"name": "Orange Potion"}}"#,
            r#"{"501": 40, "999": 12000}"#,
            r#"{"groups": []}"#,
        );

        let (catalog, book) = load_dataset(dir.path()).unwrap();
        assert_eq!(catalog.get(ItemId(501)).name, "Red Potion");
        assert_eq!(catalog.get(ItemId(501)).value, 40.0);
        assert_eq!(catalog.get(ItemId(502)).value, 0.0);
        // Value for an unknown ID creates a nameless stub.
        assert!(catalog.contains(ItemId(999)));
        assert_eq!(catalog.get(ItemId(999)).name, "");
        assert_eq!(catalog.get(ItemId(999)).value, 12000.0);
        assert_eq!(book.quest_count(), 0);
    }

    #[test]
    fn test_load_quest_groups() {
        let dir = tempfile::TempDir::new().unwrap();
        write_dataset(
            dir.path(),
            r#"{}"#,
            r#"{}"#,
            r#"{"groups": [{"name": "Weapons", "subgroups": [{"name": "Swords", "quests": [
                {"name": "Blade", "producesId": 1101, "successRate": 80, "accountBound": false,
                 "requirements": [{"type": "zeny", "amount": 500}]}
            ]}]}]}"#,
        );

        let (_, book) = load_dataset(dir.path()).unwrap();
        assert_eq!(book.groups.len(), 1);
        let id = book.find_by_name("Blade").unwrap();
        let quest = book.quest(id).unwrap();
        assert_eq!(quest.produces_id, Some(ItemId(1101)));
        assert_eq!(quest.success_rate, 80);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        match load_dataset(dir.path()) {
            Err(LoadError::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        write_dataset(dir.path(), "not json", "{}", r#"{"groups": []}"#);
        match load_dataset(dir.path()) {
            Err(LoadError::Parse(_)) => {}
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        write_dataset(
            dir.path(),
            r#"{"501": {"name": "Red Potion"}}"#,
            r#"{"501": 40}"#,
            r#"{"groups": [{"name": "Potions", "caption": "Alchemist", "subgroups": [{"name": "Basic", "quests": [
                {"name": "Brew", "producesId": 501, "successRate": 100, "accountBound": true,
                 "requirements": [{"type": "item", "id": 507, "amount": 2, "immune": true},
                                  {"type": "gold", "amount": 1}]}
            ]}]}]}"#,
        );

        let (catalog, book) = load_dataset(dir.path()).unwrap();
        let out = tempfile::TempDir::new().unwrap();
        std::fs::write(out.path().join(ITEMS_FILE), r#"{"501": {"name": "Red Potion"}}"#)
            .unwrap();
        save_quests(out.path(), &book).unwrap();
        save_values(out.path(), &catalog).unwrap();

        let (catalog2, book2) = load_dataset(out.path()).unwrap();
        assert_eq!(book2.to_groups(), book.to_groups());
        assert_eq!(catalog2.get(ItemId(501)).value, 40.0);
    }

    #[test]
    fn test_save_values_skips_unvalued_items() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut catalog = ItemCatalog::new();
        catalog.ensure(ItemId(1), "Free");
        catalog.set_value(ItemId(2), 500.0);
        save_values(dir.path(), &catalog).unwrap();

        let written = std::fs::read_to_string(dir.path().join(VALUES_FILE)).unwrap();
        let values: HashMap<ItemId, f64> = serde_json::from_str(&written).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[&ItemId(2)], 500.0);
    }
}
