use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::items::{ItemCatalog, ItemId};

/// Reserved catalog entries that act as tradable currencies. Gold and
/// credits are real items in the game's database; their current zeny worth
/// is whatever the catalog says, looked up fresh on every conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialItems {
    pub credit: ItemId,
    pub gold: ItemId,
}

impl Default for SpecialItems {
    fn default() -> Self {
        Self {
            credit: ItemId(40001),
            gold: ItemId(969),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "questbook")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
}

impl SpecialItems {
    /// Zeny value of one credit: the designated item's catalog value, 0 if
    /// the record is absent.
    pub fn credit_value(&self, catalog: &ItemCatalog) -> f64 {
        catalog.get(self.credit).value
    }

    /// Zeny value of one gold.
    pub fn gold_value(&self, catalog: &ItemCatalog) -> f64 {
        catalog.get(self.gold).value
    }

    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn save(&self) {
        let Some(path) = config_path() else {
            log::warn!("Could not determine config directory");
            return;
        };
        self.save_to(&path);
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config: {e}. Using defaults.");
                    Self::default()
                }
            },
            Err(_) => {
                let config = Self::default();
                config.save_to(path);
                config
            }
        }
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {e}");
                return;
            }
        }

        match toml::to_string_pretty(self) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(path, contents) {
                    log::warn!("Failed to write config: {e}");
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::Item;

    #[test]
    fn test_default_special_items() {
        let special = SpecialItems::default();
        assert_eq!(special.credit, ItemId(40001));
        assert_eq!(special.gold, ItemId(969));
    }

    #[test]
    fn test_unit_values_from_catalog() {
        let special = SpecialItems::default();
        let mut catalog = ItemCatalog::new();
        catalog.insert(
            ItemId(969),
            Item {
                name: "Gold".to_string(),
                value: 124000.0,
                ..Item::default()
            },
        );
        assert_eq!(special.gold_value(&catalog), 124000.0);
        // Credit record absent: converts at 0.
        assert_eq!(special.credit_value(&catalog), 0.0);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let special = SpecialItems {
            credit: ItemId(40002),
            gold: ItemId(970),
        };
        let serialized = toml::to_string_pretty(&special).expect("serialize");
        let deserialized: SpecialItems = toml::from_str(&serialized).expect("deserialize");
        assert_eq!(deserialized, special);
    }

    #[test]
    fn test_load_save_roundtrip_on_disk() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.toml");
        let special = SpecialItems {
            credit: ItemId(123),
            gold: ItemId(456),
        };
        special.save_to(&path);
        assert_eq!(SpecialItems::load_from(&path), special);
    }

    #[test]
    fn test_unparsable_config_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not toml at all {{{{").expect("write");
        assert_eq!(SpecialItems::load_from(&path), SpecialItems::default());
    }

    #[test]
    fn test_missing_config_writes_defaults() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("settings.toml");
        assert_eq!(SpecialItems::load_from(&path), SpecialItems::default());
        assert!(path.exists());
    }
}
