use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Numeric item key as used by the game's item database.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One item record. `value` is the item's worth in zeny; `slot` is the
/// equip-slot count (0 = none).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub slot: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

fn is_zero(slot: &u32) -> bool {
    *slot == 0
}

impl Item {
    /// Name with the slot count appended (`"Sword [3]"`), or `"Unknown"`
    /// when the record has no name.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            return "Unknown".to_string();
        }
        if self.slot > 0 {
            format!("{} [{}]", self.name, self.slot)
        } else {
            self.name.clone()
        }
    }
}

/// Flat item database. Quests reference items by ID; a referenced ID that
/// has no record resolves to an empty placeholder instead of failing, so
/// the catalog never produces an error on lookup.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemId, Item>,
    placeholder: Item,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ItemId, item: Item) {
        self.items.insert(id, item);
    }

    /// Look up a record; missing IDs yield the `{name: "", value: 0}`
    /// placeholder.
    pub fn get(&self, id: ItemId) -> &Item {
        self.items.get(&id).unwrap_or(&self.placeholder)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display name for an ID, falling back to `"Unknown"` for missing or
    /// unnamed records.
    pub fn display_name(&self, id: ItemId) -> String {
        self.get(id).display_name()
    }

    /// Set an item's zeny value in place, creating a stub record if the ID
    /// is new.
    pub fn set_value(&mut self, id: ItemId, value: f64) {
        self.ensure(id, "").value = value;
    }

    /// Fetch-or-create a record for an ID referenced elsewhere in the
    /// dataset. A non-empty `name` back-fills a stub whose name is still
    /// empty; it never overwrites an existing name.
    pub fn ensure(&mut self, id: ItemId, name: &str) -> &mut Item {
        let item = self.items.entry(id).or_default();
        if item.name.is_empty() && !name.is_empty() {
            item.name = name.to_string();
        }
        item
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter().map(|(&id, item)| (id, item))
    }

    /// All records ordered by name (unnamed records first), the order item
    /// listings present.
    pub fn sorted_by_name(&self) -> Vec<(ItemId, &Item)> {
        let mut all: Vec<(ItemId, &Item)> = self.iter().collect();
        all.sort_by(|(a_id, a), (b_id, b)| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a_id.cmp(b_id))
        });
        all
    }
}

impl From<HashMap<ItemId, Item>> for ItemCatalog {
    fn from(items: HashMap<ItemId, Item>) -> Self {
        Self {
            items,
            placeholder: Item::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_resolves_to_placeholder() {
        let catalog = ItemCatalog::new();
        let item = catalog.get(ItemId(999));
        assert_eq!(item.name, "");
        assert_eq!(item.value, 0.0);
    }

    #[test]
    fn test_display_name_slot_suffix() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(
            ItemId(1),
            Item {
                name: "Sword".to_string(),
                slot: 3,
                ..Item::default()
            },
        );
        catalog.insert(
            ItemId(2),
            Item {
                name: "Apple".to_string(),
                ..Item::default()
            },
        );
        assert_eq!(catalog.display_name(ItemId(1)), "Sword [3]");
        assert_eq!(catalog.display_name(ItemId(2)), "Apple");
        assert_eq!(catalog.display_name(ItemId(3)), "Unknown");
    }

    #[test]
    fn test_set_value_creates_stub() {
        let mut catalog = ItemCatalog::new();
        catalog.set_value(ItemId(5), 40.0);
        assert_eq!(catalog.get(ItemId(5)).value, 40.0);
        assert_eq!(catalog.get(ItemId(5)).name, "");
    }

    #[test]
    fn test_ensure_backfills_empty_name_only() {
        let mut catalog = ItemCatalog::new();
        catalog.ensure(ItemId(7), "Jellopy");
        assert_eq!(catalog.get(ItemId(7)).name, "Jellopy");
        catalog.ensure(ItemId(7), "Other");
        assert_eq!(catalog.get(ItemId(7)).name, "Jellopy");
    }

    #[test]
    fn test_sorted_by_name() {
        let mut catalog = ItemCatalog::new();
        catalog.ensure(ItemId(1), "zeny bag");
        catalog.ensure(ItemId(2), "Apple");
        catalog.ensure(ItemId(3), "apple juice");
        let names: Vec<&str> = catalog
            .sorted_by_name()
            .into_iter()
            .map(|(_, item)| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["Apple", "apple juice", "zeny bag"]);
    }

    #[test]
    fn test_item_serde_omits_defaults() {
        let item = Item {
            name: "Apple".to_string(),
            value: 15.0,
            slot: 0,
            desc: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("slot"));
        assert!(!json.contains("desc"));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
