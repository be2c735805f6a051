use std::collections::HashMap;

use crate::data::{ItemId, QuestBook, QuestId};

/// Mapping from produced item ID to the quests that produce it, in
/// first-seen display order (group, then subgroup, then quest). Quests
/// with no configured product are not indexed.
///
/// The index is derived, never cached: it is a pure function of the book
/// it was built from and goes stale the moment the book is mutated.
/// Rebuild before every resolution pass.
pub struct ProducerIndex {
    by_item: HashMap<ItemId, Vec<QuestId>>,
}

impl ProducerIndex {
    pub fn build(book: &QuestBook) -> Self {
        let mut by_item: HashMap<ItemId, Vec<QuestId>> = HashMap::new();
        for (id, quest) in book.iter_in_order() {
            if let Some(item) = quest.produces_id {
                by_item.entry(item).or_default().push(id);
            }
        }
        Self { by_item }
    }

    /// Producing quests for an item, in index order. Empty for items
    /// nothing produces.
    pub fn producers(&self, item: ItemId) -> &[QuestId] {
        self.by_item.get(&item).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_producer(&self, item: ItemId) -> bool {
        !self.producers(item).is_empty()
    }

    /// True when the item needs a producer choice (two or more recipes).
    pub fn is_multi(&self, item: ItemId) -> bool {
        self.producers(item).len() >= 2
    }

    /// Number of distinct produced items.
    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GroupData, Quest, SubgroupData};

    fn quest(name: &str, produces: Option<u32>) -> Quest {
        Quest {
            name: name.to_string(),
            produces_id: produces.map(ItemId),
            ..Quest::new()
        }
    }

    fn book(quests: Vec<Quest>) -> QuestBook {
        QuestBook::from_groups(vec![GroupData {
            name: "G".to_string(),
            caption: None,
            subgroups: vec![SubgroupData {
                name: "S".to_string(),
                quests,
            }],
        }])
    }

    #[test]
    fn test_every_configured_quest_indexed_once_in_order() {
        let book = book(vec![
            quest("A", Some(10)),
            quest("B", Some(20)),
            quest("C", Some(10)),
        ]);
        let index = ProducerIndex::build(&book);

        let names: Vec<&str> = index
            .producers(ItemId(10))
            .iter()
            .map(|&id| book.quest(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(index.producers(ItemId(20)).len(), 1);
        assert_eq!(index.item_count(), 2);

        let total: usize = [10, 20]
            .into_iter()
            .map(|item| index.producers(ItemId(item)).len())
            .sum();
        assert_eq!(total, book.quest_count());
    }

    #[test]
    fn test_unconfigured_quests_excluded() {
        let book = book(vec![quest("A", Some(10)), quest("Draft", None)]);
        let index = ProducerIndex::build(&book);
        assert_eq!(index.item_count(), 1);
        assert!(index.has_producer(ItemId(10)));
    }

    #[test]
    fn test_multi_detection() {
        let book = book(vec![
            quest("A", Some(10)),
            quest("B", Some(10)),
            quest("C", Some(20)),
        ]);
        let index = ProducerIndex::build(&book);
        assert!(index.is_multi(ItemId(10)));
        assert!(!index.is_multi(ItemId(20)));
        assert!(!index.is_multi(ItemId(99)));
    }

    #[test]
    fn test_unknown_item_empty() {
        let book = book(vec![]);
        let index = ProducerIndex::build(&book);
        assert!(index.producers(ItemId(1)).is_empty());
        assert!(!index.has_producer(ItemId(1)));
    }
}
