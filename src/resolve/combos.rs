use std::collections::{HashMap, HashSet};

use crate::data::{ItemId, QuestBook, QuestId};

use super::index::ProducerIndex;

/// One consistent choice of producing quest for every multi-producer item
/// in a root quest's closure. Items absent from the map default to their
/// first producer during aggregation.
pub type Combination = HashMap<ItemId, QuestId>;

/// An item with competing recipes, discovered in a root quest's transitive
/// closure. Producers are in index (display) order.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceItem {
    pub item: ItemId,
    pub producers: Vec<QuestId>,
}

/// Find every multi-producer item in the root's closure, in first-seen
/// order. Discovery itself does not branch: nested choice items are
/// searched through the *first* producer only. Termination comes from the
/// identity-path cycle guard alone; there is no depth ceiling here.
pub fn find_choice_items(
    book: &QuestBook,
    index: &ProducerIndex,
    root: QuestId,
) -> Vec<ChoiceItem> {
    let mut found = Vec::new();
    let mut seen: HashSet<ItemId> = HashSet::new();
    let mut path: Vec<QuestId> = Vec::new();
    scan(book, index, root, &mut path, &mut seen, &mut found);
    found
}

fn scan(
    book: &QuestBook,
    index: &ProducerIndex,
    quest_id: QuestId,
    path: &mut Vec<QuestId>,
    seen: &mut HashSet<ItemId>,
    found: &mut Vec<ChoiceItem>,
) {
    if path.contains(&quest_id) {
        return;
    }
    let Some(quest) = book.quest(quest_id) else {
        return;
    };

    path.push(quest_id);
    for req in &quest.requirements {
        let Some(item) = req.item_id() else {
            continue;
        };
        let producers = index.producers(item);
        if producers.is_empty() {
            continue;
        }
        if producers.len() > 1 && seen.insert(item) {
            found.push(ChoiceItem {
                item,
                producers: producers.to_vec(),
            });
        }
        scan(book, index, producers[0], path, seen, found);
    }
    path.pop();
}

/// Cartesian product over the discovered choice items: one combination per
/// way of picking a producer for every item, the first-discovered item
/// varying slowest. No choice items yield exactly one empty combination.
///
/// The combination count is the product of producer counts, which grows
/// multiplicatively with each choice item. That is a known scaling limit:
/// nothing here caps or truncates the enumeration.
pub fn combinations(choice_items: &[ChoiceItem]) -> Vec<Combination> {
    let mut combos: Vec<Combination> = vec![Combination::new()];
    for choice in choice_items {
        let mut next = Vec::with_capacity(combos.len() * choice.producers.len());
        for combo in &combos {
            for &producer in &choice.producers {
                let mut extended = combo.clone();
                extended.insert(choice.item, producer);
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}

/// Convenience: discovery plus enumeration for a root quest.
pub fn producer_combinations(
    book: &QuestBook,
    index: &ProducerIndex,
    root: QuestId,
) -> Vec<Combination> {
    combinations(&find_choice_items(book, index, root))
}
