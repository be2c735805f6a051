use std::cmp::Ordering;
use std::collections::HashMap;

use crate::data::{ItemCatalog, QuestBook, QuestId, Requirement, ResourceKey, SpecialItems};

use super::combos::Combination;
use super::index::ProducerIndex;

/// One accumulated resource bucket. `unit_value` is the zeny worth of one
/// unit (item value, currency conversion, 1 for zeny, 0 for points);
/// `slot` is carried for item display.
#[derive(Clone, Debug, PartialEq)]
pub struct TotalEntry {
    pub key: ResourceKey,
    pub name: String,
    pub amount: f64,
    pub unit_value: f64,
    pub slot: u32,
}

/// Aggregation result: leaf-level resource totals and the grand
/// zeny-equivalent cost. Entries are sorted for display: zeny, credit,
/// gold first in that fixed order, then descending amount, ties by
/// case-insensitive name. An empty entry list is a valid state (a quest
/// that resolves to nothing), flagged by [`Totals::is_empty`], not an
/// error. `truncated` reports cycle cuts, as in the tree walker.
#[derive(Clone, Debug, PartialEq)]
pub struct Totals {
    pub entries: Vec<TotalEntry>,
    pub zeny_value: f64,
    pub truncated: bool,
}

impl Totals {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recursively total the leaf requirements of a quest under one producer
/// combination. Item requirements with a producer descend into the chosen
/// quest (the combination's pick, or the first producer when the item is
/// absent from the combination) with the effective amount as the child
/// multiplier; everything else accumulates.
///
/// Termination relies on the identity-path cycle guard alone. Unlike the
/// tree walker there is no depth ceiling, so a non-cyclic but pathologically
/// deep chain is bounded only by the call stack; a ceiling here would
/// silently understate totals.
pub fn aggregate(
    book: &QuestBook,
    catalog: &ItemCatalog,
    index: &ProducerIndex,
    special: &SpecialItems,
    root: QuestId,
    combo: &Combination,
) -> Totals {
    let mut acc = Accumulator::new(book, catalog, special);
    acc.accumulate(root, 1.0, Some((index, combo)));
    acc.finish()
}

/// Total only a quest's own requirement list: no index, no recursion, item
/// requirements count as raw materials even when recipes exist for them.
/// This is the "this quest only" totals mode.
pub fn direct_totals(
    book: &QuestBook,
    catalog: &ItemCatalog,
    special: &SpecialItems,
    root: QuestId,
) -> Totals {
    let mut acc = Accumulator::new(book, catalog, special);
    acc.accumulate(root, 1.0, None);
    acc.finish()
}

struct Accumulator<'a> {
    book: &'a QuestBook,
    catalog: &'a ItemCatalog,
    special: &'a SpecialItems,
    totals: HashMap<ResourceKey, TotalEntry>,
    zeny_value: f64,
    path: Vec<QuestId>,
    truncated: bool,
}

impl<'a> Accumulator<'a> {
    fn new(book: &'a QuestBook, catalog: &'a ItemCatalog, special: &'a SpecialItems) -> Self {
        Self {
            book,
            catalog,
            special,
            totals: HashMap::new(),
            zeny_value: 0.0,
            path: Vec::new(),
            truncated: false,
        }
    }

    fn accumulate(
        &mut self,
        quest_id: QuestId,
        multiplier: f64,
        resolve: Option<(&ProducerIndex, &Combination)>,
    ) {
        if self.path.contains(&quest_id) {
            self.truncated = true;
            return;
        }
        let Some(quest) = self.book.quest(quest_id) else {
            return;
        };

        self.path.push(quest_id);
        for req in &quest.requirements {
            let effective = req.amount() * multiplier;

            let producer = resolve.and_then(|(index, combo)| {
                let item = req.item_id()?;
                let producers = index.producers(item);
                if producers.is_empty() {
                    return None;
                }
                Some(combo.get(&item).copied().unwrap_or(producers[0]))
            });

            match producer {
                Some(chosen) => self.accumulate(chosen, effective, resolve),
                None => self.add_leaf(req, effective),
            }
        }
        self.path.pop();
    }

    fn add_leaf(&mut self, req: &Requirement, effective: f64) {
        let unit_value = self.unit_value(req);
        self.zeny_value += effective * unit_value;

        let (name, slot) = match req.item_id() {
            Some(item) => {
                let record = self.catalog.get(item);
                let name = if record.name.is_empty() {
                    "Unknown".to_string()
                } else {
                    record.name.clone()
                };
                (name, record.slot)
            }
            None => (req.label().unwrap_or("Unknown").to_string(), 0),
        };

        let entry = self.totals.entry(req.key()).or_insert(TotalEntry {
            key: req.key(),
            name,
            amount: 0.0,
            unit_value,
            slot,
        });
        entry.amount += effective;
    }

    fn unit_value(&self, req: &Requirement) -> f64 {
        match req {
            Requirement::Zeny { .. } => 1.0,
            Requirement::Credit { .. } => self.special.credit_value(self.catalog),
            Requirement::Gold { .. } => self.special.gold_value(self.catalog),
            Requirement::Item { id, .. } => {
                id.map(|item| self.catalog.get(item).value).unwrap_or(0.0)
            }
            _ => 0.0,
        }
    }

    fn finish(self) -> Totals {
        let mut entries: Vec<TotalEntry> = self.totals.into_values().collect();
        entries.sort_by(cmp_entries);
        Totals {
            entries,
            zeny_value: self.zeny_value,
            truncated: self.truncated,
        }
    }
}

/// Display order: the three tradable currencies first in their fixed rank,
/// then by descending accumulated amount, ties by case-insensitive name.
/// The final key comparison only makes equal-name, equal-amount entries
/// deterministic.
fn cmp_entries(a: &TotalEntry, b: &TotalEntry) -> Ordering {
    match (a.key.currency_rank(), b.key.currency_rank()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.key.cmp(&b.key)),
    }
}
