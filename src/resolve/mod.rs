pub mod combos;
pub mod index;
pub mod totals;
pub mod walk;

pub use combos::{producer_combinations, ChoiceItem, Combination};
pub use index::ProducerIndex;
pub use totals::{aggregate, direct_totals, TotalEntry, Totals};
pub use walk::{walk_tree, TreeLine, TreeOutput, MAX_DEPTH};
