use std::collections::HashSet;

use crate::data::{ItemCatalog, ItemId, QuestBook, QuestId, Requirement, SpecialItems};
use crate::fmt;

use super::index::ProducerIndex;

/// Hard recursion ceiling for the tree walk. Branches are cut here
/// unconditionally, independent of the cycle guard.
pub const MAX_DEPTH: usize = 10;

/// One display line of the material tree. `depth` is the nesting level;
/// indentation and connectors are presentation decoration derived from it.
/// `toggle` carries the node's expand key when the line has descendants the
/// caller can reveal; flipping that key's membership in the expand set and
/// re-walking is how expansion works.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLine {
    pub depth: usize,
    pub text: String,
    pub visible: bool,
    pub toggle: Option<String>,
}

/// Full walk result. Collapsed descendants are still present as invisible
/// lines so node keys stay stable across toggles; filter with
/// [`TreeOutput::visible_lines`] before presenting. `truncated` reports
/// whether any branch was cut by the cycle guard or the depth ceiling;
/// diagnostics only, the default rendering ignores it.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeOutput {
    pub lines: Vec<TreeLine>,
    pub truncated: bool,
}

impl TreeOutput {
    pub fn visible_lines(&self) -> impl Iterator<Item = &TreeLine> {
        self.lines.iter().filter(|line| line.visible)
    }
}

/// Walk a quest's material tree into display lines.
///
/// Requirements of the root emit at depth 0; a requirement whose item has
/// producers descends into the producer (single recipe) or, when expanded,
/// into each competing recipe as its own subtree. Effective amounts carry
/// the product of ancestor requirement quantities. Deterministic for a
/// given book and expand set.
pub fn walk_tree(
    book: &QuestBook,
    catalog: &ItemCatalog,
    index: &ProducerIndex,
    special: &SpecialItems,
    root: QuestId,
    expanded: &HashSet<String>,
) -> TreeOutput {
    let mut walker = Walker {
        book,
        catalog,
        index,
        special,
        expanded,
        lines: Vec::new(),
        path: Vec::new(),
        truncated: false,
    };
    walker.walk(root, 0, 1.0, "", true);

    let mut lines = walker.lines;
    if lines.is_empty() {
        // Zero-requirement quests get an explicit sentinel, not silence.
        lines.push(TreeLine {
            depth: 0,
            text: "No requirements".to_string(),
            visible: true,
            toggle: None,
        });
    }
    TreeOutput {
        lines,
        truncated: walker.truncated,
    }
}

/// Expand set that reveals a quest's whole tree: walk, collect every
/// toggle key, repeat until no new keys appear. Bounded by the depth
/// ceiling. Useful for diagnostics and non-interactive output.
pub fn expand_all(
    book: &QuestBook,
    catalog: &ItemCatalog,
    index: &ProducerIndex,
    special: &SpecialItems,
    root: QuestId,
) -> HashSet<String> {
    let mut expanded = HashSet::new();
    loop {
        let output = walk_tree(book, catalog, index, special, root, &expanded);
        let before = expanded.len();
        expanded.extend(output.lines.into_iter().filter_map(|line| line.toggle));
        if expanded.len() == before {
            return expanded;
        }
    }
}

struct Walker<'a> {
    book: &'a QuestBook,
    catalog: &'a ItemCatalog,
    index: &'a ProducerIndex,
    special: &'a SpecialItems,
    expanded: &'a HashSet<String>,
    lines: Vec<TreeLine>,
    path: Vec<QuestId>,
    truncated: bool,
}

impl Walker<'_> {
    fn walk(
        &mut self,
        quest_id: QuestId,
        depth: usize,
        multiplier: f64,
        parent_key: &str,
        parent_expanded: bool,
    ) {
        if self.path.contains(&quest_id) || depth > MAX_DEPTH {
            self.truncated = true;
            return;
        }
        let Some(quest) = self.book.quest(quest_id) else {
            return;
        };

        self.path.push(quest_id);
        for (req_idx, req) in quest.requirements.iter().enumerate() {
            let effective = req.amount() * multiplier;
            let key = format!("{parent_key}-{depth}-{req_idx}");
            let visible = depth == 0 || parent_expanded;

            match req.item_id() {
                Some(item) if self.index.has_producer(item) => {
                    self.producer_node(item, req.immune(), effective, depth, &key, visible);
                }
                _ => self.leaf(req, effective, depth, visible),
            }
        }
        self.path.pop();
    }

    /// An item requirement some quest produces: one line for the item, then
    /// the producer's own tree underneath (gated by this node's expand
    /// state), or an options fan-out when recipes compete.
    fn producer_node(
        &mut self,
        item: ItemId,
        immune: bool,
        effective: f64,
        depth: usize,
        key: &str,
        visible: bool,
    ) {
        let producers = self.index.producers(item);
        let expanded_here = self.expanded.contains(key);
        let name = self.catalog.display_name(item);
        let badge = if immune { " [IMMUNE]" } else { "" };

        if let [producer] = producers {
            let producer = *producer;
            let has_children = self
                .book
                .quest(producer)
                .is_some_and(|quest| !quest.requirements.is_empty());
            self.lines.push(TreeLine {
                depth,
                text: format!("{name} × {effective}{badge}"),
                visible,
                toggle: has_children.then(|| key.to_string()),
            });
            // Collapsed subtrees still walk: their lines stay invisible but
            // keep node keys stable.
            self.walk(producer, depth + 1, effective, key, expanded_here);
        } else {
            self.lines.push(TreeLine {
                depth,
                text: format!("{name} × {effective}{badge} [{} OPTIONS]", producers.len()),
                visible,
                toggle: Some(key.to_string()),
            });
            if expanded_here {
                for (opt_idx, &producer) in producers.iter().enumerate() {
                    let opt_key = format!("{key}-opt{opt_idx}");
                    if let Some(quest) = self.book.quest(producer) {
                        self.lines.push(TreeLine {
                            depth: depth + 1,
                            text: format!(
                                "Option {}: {} ({}% success)",
                                opt_idx + 1,
                                quest.name,
                                quest.success_rate
                            ),
                            visible: true,
                            toggle: None,
                        });
                    }
                    // Each option is its own child subtree with the same
                    // inherited amount.
                    self.walk(producer, depth + 2, effective, &opt_key, true);
                }
            }
        }
    }

    /// A requirement that resolves no further: raw item, zeny, a tradable
    /// currency, or a point currency.
    fn leaf(&mut self, req: &Requirement, effective: f64, depth: usize, visible: bool) {
        let text = match req {
            Requirement::Zeny { .. } => format!("Zeny × {}", fmt::grouped(effective)),
            Requirement::Credit { .. } => {
                let zeny = effective * self.special.credit_value(self.catalog);
                format!("Credit × {effective} ({} zeny)", fmt::grouped(zeny))
            }
            Requirement::Gold { .. } => {
                let zeny = effective * self.special.gold_value(self.catalog);
                format!("Gold × {effective} ({} zeny)", fmt::grouped(zeny))
            }
            Requirement::Item { id, immune, .. } => {
                let name = match id {
                    Some(item) => self.catalog.display_name(*item),
                    None => "Unknown".to_string(),
                };
                let badge = if *immune { " [IMMUNE]" } else { "" };
                format!("{name} × {effective}{badge}")
            }
            points => {
                let label = points.label().unwrap_or("Points");
                format!("{label} × {effective}")
            }
        };
        self.lines.push(TreeLine {
            depth,
            text,
            visible,
            toggle: None,
        });
    }
}
