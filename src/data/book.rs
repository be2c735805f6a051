use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use super::items::{ItemCatalog, ItemId};
use super::requirement::Requirement;
use super::session::Session;

new_key_type! {
    /// Stable handle into the quest arena. Generational index via SlotMap —
    /// safe to hold across insertions and removals. This is the identity
    /// used for cycle detection and for producer choices.
    pub struct QuestId;
}

/// A crafting quest: turns its requirement list into one produced item.
/// `produces_id` stays `None` until the quest is configured; such quests
/// never enter the producer index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub name: String,
    #[serde(default)]
    pub produces_id: Option<ItemId>,
    #[serde(default = "default_success_rate")]
    pub success_rate: u8,
    #[serde(default)]
    pub account_bound: bool,
    #[serde(default)]
    pub requirements: SmallVec<[Requirement; 4]>,
}

fn default_success_rate() -> u8 {
    100
}

impl Quest {
    /// Placeholder quest as created by the add operation.
    pub fn new() -> Self {
        Self {
            name: "New Quest".to_string(),
            produces_id: None,
            success_rate: 100,
            account_bound: false,
            requirements: SmallVec::new(),
        }
    }
}

impl Default for Quest {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory subgroup: an ordered run of quest handles.
#[derive(Clone, Debug, Default)]
pub struct Subgroup {
    pub name: String,
    pub quests: Vec<QuestId>,
}

/// In-memory group: named, optionally captioned, ordered subgroups.
#[derive(Clone, Debug, Default)]
pub struct Group {
    pub name: String,
    pub caption: Option<String>,
    pub subgroups: Vec<Subgroup>,
}

/// Wire shape of a subgroup in the quests file: quests inline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubgroupData {
    pub name: String,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

/// Wire shape of a group in the quests file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub subgroups: Vec<SubgroupData>,
}

/// The quest dataset: the group tree plus the arena that owns every quest
/// record. All engine components take `&QuestBook` snapshots; derived
/// structures (producer index, combinations) are rebuilt from the current
/// book on demand and must be treated as stale after any mutation.
#[derive(Clone, Debug, Default)]
pub struct QuestBook {
    pub groups: Vec<Group>,
    quests: SlotMap<QuestId, Quest>,
}

impl QuestBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a book from the wire shape, interning every quest into
    /// the arena in file order.
    pub fn from_groups(data: Vec<GroupData>) -> Self {
        let mut book = Self::new();
        for group_data in data {
            let mut group = Group {
                name: group_data.name,
                caption: group_data.caption,
                subgroups: Vec::with_capacity(group_data.subgroups.len()),
            };
            for sub_data in group_data.subgroups {
                let quests = sub_data
                    .quests
                    .into_iter()
                    .map(|quest| book.quests.insert(quest))
                    .collect();
                group.subgroups.push(Subgroup {
                    name: sub_data.name,
                    quests,
                });
            }
            book.groups.push(group);
        }
        book
    }

    /// Project the book back into the wire shape.
    pub fn to_groups(&self) -> Vec<GroupData> {
        self.groups
            .iter()
            .map(|group| GroupData {
                name: group.name.clone(),
                caption: group.caption.clone(),
                subgroups: group
                    .subgroups
                    .iter()
                    .map(|sub| SubgroupData {
                        name: sub.name.clone(),
                        quests: sub
                            .quests
                            .iter()
                            .filter_map(|&id| self.quests.get(id).cloned())
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn quest(&self, id: QuestId) -> Option<&Quest> {
        self.quests.get(id)
    }

    pub fn quest_mut(&mut self, id: QuestId) -> Option<&mut Quest> {
        self.quests.get_mut(id)
    }

    pub fn quest_count(&self) -> usize {
        self.quests.len()
    }

    /// All quests in display order: group, then subgroup, then quest, each
    /// in sequence order. The producer index preserves this order.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (QuestId, &Quest)> {
        self.groups
            .iter()
            .flat_map(|group| group.subgroups.iter())
            .flat_map(|sub| sub.quests.iter())
            .filter_map(|&id| self.quests.get(id).map(|quest| (id, quest)))
    }

    /// First quest whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<QuestId> {
        self.iter_in_order()
            .find(|(_, quest)| quest.name == name)
            .map(|(id, _)| id)
    }

    /// Position of a quest in the group tree: (group, subgroup, quest)
    /// indices.
    pub fn locate(&self, id: QuestId) -> Option<(usize, usize, usize)> {
        for (gi, group) in self.groups.iter().enumerate() {
            for (si, sub) in group.subgroups.iter().enumerate() {
                if let Some(qi) = sub.quests.iter().position(|&q| q == id) {
                    return Some((gi, si, qi));
                }
            }
        }
        None
    }

    // ----- lifecycle: add -----

    /// Append a new group with placeholder defaults; returns its index.
    pub fn add_group(&mut self) -> usize {
        self.groups.push(Group {
            name: "New Group".to_string(),
            caption: None,
            subgroups: Vec::new(),
        });
        self.groups.len() - 1
    }

    /// Append a new subgroup to a group; returns its index.
    pub fn add_subgroup(&mut self, group: usize) -> Option<usize> {
        let group = self.groups.get_mut(group)?;
        group.subgroups.push(Subgroup {
            name: "New Subgroup".to_string(),
            quests: Vec::new(),
        });
        Some(group.subgroups.len() - 1)
    }

    /// Append a placeholder quest to a subgroup; returns its handle.
    pub fn add_quest(&mut self, group: usize, sub: usize) -> Option<QuestId> {
        // Validate the slot before inserting: a bad index must not leave an
        // orphan record in the arena.
        self.groups.get(group)?.subgroups.get(sub)?;
        let id = self.quests.insert(Quest::new());
        self.groups[group].subgroups[sub].quests.push(id);
        Some(id)
    }

    // ----- lifecycle: delete -----

    /// Remove a quest from its subgroup and the arena, clearing dependent
    /// session state.
    pub fn delete_quest(&mut self, id: QuestId, session: &mut Session) -> bool {
        let Some((gi, si, qi)) = self.locate(id) else {
            return false;
        };
        self.groups[gi].subgroups[si].quests.remove(qi);
        self.quests.remove(id);
        session.forget_quest(id);
        true
    }

    /// Remove a subgroup and every quest it owns.
    pub fn delete_subgroup(&mut self, group: usize, sub: usize, session: &mut Session) -> bool {
        let Some(group) = self.groups.get_mut(group) else {
            return false;
        };
        if sub >= group.subgroups.len() {
            return false;
        }
        let removed = group.subgroups.remove(sub);
        for id in removed.quests {
            self.quests.remove(id);
            session.forget_quest(id);
        }
        true
    }

    /// Remove a group and all its contents.
    pub fn delete_group(&mut self, group: usize, session: &mut Session) -> bool {
        if group >= self.groups.len() {
            return false;
        }
        let removed = self.groups.remove(group);
        for sub in removed.subgroups {
            for id in sub.quests {
                self.quests.remove(id);
                session.forget_quest(id);
            }
        }
        true
    }

    // ----- lifecycle: reorder -----

    /// Swap a group with its neighbor (`delta` of -1 or 1).
    pub fn move_group(&mut self, idx: usize, delta: isize) -> bool {
        let Some(target) = idx.checked_add_signed(delta) else {
            return false;
        };
        if idx >= self.groups.len() || target >= self.groups.len() {
            return false;
        }
        self.groups.swap(idx, target);
        true
    }

    /// Swap a subgroup with its neighbor within the same group.
    pub fn move_subgroup(&mut self, group: usize, idx: usize, delta: isize) -> bool {
        let Some(group) = self.groups.get_mut(group) else {
            return false;
        };
        let Some(target) = idx.checked_add_signed(delta) else {
            return false;
        };
        if idx >= group.subgroups.len() || target >= group.subgroups.len() {
            return false;
        }
        group.subgroups.swap(idx, target);
        true
    }

    // ----- field setters -----

    pub fn set_quest_name(&mut self, id: QuestId, name: &str) {
        if let Some(quest) = self.quests.get_mut(id) {
            quest.name = name.to_string();
        }
    }

    /// Point a quest at the item it produces. When the catalog knows the
    /// item, the quest takes the item's display name, matching how the
    /// editor names quests after their product.
    pub fn set_produces(&mut self, id: QuestId, produces: Option<ItemId>, catalog: &ItemCatalog) {
        let Some(quest) = self.quests.get_mut(id) else {
            return;
        };
        quest.produces_id = produces;
        if let Some(item_id) = produces {
            if catalog.contains(item_id) && !catalog.get(item_id).name.is_empty() {
                quest.name = catalog.get(item_id).display_name();
            }
        }
    }

    /// Success rate is a percentage, clamped to [1, 100].
    pub fn set_success_rate(&mut self, id: QuestId, rate: u8) {
        if let Some(quest) = self.quests.get_mut(id) {
            quest.success_rate = rate.clamp(1, 100);
        }
    }

    pub fn set_account_bound(&mut self, id: QuestId, bound: bool) {
        if let Some(quest) = self.quests.get_mut(id) {
            quest.account_bound = bound;
        }
    }

    /// Append a blank item requirement (amount 1, no item chosen yet).
    pub fn add_requirement(&mut self, id: QuestId) {
        if let Some(quest) = self.quests.get_mut(id) {
            quest.requirements.push(Requirement::Item {
                id: None,
                amount: 1.0,
                immune: false,
            });
        }
    }

    /// Replace one requirement wholesale (the editor rebuilds the record on
    /// any field change, since a kind change rewrites its field set).
    pub fn set_requirement(&mut self, id: QuestId, idx: usize, req: Requirement) -> bool {
        match self.quests.get_mut(id) {
            Some(quest) if idx < quest.requirements.len() => {
                quest.requirements[idx] = req;
                true
            }
            _ => false,
        }
    }

    pub fn remove_requirement(&mut self, id: QuestId, idx: usize) -> bool {
        match self.quests.get_mut(id) {
            Some(quest) if idx < quest.requirements.len() => {
                quest.requirements.remove(idx);
                true
            }
            _ => false,
        }
    }
}
