pub mod book;
pub mod config;
pub mod items;
pub mod requirement;
pub mod session;

pub use book::{Group, GroupData, Quest, QuestBook, QuestId, Subgroup, SubgroupData};
pub use config::SpecialItems;
pub use items::{Item, ItemCatalog, ItemId};
pub use requirement::{PointKind, Requirement, ResourceKey};
pub use session::Session;
