use serde::{Deserialize, Serialize};

use super::items::ItemId;

/// Point-denominated server currencies. Earned through play, never
/// convertible to zeny, so they carry no unit value in aggregation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Vote,
    Activity,
    Hourly,
    MonsterArena,
    Otherworld,
    HallOfHeritage,
    Event,
}

impl PointKind {
    pub fn all() -> &'static [PointKind] {
        use PointKind::*;
        &[
            Vote,
            Activity,
            Hourly,
            MonsterArena,
            Otherworld,
            HallOfHeritage,
            Event,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vote => "Vote Points",
            Self::Activity => "Activity Points",
            Self::Hourly => "Hourly Points",
            Self::MonsterArena => "Monster Arena Points",
            Self::Otherworld => "Otherworld Points",
            Self::HallOfHeritage => "Hall of Heritage Points",
            Self::Event => "Event Points",
        }
    }
}

/// One cost entry on a quest. The wire format tags each record with `type`
/// and each kind carries only the fields it uses: `id` and `immune` exist
/// on item requirements alone. `id` is nullable while a requirement is
/// still being edited; `immune` is a display-only flag with no effect on
/// aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    Item {
        #[serde(default)]
        id: Option<ItemId>,
        #[serde(default)]
        amount: f64,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        immune: bool,
    },
    Zeny {
        #[serde(default)]
        amount: f64,
    },
    Gold {
        #[serde(default)]
        amount: f64,
    },
    Credit {
        #[serde(default)]
        amount: f64,
    },
    VotePoints {
        #[serde(default)]
        amount: f64,
    },
    ActivityPoints {
        #[serde(default)]
        amount: f64,
    },
    HourlyPoints {
        #[serde(default)]
        amount: f64,
    },
    MonsterArenaPoints {
        #[serde(default)]
        amount: f64,
    },
    OtherworldPoints {
        #[serde(default)]
        amount: f64,
    },
    HallOfHeritagePoints {
        #[serde(default)]
        amount: f64,
    },
    EventPoints {
        #[serde(default)]
        amount: f64,
    },
}

impl Requirement {
    /// Convenience constructor for the common case.
    pub fn item(id: ItemId, amount: f64) -> Self {
        Self::Item {
            id: Some(id),
            amount,
            immune: false,
        }
    }

    /// Base amount with the numeric guard applied: a non-finite amount
    /// counts as 0 so multiplied totals stay numeric.
    pub fn amount(&self) -> f64 {
        let amount = match self {
            Self::Item { amount, .. }
            | Self::Zeny { amount }
            | Self::Gold { amount }
            | Self::Credit { amount }
            | Self::VotePoints { amount }
            | Self::ActivityPoints { amount }
            | Self::HourlyPoints { amount }
            | Self::MonsterArenaPoints { amount }
            | Self::OtherworldPoints { amount }
            | Self::HallOfHeritagePoints { amount }
            | Self::EventPoints { amount } => *amount,
        };
        if amount.is_finite() {
            amount
        } else {
            0.0
        }
    }

    /// The referenced item ID, for item requirements that have one.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Item { id, .. } => *id,
            _ => None,
        }
    }

    pub fn immune(&self) -> bool {
        matches!(self, Self::Item { immune: true, .. })
    }

    pub fn point_kind(&self) -> Option<PointKind> {
        match self {
            Self::VotePoints { .. } => Some(PointKind::Vote),
            Self::ActivityPoints { .. } => Some(PointKind::Activity),
            Self::HourlyPoints { .. } => Some(PointKind::Hourly),
            Self::MonsterArenaPoints { .. } => Some(PointKind::MonsterArena),
            Self::OtherworldPoints { .. } => Some(PointKind::Otherworld),
            Self::HallOfHeritagePoints { .. } => Some(PointKind::HallOfHeritage),
            Self::EventPoints { .. } => Some(PointKind::Event),
            _ => None,
        }
    }

    /// Resource bucket this requirement accumulates into.
    pub fn key(&self) -> ResourceKey {
        match self {
            Self::Item { id, .. } => ResourceKey::Item(*id),
            Self::Zeny { .. } => ResourceKey::Zeny,
            Self::Credit { .. } => ResourceKey::Credit,
            Self::Gold { .. } => ResourceKey::Gold,
            _ => ResourceKey::Points(self.point_kind().unwrap_or(PointKind::Event)),
        }
    }

    /// Display label for non-item kinds. Item names come from the catalog.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Item { .. } => None,
            Self::Zeny { .. } => Some("Zeny"),
            Self::Gold { .. } => Some("Gold"),
            Self::Credit { .. } => Some("Credit"),
            _ => self.point_kind().map(|k| k.label()),
        }
    }
}

/// Bucket key for aggregated totals: one per resource kind, plus one per
/// distinct item ID. The derived ordering puts the three tradable
/// currencies first, in the fixed zeny, credit, gold display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKey {
    Zeny,
    Credit,
    Gold,
    Points(PointKind),
    /// `None` for an item requirement still being edited (no ID chosen).
    Item(Option<ItemId>),
}

impl ResourceKey {
    /// Fixed display rank for tradable currencies; `None` for everything
    /// else.
    pub fn currency_rank(&self) -> Option<u8> {
        match self {
            Self::Zeny => Some(0),
            Self::Credit => Some(1),
            Self::Gold => Some(2),
            _ => None,
        }
    }
}
