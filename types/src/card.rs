//! Card records as supplied by the external catalog.
//!
//! The core never mutates a [`Card`]; it only buckets cards by [`Rarity`] and
//! hands copies back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Card rarity.
///
/// `Free` cards are part of the catalog but never appear as a rolled pack slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Free,
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Rarities that can occupy a pack slot, lowest first.
    pub const DRAFTABLE: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Free => "FREE",
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }

    pub fn is_draftable(&self) -> bool {
        !matches!(self, Rarity::Free)
    }

    /// True for RARE, EPIC and LEGENDARY.
    pub fn is_rare_or_higher(&self) -> bool {
        matches!(self, Rarity::Rare | Rarity::Epic | Rarity::Legendary)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown rarity: {0}")]
pub struct UnknownRarity(pub String);

impl FromStr for Rarity {
    type Err = UnknownRarity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FREE" => Ok(Rarity::Free),
            "COMMON" => Ok(Rarity::Common),
            "RARE" => Ok(Rarity::Rare),
            "EPIC" => Ok(Rarity::Epic),
            "LEGENDARY" => Ok(Rarity::Legendary),
            _ => Err(UnknownRarity(s.to_string())),
        }
    }
}

/// A single catalog card.
///
/// Field names follow the catalog's camelCase JSON. Display-only fields are
/// optional so partial catalog exports still load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Primary key, e.g. `"CORE_EX1_012"`.
    pub id: String,
    /// Numeric id used by deck codes.
    pub dbf_id: u32,
    #[serde(default)]
    pub name: String,
    /// Missing rarities are treated as COMMON.
    #[serde(default)]
    pub rarity: Option<Rarity>,
    pub card_set: String,
    #[serde(default)]
    pub card_class: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub attack: Option<u32>,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_collectible")]
    pub collectible: bool,
}

fn default_collectible() -> bool {
    true
}

impl Card {
    /// Rarity used for bucketing and pity accounting.
    pub fn effective_rarity(&self) -> Rarity {
        self.rarity.unwrap_or_default()
    }

    pub fn is_legendary(&self) -> bool {
        self.effective_rarity() == Rarity::Legendary
    }
}
