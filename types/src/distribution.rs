//! Rarity tallies for opened packs.

use crate::card::{Card, Rarity};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Count of draftable rarities in a pack or a batch of packs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RarityDistribution {
    pub common: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
}

impl RarityDistribution {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut dist = Self::default();
        for card in cards {
            dist.record(card.effective_rarity());
        }
        dist
    }

    /// Count one card. FREE is not tallied.
    pub fn record(&mut self, rarity: Rarity) {
        match rarity {
            Rarity::Common => self.common += 1,
            Rarity::Rare => self.rare += 1,
            Rarity::Epic => self.epic += 1,
            Rarity::Legendary => self.legendary += 1,
            Rarity::Free => {}
        }
    }

    pub fn get(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
            Rarity::Free => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.common + self.rare + self.epic + self.legendary
    }
}

impl AddAssign for RarityDistribution {
    fn add_assign(&mut self, rhs: Self) {
        self.common += rhs.common;
        self.rare += rhs.rare;
        self.epic += rhs.epic;
        self.legendary += rhs.legendary;
    }
}
