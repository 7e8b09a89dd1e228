//! Batch draw results.

use hearthpack_types::{Card, RarityDistribution};
use serde::Serialize;

/// One opened pack.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    /// 1-based position within the batch.
    pub pack_id: u32,
    pub cards: Vec<Card>,
    pub rarity_distribution: RarityDistribution,
}

/// Result of opening several packs of one set.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawReport {
    pub set_id: String,
    pub packs_opened: u32,
    pub total_cards: u32,
    pub packs: Vec<PackResult>,
    pub total_rarity_distribution: RarityDistribution,
}

impl DrawReport {
    pub(crate) fn new(set_id: &str) -> Self {
        Self {
            set_id: set_id.to_string(),
            packs_opened: 0,
            total_cards: 0,
            packs: Vec::new(),
            total_rarity_distribution: RarityDistribution::default(),
        }
    }

    pub(crate) fn push(&mut self, cards: Vec<Card>) {
        let rarity_distribution = RarityDistribution::from_cards(&cards);
        self.packs_opened += 1;
        self.total_cards += cards.len() as u32;
        self.total_rarity_distribution += rarity_distribution;
        self.packs.push(PackResult {
            pack_id: self.packs_opened,
            cards,
            rarity_distribution,
        });
    }

    /// Every card across the batch, in draw order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.packs.iter().flat_map(|p| p.cards.iter())
    }
}
