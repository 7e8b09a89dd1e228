//! Rarity slots for a single pack.

use crate::config::{PackConfig, PACK_SIZE};
use crate::weighted::weighted_choice;
use hearthpack_types::Rarity;
use rand::Rng;

/// Rarities eligible for the fifth-slot upgrade, highest first.
const UPGRADE_RARITIES: [Rarity; 3] = [Rarity::Legendary, Rarity::Epic, Rarity::Rare];

/// Decides the rarity of each slot in a pack.
///
/// The first `PACK_SIZE - 1` slots are drawn independently from the full
/// table. The last slot is, in priority order: a forced LEGENDARY when
/// requested and none was rolled; an upgrade drawn from RARE and above when
/// the guarantee is on and every earlier slot is COMMON; otherwise a normal
/// draw.
#[derive(Clone, Debug)]
pub struct RarityAnalyzer {
    rarities: Vec<Rarity>,
    weights: Vec<f64>,
    upgrade_weights: [f64; 3],
    guarantee_rare_or_higher: bool,
}

impl RarityAnalyzer {
    /// Build from a validated configuration.
    pub fn new(config: &PackConfig) -> Self {
        let upgrade_total: f64 = UPGRADE_RARITIES.iter().map(|r| config.weight_of(*r)).sum();
        let upgrade_weights = if upgrade_total > 0.0 {
            UPGRADE_RARITIES.map(|r| config.weight_of(r) / upgrade_total)
        } else {
            [0.0; 3]
        };
        Self {
            rarities: config.rates.iter().map(|row| row.rarity).collect(),
            weights: config.rates.iter().map(|row| row.weight).collect(),
            upgrade_weights,
            guarantee_rare_or_higher: config.guarantee_rare_or_higher,
        }
    }

    pub fn determine_pack_rarities<R>(&self, force_legendary: bool, rng: &mut R) -> [Rarity; PACK_SIZE]
    where
        R: Rng + ?Sized,
    {
        let mut slots = [Rarity::Common; PACK_SIZE];
        let (head, last) = slots.split_at_mut(PACK_SIZE - 1);
        for slot in head.iter_mut() {
            *slot = self.draw(rng);
        }

        let has_legendary = head.contains(&Rarity::Legendary);
        let has_rare_or_higher = head.iter().any(Rarity::is_rare_or_higher);

        last[0] = if force_legendary && !has_legendary {
            Rarity::Legendary
        } else if self.guarantee_rare_or_higher && !has_rare_or_higher {
            self.draw_upgrade(rng)
        } else {
            self.draw(rng)
        };
        slots
    }

    /// One draw from the full table.
    pub fn draw<R>(&self, rng: &mut R) -> Rarity
    where
        R: Rng + ?Sized,
    {
        // The table is validated non-empty; COMMON is only reachable for an
        // analyzer built from an unvalidated config.
        weighted_choice(&self.rarities, &self.weights, rng)
            .copied()
            .unwrap_or(Rarity::Common)
    }

    /// One draw restricted to RARE and above, renormalized. Falls back to RARE
    /// when none of them carries weight.
    fn draw_upgrade<R>(&self, rng: &mut R) -> Rarity
    where
        R: Rng + ?Sized,
    {
        if self.upgrade_weights.iter().all(|w| *w <= 0.0) {
            return Rarity::Rare;
        }
        weighted_choice(&UPGRADE_RARITIES, &self.upgrade_weights, rng)
            .copied()
            .unwrap_or(Rarity::Rare)
    }
}
