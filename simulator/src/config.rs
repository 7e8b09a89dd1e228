//! Drop rates and guarantee policies.
//!
//! Three policies can be toggled independently:
//! - rare-or-higher guarantee: the fifth slot is upgraded when the first four
//!   are all COMMON.
//! - early legendary guarantee: the Nth pack of a set forces a legendary if
//!   none has been drawn yet.
//! - steady-state pity: once a set has produced a legendary, a legendary is
//!   forced after this many consecutive packs without one.

use hearthpack_types::Rarity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards per pack.
pub const PACK_SIZE: usize = 5;

pub const DEFAULT_EARLY_LEGENDARY_PACK: u32 = 10;
pub const DEFAULT_LEGENDARY_PITY: u32 = 40;
pub const DEFAULT_MAX_PACKS_PER_DRAW: u32 = 500;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("rarity table is empty")]
    EmptyRates,

    #[error("rarity {rarity} has invalid weight {weight}")]
    InvalidWeight { rarity: Rarity, weight: f64 },

    #[error("rarity {0} is not draftable")]
    NotDraftable(Rarity),

    #[error("rarity {0} appears more than once")]
    DuplicateRarity(Rarity),

    #[error("rarity weights sum to zero")]
    ZeroTotalWeight,

    #[error("{field} must be greater than zero")]
    ZeroThreshold { field: &'static str },
}

/// One row of the drop-rate table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: Rarity,
    pub weight: f64,
}

impl RarityWeight {
    pub const fn new(rarity: Rarity, weight: f64) -> Self {
        Self { rarity, weight }
    }
}

/// Default per-slot probabilities.
pub const DEFAULT_RATES: [RarityWeight; 4] = [
    RarityWeight::new(Rarity::Common, 0.7162),
    RarityWeight::new(Rarity::Rare, 0.2266),
    RarityWeight::new(Rarity::Epic, 0.0448),
    RarityWeight::new(Rarity::Legendary, 0.0124),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Ordered rarity table; bands are laid out in this order.
    pub rates: Vec<RarityWeight>,
    pub guarantee_rare_or_higher: bool,
    /// Pack number that forces the first legendary (`None` disables).
    pub early_legendary_pack: Option<u32>,
    /// Packs without a legendary before one is forced (`None` disables).
    pub legendary_pity: Option<u32>,
    pub max_packs_per_draw: u32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES.to_vec(),
            guarantee_rare_or_higher: true,
            early_legendary_pack: Some(DEFAULT_EARLY_LEGENDARY_PACK),
            legendary_pity: Some(DEFAULT_LEGENDARY_PITY),
            max_packs_per_draw: DEFAULT_MAX_PACKS_PER_DRAW,
        }
    }
}

impl PackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rates.is_empty() {
            return Err(ConfigError::EmptyRates);
        }
        let mut seen = Vec::with_capacity(self.rates.len());
        let mut total = 0.0;
        for row in &self.rates {
            if !row.rarity.is_draftable() {
                return Err(ConfigError::NotDraftable(row.rarity));
            }
            if seen.contains(&row.rarity) {
                return Err(ConfigError::DuplicateRarity(row.rarity));
            }
            seen.push(row.rarity);
            if !row.weight.is_finite() || row.weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    rarity: row.rarity,
                    weight: row.weight,
                });
            }
            total += row.weight;
        }
        if total <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        if self.early_legendary_pack == Some(0) {
            return Err(ConfigError::ZeroThreshold {
                field: "early_legendary_pack",
            });
        }
        if self.legendary_pity == Some(0) {
            return Err(ConfigError::ZeroThreshold {
                field: "legendary_pity",
            });
        }
        if self.max_packs_per_draw == 0 {
            return Err(ConfigError::ZeroThreshold {
                field: "max_packs_per_draw",
            });
        }
        Ok(())
    }

    /// Weight configured for `rarity`, zero when absent.
    pub fn weight_of(&self, rarity: Rarity) -> f64 {
        self.rates
            .iter()
            .find(|row| row.rarity == rarity)
            .map_or(0.0, |row| row.weight)
    }

    /// Replace the rarity table.
    pub fn with_rates(mut self, rates: &[RarityWeight]) -> Self {
        self.rates = rates.to_vec();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PackConfig::default();
        config.validate().unwrap();
        let total: f64 = config.rates.iter().map(|r| r.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(config.weight_of(Rarity::Legendary), 0.0124);
        assert_eq!(config.weight_of(Rarity::Free), 0.0);
    }

    #[test]
    fn rejects_bad_tables() {
        let base = PackConfig::default();
        assert_eq!(
            base.clone().with_rates(&[]).validate(),
            Err(ConfigError::EmptyRates)
        );
        assert_eq!(
            base.clone()
                .with_rates(&[RarityWeight::new(Rarity::Common, 0.0)])
                .validate(),
            Err(ConfigError::ZeroTotalWeight)
        );
        assert!(matches!(
            base.clone()
                .with_rates(&[RarityWeight::new(Rarity::Common, -1.0)])
                .validate(),
            Err(ConfigError::InvalidWeight { .. })
        ));
        assert!(matches!(
            base.clone()
                .with_rates(&[RarityWeight::new(Rarity::Common, f64::NAN)])
                .validate(),
            Err(ConfigError::InvalidWeight { .. })
        ));
        assert_eq!(
            base.clone()
                .with_rates(&[RarityWeight::new(Rarity::Free, 1.0)])
                .validate(),
            Err(ConfigError::NotDraftable(Rarity::Free))
        );
        assert_eq!(
            base.with_rates(&[
                RarityWeight::new(Rarity::Rare, 1.0),
                RarityWeight::new(Rarity::Rare, 1.0),
            ])
            .validate(),
            Err(ConfigError::DuplicateRarity(Rarity::Rare))
        );
    }

    #[test]
    fn rejects_zero_thresholds() {
        let config = PackConfig {
            legendary_pity: Some(0),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroThreshold {
                field: "legendary_pity"
            })
        );
        let config = PackConfig {
            early_legendary_pack: None,
            legendary_pity: None,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn deserializes_partial_config() {
        let json = r#"{
            "legendary_pity": 20,
            "rates": [
                {"rarity": "COMMON", "weight": 3},
                {"rarity": "LEGENDARY", "weight": 1}
            ]
        }"#;
        let config: PackConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.legendary_pity, Some(20));
        assert_eq!(config.early_legendary_pack, Some(DEFAULT_EARLY_LEGENDARY_PACK));
        assert!(config.guarantee_rare_or_higher);
        assert_eq!(config.rates.len(), 2);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(serde_json::from_str::<PackConfig>(r#"{"pity": 3}"#).is_err());
    }
}
