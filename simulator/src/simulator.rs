use crate::config::{PackConfig, PACK_SIZE};
use crate::error::{SimulatorError, SimulatorResult};
use crate::pool::SetPool;
use crate::rarity::RarityAnalyzer;
use crate::report::DrawReport;
use crate::source::CardSource;
use crate::state::SetState;
use hearthpack_types::{Card, Rarity};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Clone, Debug)]
struct LoadedSet {
    pool: SetPool,
    state: SetState,
}

/// Opens packs against loaded sets, tracking pity per set.
///
/// State lives only as long as the simulator. Access is `&mut self`; callers
/// sharing one simulator across threads must wrap it in their own lock.
pub struct PackSimulator<S, R = StdRng> {
    source: S,
    rng: R,
    config: PackConfig,
    analyzer: RarityAnalyzer,
    sets: HashMap<String, LoadedSet>,
}

impl<S: CardSource> PackSimulator<S, StdRng> {
    /// Simulator seeded from OS entropy.
    pub fn new(source: S, config: PackConfig) -> SimulatorResult<Self> {
        Self::with_rng(source, config, StdRng::from_entropy())
    }

    /// Deterministic simulator: same seed, same catalog, same packs.
    pub fn with_seed(source: S, config: PackConfig, seed: u64) -> SimulatorResult<Self> {
        Self::with_rng(source, config, StdRng::seed_from_u64(seed))
    }
}

impl<S: CardSource, R: Rng> PackSimulator<S, R> {
    pub fn with_rng(source: S, config: PackConfig, rng: R) -> SimulatorResult<Self> {
        config.validate()?;
        let analyzer = RarityAnalyzer::new(&config);
        Ok(Self {
            source,
            rng,
            config,
            analyzer,
            sets: HashMap::new(),
        })
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and bucket a set's collectible pool. No-op when already loaded.
    pub fn load_set(&mut self, set_id: &str) -> SimulatorResult<()> {
        if self.sets.contains_key(set_id) {
            debug!(set_id, "set already loaded");
            return Ok(());
        }

        let cards = self.source.collectible_cards(set_id)?;
        if cards.is_empty() {
            return Err(SimulatorError::NoCardsForSet {
                set_id: set_id.to_string(),
            });
        }

        let pool = SetPool::new(cards);
        info!(
            set_id,
            cards = pool.len(),
            common = pool.count(Rarity::Common),
            rare = pool.count(Rarity::Rare),
            epic = pool.count(Rarity::Epic),
            legendary = pool.count(Rarity::Legendary),
            "loaded set"
        );
        self.sets.insert(
            set_id.to_string(),
            LoadedSet {
                pool,
                state: SetState::default(),
            },
        );
        Ok(())
    }

    pub fn is_loaded(&self, set_id: &str) -> bool {
        self.sets.contains_key(set_id)
    }

    /// Loaded set ids, sorted.
    pub fn loaded_sets(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn set_state(&self, set_id: &str) -> Option<&SetState> {
        self.sets.get(set_id).map(|set| &set.state)
    }

    pub fn pool(&self, set_id: &str) -> Option<&SetPool> {
        self.sets.get(set_id).map(|set| &set.pool)
    }

    /// Open one pack of a loaded set.
    pub fn open_pack(&mut self, set_id: &str) -> SimulatorResult<Vec<Card>> {
        let Self {
            rng,
            config,
            analyzer,
            sets,
            ..
        } = self;
        let set = sets
            .get_mut(set_id)
            .ok_or_else(|| SimulatorError::SetNotLoaded {
                set_id: set_id.to_string(),
            })?;

        let force_legendary = set.state.begin_pack(config);
        if force_legendary {
            debug!(
                set_id,
                pack = set.state.packs_opened(),
                pity = set.state.first_legendary_obtained(),
                "forcing legendary"
            );
        }

        let rarities = analyzer.determine_pack_rarities(force_legendary, rng);
        let mut cards = Vec::with_capacity(PACK_SIZE);
        for rarity in rarities {
            let card = set
                .pool
                .resolve(rarity, set.state.opened_legendaries(), rng)
                .cloned()
                .ok_or_else(|| SimulatorError::NoCardsForSet {
                    set_id: set_id.to_string(),
                })?;
            if card.is_legendary() && set.state.record_legendary(&card.id) {
                debug!(
                    set_id,
                    card_id = %card.id,
                    pack = set.state.packs_opened(),
                    "first legendary"
                );
            }
            cards.push(card);
        }
        Ok(cards)
    }

    /// Open `count` packs of a loaded set and tally the result.
    pub fn open_packs(&mut self, set_id: &str, count: u32) -> SimulatorResult<DrawReport> {
        let max = self.config.max_packs_per_draw;
        if count == 0 || count > max {
            return Err(SimulatorError::InvalidPackCount { count, max });
        }
        let mut report = DrawReport::new(set_id);
        for _ in 0..count {
            let cards = self.open_pack(set_id)?;
            report.push(cards);
        }
        debug!(
            set_id,
            packs = report.packs_opened,
            legendaries = report.total_rarity_distribution.legendary,
            "opened packs"
        );
        Ok(report)
    }

    /// Clear counters for one set, or every loaded set. Pools stay loaded.
    pub fn reset(&mut self, set_id: Option<&str>) -> SimulatorResult<()> {
        match set_id {
            Some(set_id) => {
                let set = self
                    .sets
                    .get_mut(set_id)
                    .ok_or_else(|| SimulatorError::SetNotLoaded {
                        set_id: set_id.to_string(),
                    })?;
                set.state.reset();
                info!(set_id, "reset set state");
            }
            None => {
                for set in self.sets.values_mut() {
                    set.state.reset();
                }
                info!(sets = self.sets.len(), "reset all set state");
            }
        }
        Ok(())
    }
}
