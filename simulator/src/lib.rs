//! Booster pack opening with rarity guarantees and pity timers.
//!
//! A [`PackSimulator`] pulls a set's collectible cards from a [`CardSource`],
//! rolls five rarities per pack with a [`RarityAnalyzer`], and resolves each
//! rarity into a concrete card. Per-set state drives two legendary
//! guarantees (see [`PackConfig`]).
//!
//! ```
//! use hearthpack_simulator::{Catalog, PackConfig, PackSimulator};
//!
//! let catalog = Catalog::from_reader(
//!     r#"[{"id": "CS2_001", "dbfId": 1, "rarity": "COMMON", "cardSet": "CORE"}]"#.as_bytes(),
//! )
//! .unwrap();
//! let mut sim = PackSimulator::with_seed(catalog, PackConfig::default(), 7).unwrap();
//! sim.load_set("CORE").unwrap();
//! assert_eq!(sim.open_pack("CORE").unwrap().len(), 5);
//! ```

mod config;
pub use config::{
    ConfigError, PackConfig, RarityWeight, DEFAULT_EARLY_LEGENDARY_PACK, DEFAULT_LEGENDARY_PITY,
    DEFAULT_MAX_PACKS_PER_DRAW, DEFAULT_RATES, PACK_SIZE,
};
mod error;
pub use error::{SimulatorError, SimulatorResult};
mod pool;
pub use pool::{SetPool, FALLBACK_ORDER};
mod rarity;
pub use rarity::RarityAnalyzer;
mod report;
pub use report::{DrawReport, PackResult};
mod simulator;
pub use simulator::PackSimulator;
mod source;
pub use source::{Catalog, CardSource, DbfLookup, SourceError, MAX_DBF_LOOKUP_BATCH};
mod state;
pub use state::SetState;
pub mod weighted;
