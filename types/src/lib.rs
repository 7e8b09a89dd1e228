//! Common types used throughout hearthpack.
//!
//! The card catalog is an external, read-only data source; this crate only
//! defines the shape of its records and the small amount of logic that
//! operates on them directly (rarity tallies, deck counting and deck rules).

pub mod card;
pub mod deck;
pub mod distribution;

pub use card::{Card, Rarity, UnknownRarity};
pub use deck::{
    DeckEntry, DeckError, DeckExport, DeckList, ResolvedEntry, DECK_SIZE, MAX_COPIES,
    MAX_LEGENDARY_COPIES,
};
pub use distribution::RarityDistribution;
