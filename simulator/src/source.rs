//! Card source collaborator.
//!
//! The simulator only needs one query: every collectible card of a set. The
//! in-memory [`Catalog`] serves that query from a JSON export and also
//! provides the id/dbfId lookups deck tooling needs.

use hearthpack_types::Card;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Largest dbfId batch a single lookup accepts.
pub const MAX_DBF_LOOKUP_BATCH: usize = 100;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read card catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse card catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate card id {0} in catalog")]
    DuplicateId(String),

    #[error("lookup of {requested} dbfIds exceeds batch limit {max}")]
    BatchTooLarge { requested: usize, max: usize },

    #[error("card source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies card pools to the simulator.
pub trait CardSource {
    /// All collectible cards whose set is exactly `set_id`. An empty result
    /// is not an error here; the simulator decides what empty means.
    fn collectible_cards(&self, set_id: &str) -> Result<Vec<Card>, SourceError>;
}

impl<T: CardSource + ?Sized> CardSource for &T {
    fn collectible_cards(&self, set_id: &str) -> Result<Vec<Card>, SourceError> {
        (**self).collectible_cards(set_id)
    }
}

impl<T: CardSource + ?Sized> CardSource for std::sync::Arc<T> {
    fn collectible_cards(&self, set_id: &str) -> Result<Vec<Card>, SourceError> {
        (**self).collectible_cards(set_id)
    }
}

/// Result of a dbfId batch lookup.
#[derive(Debug, Default)]
pub struct DbfLookup<'a> {
    pub found: HashMap<u32, &'a Card>,
    pub missing: Vec<u32>,
}

/// Card catalog held in memory.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    by_id: HashMap<String, usize>,
    by_dbf_id: HashMap<u32, usize>,
}

impl Catalog {
    pub fn new(cards: Vec<Card>) -> Result<Self, SourceError> {
        let mut by_id = HashMap::with_capacity(cards.len());
        let mut by_dbf_id = HashMap::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            if by_id.insert(card.id.clone(), index).is_some() {
                return Err(SourceError::DuplicateId(card.id.clone()));
            }
            by_dbf_id.entry(card.dbf_id).or_insert(index);
        }
        Ok(Self {
            cards,
            by_id,
            by_dbf_id,
        })
    }

    /// Parse a JSON array of card records.
    pub fn from_reader(reader: impl Read) -> Result<Self, SourceError> {
        let cards: Vec<Card> = serde_json::from_reader(reader)?;
        Self::new(cards)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&i| &self.cards[i])
    }

    pub fn by_dbf_id(&self, dbf_id: u32) -> Option<&Card> {
        self.by_dbf_id.get(&dbf_id).map(|&i| &self.cards[i])
    }

    /// Resolve a batch of dbfIds. Unknown ids are reported, not fatal.
    pub fn lookup_dbf_ids(&self, dbf_ids: &[u32]) -> Result<DbfLookup<'_>, SourceError> {
        if dbf_ids.len() > MAX_DBF_LOOKUP_BATCH {
            return Err(SourceError::BatchTooLarge {
                requested: dbf_ids.len(),
                max: MAX_DBF_LOOKUP_BATCH,
            });
        }
        let mut lookup = DbfLookup::default();
        for &dbf_id in dbf_ids {
            match self.by_dbf_id(dbf_id) {
                Some(card) => {
                    lookup.found.insert(dbf_id, card);
                }
                None => {
                    if !lookup.missing.contains(&dbf_id) {
                        lookup.missing.push(dbf_id);
                    }
                }
            }
        }
        Ok(lookup)
    }

    /// Distinct set identifiers, sorted.
    pub fn sets(&self) -> Vec<&str> {
        let mut sets: Vec<&str> = self.cards.iter().map(|c| c.card_set.as_str()).collect();
        sets.sort_unstable();
        sets.dedup();
        sets
    }
}

impl CardSource for Catalog {
    fn collectible_cards(&self, set_id: &str) -> Result<Vec<Card>, SourceError> {
        Ok(self
            .cards
            .iter()
            .filter(|card| card.collectible && card.card_set == set_id)
            .cloned()
            .collect())
    }
}
