//! Deck lists built from catalog card ids.
//!
//! A deck is kept as `(card id, count)` entries in first-seen order. Deck codes
//! speak in dbfIds, so [`DeckList::resolve`] maps entries through a catalog
//! lookup before encoding.

use crate::card::{Card, Rarity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards in a constructed deck.
pub const DECK_SIZE: u32 = 30;

/// Maximum copies of a non-legendary card.
pub const MAX_COPIES: u32 = 2;

/// Maximum copies of a legendary card.
pub const MAX_LEGENDARY_COPIES: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck has {count} cards, expected {expected}")]
    WrongSize { count: u32, expected: u32 },

    #[error("card {card_id} has {count} copies, at most {max} allowed")]
    TooManyCopies { card_id: String, count: u32, max: u32 },

    #[error("card {card_id} is not in the catalog")]
    UnknownCard { card_id: String },

    #[error("card {card_id} is not collectible")]
    NotCollectible { card_id: String },
}

/// One deck slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub card_id: String,
    pub count: u32,
}

/// A deck entry joined with its catalog record.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedEntry<'a> {
    pub card: &'a Card,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckList {
    entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse one-id-per-copy lists into counted entries, keeping the order
    /// in which each id first appears.
    pub fn from_card_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut deck = Self::new();
        for id in ids {
            deck.add(id.as_ref(), 1);
        }
        deck
    }

    /// Add `count` copies of `card_id`. Zero is a no-op.
    pub fn add(&mut self, card_id: &str, count: u32) {
        if count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.card_id == card_id) {
            Some(entry) => entry.count += count,
            None => self.entries.push(DeckEntry {
                card_id: card_id.to_string(),
                count,
            }),
        }
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn count_of(&self, card_id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.card_id == card_id)
            .map_or(0, |e| e.count)
    }

    pub fn total_cards(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join every entry with its catalog record.
    pub fn resolve<'a, F>(&self, lookup: F) -> Result<Vec<ResolvedEntry<'a>>, DeckError>
    where
        F: Fn(&str) -> Option<&'a Card>,
    {
        self.entries
            .iter()
            .map(|entry| {
                let card = lookup(&entry.card_id).ok_or_else(|| DeckError::UnknownCard {
                    card_id: entry.card_id.clone(),
                })?;
                Ok(ResolvedEntry {
                    card,
                    count: entry.count,
                })
            })
            .collect()
    }

    /// `(dbfId, count)` pairs ready for deck-code encoding.
    pub fn dbf_counts<'a, F>(&self, lookup: F) -> Result<Vec<(u32, u32)>, DeckError>
    where
        F: Fn(&str) -> Option<&'a Card>,
    {
        Ok(self
            .resolve(lookup)?
            .into_iter()
            .map(|r| (r.card.dbf_id, r.count))
            .collect())
    }

    /// Check constructed-deck rules: exact size, copy limits, collectible only.
    pub fn validate<'a, F>(&self, lookup: F) -> Result<(), DeckError>
    where
        F: Fn(&str) -> Option<&'a Card>,
    {
        for resolved in self.resolve(lookup)? {
            let card = resolved.card;
            if !card.collectible {
                return Err(DeckError::NotCollectible {
                    card_id: card.id.clone(),
                });
            }
            let max = if card.effective_rarity() == Rarity::Legendary {
                MAX_LEGENDARY_COPIES
            } else {
                MAX_COPIES
            };
            if resolved.count > max {
                return Err(DeckError::TooManyCopies {
                    card_id: card.id.clone(),
                    count: resolved.count,
                    max,
                });
            }
        }
        let count = self.total_cards();
        if count != DECK_SIZE {
            return Err(DeckError::WrongSize {
                count,
                expected: DECK_SIZE,
            });
        }
        Ok(())
    }

    /// Expand back into the one-id-per-copy export envelope.
    pub fn to_export(&self) -> DeckExport {
        let card_ids = self
            .entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.card_id.clone()).take(e.count as usize))
            .collect();
        DeckExport { card_ids }
    }
}

impl From<&DeckExport> for DeckList {
    fn from(export: &DeckExport) -> Self {
        Self::from_card_ids(&export.card_ids)
    }
}

/// JSON import/export envelope: one card id per copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckExport {
    pub card_ids: Vec<String>,
}
