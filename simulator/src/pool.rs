//! A loaded set's cards, bucketed by rarity.

use crate::weighted::uniform_choice;
use hearthpack_types::{Card, Rarity};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Buckets scanned when the requested rarity has no cards, highest first.
pub const FALLBACK_ORDER: [Rarity; 4] = [
    Rarity::Legendary,
    Rarity::Epic,
    Rarity::Rare,
    Rarity::Common,
];

#[derive(Clone, Debug)]
pub struct SetPool {
    cards: Vec<Card>,
    by_rarity: BTreeMap<Rarity, Vec<usize>>,
}

impl SetPool {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut by_rarity: BTreeMap<Rarity, Vec<usize>> = BTreeMap::new();
        for (index, card) in cards.iter().enumerate() {
            by_rarity
                .entry(card.effective_rarity())
                .or_default()
                .push(index);
        }
        Self { cards, by_rarity }
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

    pub fn count(&self, rarity: Rarity) -> usize {
        self.bucket(rarity).len()
    }

    fn bucket(&self, rarity: Rarity) -> &[usize] {
        self.by_rarity.get(&rarity).map(Vec::as_slice).unwrap_or(&[])
    }

    fn pick<R>(&self, indices: &[usize], rng: &mut R) -> Option<&Card>
    where
        R: Rng + ?Sized,
    {
        uniform_choice(indices, rng).map(|&i| &self.cards[i])
    }

    /// Resolve a rolled rarity into a card.
    ///
    /// - No cards of that rarity: the first non-empty bucket in
    ///   [`FALLBACK_ORDER`], else anything in the set.
    /// - LEGENDARY: only legendaries not yet in `opened_legendaries`, until
    ///   every legendary of the set has been opened once; then any legendary.
    /// - Otherwise: uniform within the bucket.
    ///
    /// Returns `None` only for an empty pool.
    pub fn resolve<R>(
        &self,
        rarity: Rarity,
        opened_legendaries: &BTreeSet<String>,
        rng: &mut R,
    ) -> Option<&Card>
    where
        R: Rng + ?Sized,
    {
        let bucket = self.bucket(rarity);
        if bucket.is_empty() {
            return match FALLBACK_ORDER
                .iter()
                .find(|r| !self.bucket(**r).is_empty())
            {
                Some(&fallback) => {
                    warn!(requested = %rarity, %fallback, "no cards of rolled rarity");
                    self.pick(self.bucket(fallback), rng)
                }
                None => {
                    warn!(requested = %rarity, "no draftable cards, drawing from whole set");
                    uniform_choice(&self.cards, rng)
                }
            };
        }

        if rarity == Rarity::Legendary && opened_legendaries.len() < bucket.len() {
            let unopened: Vec<usize> = bucket
                .iter()
                .copied()
                .filter(|&i| !opened_legendaries.contains(&self.cards[i].id))
                .collect();
            if !unopened.is_empty() {
                return self.pick(&unopened, rng);
            }
        }

        self.pick(bucket, rng)
    }
}
