//! Per-set pity and legendary tracking.

use crate::config::PackConfig;
use serde::Serialize;
use std::collections::BTreeSet;

/// Draw state for one loaded set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetState {
    pity_counter: u32,
    first_legendary_obtained: bool,
    packs_opened: u32,
    opened_legendaries: BTreeSet<String>,
}

impl SetState {
    /// Packs opened since the last legendary (steady-state pity only).
    pub fn pity_counter(&self) -> u32 {
        self.pity_counter
    }

    pub fn first_legendary_obtained(&self) -> bool {
        self.first_legendary_obtained
    }

    pub fn packs_opened(&self) -> u32 {
        self.packs_opened
    }

    /// Distinct legendary card ids drawn from this set.
    pub fn opened_legendaries(&self) -> &BTreeSet<String> {
        &self.opened_legendaries
    }

    /// Count a new pack and decide whether it must contain a legendary.
    ///
    /// The early guarantee is checked first and, when it fires or is pending,
    /// the steady-state counter is left untouched. The steady-state counter
    /// only advances after the set's first legendary.
    pub(crate) fn begin_pack(&mut self, config: &PackConfig) -> bool {
        self.packs_opened = self.packs_opened.saturating_add(1);

        if !self.first_legendary_obtained {
            return config.early_legendary_pack == Some(self.packs_opened);
        }

        let Some(threshold) = config.legendary_pity else {
            return false;
        };
        self.pity_counter = self.pity_counter.saturating_add(1);
        if self.pity_counter >= threshold {
            self.pity_counter = 0;
            return true;
        }
        false
    }

    /// Record a drawn legendary. Any legendary restarts the pity clock.
    ///
    /// Returns true if this was the set's first legendary.
    pub(crate) fn record_legendary(&mut self, card_id: &str) -> bool {
        if !self.opened_legendaries.contains(card_id) {
            self.opened_legendaries.insert(card_id.to_string());
        }
        self.pity_counter = 0;
        let first = !self.first_legendary_obtained;
        self.first_legendary_obtained = true;
        first
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
