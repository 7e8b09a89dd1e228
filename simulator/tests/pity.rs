//! Legendary guarantees over long runs of packs.

use hearthpack_simulator::{
    Catalog, PackConfig, PackSimulator, RarityWeight, SimulatorError, DEFAULT_LEGENDARY_PITY,
};
use hearthpack_types::{Card, Rarity};
use std::collections::HashSet;

const SET: &str = "EXPERT1";

fn card(id: String, rarity: Rarity) -> Card {
    Card {
        id,
        dbf_id: 0,
        name: String::new(),
        rarity: Some(rarity),
        card_set: SET.to_string(),
        card_class: None,
        card_type: None,
        cost: None,
        attack: None,
        health: None,
        text: None,
        collectible: true,
    }
}

fn catalog(commons: usize, rares: usize, epics: usize, legendaries: usize) -> Catalog {
    let mut cards = Vec::new();
    for (rarity, n) in [
        (Rarity::Common, commons),
        (Rarity::Rare, rares),
        (Rarity::Epic, epics),
        (Rarity::Legendary, legendaries),
    ] {
        for i in 0..n {
            cards.push(card(format!("{SET}_{rarity}_{i}"), rarity));
        }
    }
    Catalog::new(cards).unwrap()
}

/// Natural legendaries never roll, so every legendary is a forced one.
fn no_natural_legendaries() -> PackConfig {
    PackConfig::default().with_rates(&[
        RarityWeight::new(Rarity::Common, 0.7),
        RarityWeight::new(Rarity::Rare, 0.2),
        RarityWeight::new(Rarity::Epic, 0.1),
        RarityWeight::new(Rarity::Legendary, 0.0),
    ])
}

fn legendaries(pack: &[Card]) -> Vec<&Card> {
    pack.iter().filter(|c| c.is_legendary()).collect()
}

#[test]
fn tenth_pack_and_every_fortieth_after_hold_a_legendary() {
    for seed in 0..20 {
        let mut sim = PackSimulator::with_seed(catalog(20, 10, 6, 5), no_natural_legendaries(), seed)
            .unwrap();
        sim.load_set(SET).unwrap();

        for pack in 1..=170u32 {
            let cards = sim.open_pack(SET).unwrap();
            let expected = usize::from(pack == 10 || (pack > 10 && (pack - 10) % 40 == 0));
            assert_eq!(
                legendaries(&cards).len(),
                expected,
                "seed {seed} pack {pack}"
            );
        }
        let state = sim.set_state(SET).unwrap();
        assert_eq!(state.packs_opened(), 170);
        assert_eq!(state.pity_counter(), 0);
    }
}

#[test]
fn pity_counter_tracks_packs_since_last_legendary() {
    let mut sim = PackSimulator::with_seed(catalog(20, 10, 6, 5), no_natural_legendaries(), 9)
        .unwrap();
    sim.load_set(SET).unwrap();

    sim.open_packs(SET, 10).unwrap();
    let state = sim.set_state(SET).unwrap();
    assert!(state.first_legendary_obtained());
    assert_eq!(state.pity_counter(), 0);

    sim.open_packs(SET, DEFAULT_LEGENDARY_PITY - 1).unwrap();
    assert_eq!(
        sim.set_state(SET).unwrap().pity_counter(),
        DEFAULT_LEGENDARY_PITY - 1
    );

    let report = sim.open_packs(SET, 1).unwrap();
    assert_eq!(report.total_rarity_distribution.legendary, 1);
    assert_eq!(sim.set_state(SET).unwrap().pity_counter(), 0);
}

#[test]
fn first_legendaries_are_distinct_until_set_exhausted() {
    const LEGENDARIES: usize = 4;
    for seed in 0..10 {
        let mut sim = PackSimulator::with_seed(
            catalog(20, 10, 6, LEGENDARIES),
            no_natural_legendaries(),
            seed,
        )
        .unwrap();
        sim.load_set(SET).unwrap();

        // Packs 10, 50, 90, 130 and 170 each force one legendary.
        let report = sim.open_packs(SET, 170).unwrap();
        let drawn: Vec<&str> = report
            .cards()
            .filter(|c| c.is_legendary())
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(drawn.len(), LEGENDARIES + 1);

        let first: HashSet<&str> = drawn[..LEGENDARIES].iter().copied().collect();
        assert_eq!(first.len(), LEGENDARIES, "seed {seed}: {drawn:?}");
        assert_eq!(
            sim.set_state(SET).unwrap().opened_legendaries().len(),
            LEGENDARIES
        );
    }
}

#[test]
fn natural_legendaries_are_distinct_with_default_rates() {
    const LEGENDARIES: usize = 12;
    let mut sim =
        PackSimulator::with_seed(catalog(40, 20, 10, LEGENDARIES), PackConfig::default(), 5)
            .unwrap();
    sim.load_set(SET).unwrap();

    let mut drawn = Vec::new();
    while drawn.len() < LEGENDARIES {
        for card in sim.open_pack(SET).unwrap() {
            if card.is_legendary() {
                drawn.push(card.id);
            }
        }
    }
    let distinct: HashSet<&String> = drawn[..LEGENDARIES].iter().collect();
    assert_eq!(distinct.len(), LEGENDARIES);
}

#[test]
fn epic_only_table_falls_back_to_legendaries() {
    let config = PackConfig::default().with_rates(&[RarityWeight::new(Rarity::Epic, 1.0)]);
    let mut sim = PackSimulator::with_seed(catalog(10, 0, 0, 3), config, 2).unwrap();
    sim.load_set(SET).unwrap();

    let report = sim.open_packs(SET, 4).unwrap();
    assert!(report.cards().all(Card::is_legendary));
    assert_eq!(report.total_rarity_distribution.legendary, 20);
}

#[test]
fn set_without_legendaries_survives_forced_packs() {
    let mut sim = PackSimulator::with_seed(catalog(10, 5, 2, 0), PackConfig::default(), 4).unwrap();
    sim.load_set(SET).unwrap();

    let report = sim.open_packs(SET, 60).unwrap();
    assert_eq!(report.total_cards, 300);
    assert_eq!(report.total_rarity_distribution.legendary, 0);
    let state = sim.set_state(SET).unwrap();
    assert!(!state.first_legendary_obtained());
    assert_eq!(state.packs_opened(), 60);
}

#[test]
fn reset_restarts_the_early_guarantee() {
    let mut sim = PackSimulator::with_seed(catalog(20, 10, 6, 5), no_natural_legendaries(), 8)
        .unwrap();
    sim.load_set(SET).unwrap();
    sim.open_packs(SET, 25).unwrap();

    sim.reset(Some(SET)).unwrap();
    let report = sim.open_packs(SET, 10).unwrap();
    assert_eq!(report.packs[9].rarity_distribution.legendary, 1);
    assert_eq!(report.total_rarity_distribution.legendary, 1);
}

#[test]
fn disabled_guarantees_never_force() {
    let config = PackConfig {
        early_legendary_pack: None,
        legendary_pity: None,
        ..no_natural_legendaries()
    };
    let mut sim = PackSimulator::with_seed(catalog(20, 10, 6, 5), config, 1).unwrap();
    sim.load_set(SET).unwrap();
    let report = sim.open_packs(SET, 200).unwrap();
    assert_eq!(report.total_rarity_distribution.legendary, 0);
}

#[test]
fn unloaded_and_empty_sets_are_errors() {
    let mut sim =
        PackSimulator::with_seed(catalog(5, 0, 0, 0), PackConfig::default(), 0).unwrap();
    assert!(matches!(
        sim.open_packs(SET, 1),
        Err(SimulatorError::SetNotLoaded { .. })
    ));
    assert!(matches!(
        sim.load_set("CORE"),
        Err(SimulatorError::NoCardsForSet { .. })
    ));
}
