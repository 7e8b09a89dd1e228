//! hearthpack - open card packs and convert deck codes.
//!
//! Usage:
//!   hearthpack open --catalog cards.json --set EXPERT1 --count 50 --seed 7
//!   hearthpack encode --hero 7 --card 1001:2 --card 1002:1
//!   hearthpack encode --hero 7 --deck deck.json --catalog cards.json
//!   hearthpack decode AAECAf0EAekHAeoHAesHAw== --catalog cards.json
//!   hearthpack count deck.json
//!
//! JSON results go to stdout; logs go to stderr.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use hearthpack_codec::{decode_deck, encode_deck, extract_deck_code, format_name};
use hearthpack_simulator::{Catalog, DrawReport, PackConfig, PackSimulator, MAX_DBF_LOOKUP_BATCH};
use hearthpack_types::{DeckEntry, DeckExport, DeckList, Rarity};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Open card packs and convert deck codes")]
struct Args {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open packs of one set and print the draw report.
    Open(OpenArgs),
    /// Build a deck code from dbfId counts or a deck export.
    Encode(EncodeArgs),
    /// Decode a deck code, optionally naming cards from a catalog.
    Decode(DecodeArgs),
    /// Collapse a deck export into card counts.
    Count(CountArgs),
    /// Print the canonical deck-code vectors.
    Vectors,
}

#[derive(clap::Args, Debug)]
struct OpenArgs {
    /// JSON array of card records.
    #[arg(long)]
    catalog: PathBuf,

    #[arg(long)]
    set: String,

    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Fixed RNG seed for reproducible packs.
    #[arg(long)]
    seed: Option<u64>,

    /// YAML drop-rate configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct EncodeArgs {
    /// Hero dbfId.
    #[arg(long)]
    hero: u32,

    /// `dbfId:count`, repeatable.
    #[arg(long = "card", value_parser = parse_card_count, conflicts_with = "deck")]
    cards: Vec<(u32, u32)>,

    /// Deck export JSON (`{"cardIds": [...]}`), resolved through `--catalog`.
    #[arg(long, requires = "catalog")]
    deck: Option<PathBuf>,

    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Encode decks that break construction rules.
    #[arg(long)]
    allow_invalid: bool,
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// Deck code, or text pasted from the game client.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    code: Option<String>,

    /// Read the deck code from a file.
    #[arg(long)]
    file: Option<PathBuf>,

    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CountArgs {
    /// Deck export JSON.
    deck: PathBuf,

    /// Check deck rules against this catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn parse_card_count(value: &str) -> Result<(u32, u32), String> {
    let (dbf_id, count) = value
        .split_once(':')
        .ok_or_else(|| format!("expected dbfId:count, got {value:?}"))?;
    let dbf_id = dbf_id
        .trim()
        .parse()
        .map_err(|e| format!("invalid dbfId {dbf_id:?}: {e}"))?;
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid count {count:?}: {e}"))?;
    Ok((dbf_id, count))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::from_path(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    info!(path = %path.display(), cards = catalog.len(), "loaded catalog");
    Ok(catalog)
}

fn load_config(path: Option<&Path>) -> Result<PackConfig> {
    let Some(path) = path else {
        return Ok(PackConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: PackConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate().context("invalid pack config")?;
    Ok(config)
}

fn load_deck(path: &Path) -> Result<DeckList> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck {}", path.display()))?;
    let export: DeckExport = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse deck {}", path.display()))?;
    Ok(DeckList::from(&export))
}

fn run_open(args: &OpenArgs) -> Result<DrawReport> {
    let catalog = load_catalog(&args.catalog)?;
    let config = load_config(args.config.as_deref())?;
    let mut sim = match args.seed {
        Some(seed) => PackSimulator::with_seed(catalog, config, seed)?,
        None => PackSimulator::new(catalog, config)?,
    };
    sim.load_set(&args.set)?;
    let report = sim.open_packs(&args.set, args.count)?;
    info!(
        set = %args.set,
        packs = report.packs_opened,
        legendaries = report.total_rarity_distribution.legendary,
        "opened packs"
    );
    Ok(report)
}

fn run_encode(args: &EncodeArgs) -> Result<String> {
    let cards = match (&args.deck, &args.catalog) {
        (Some(deck_path), Some(catalog_path)) => {
            let deck = load_deck(deck_path)?;
            let catalog = load_catalog(catalog_path)?;
            if !args.allow_invalid {
                deck.validate(|id| catalog.get(id))
                    .with_context(|| format!("deck {} breaks deck rules", deck_path.display()))?;
            }
            deck.dbf_counts(|id| catalog.get(id))?
        }
        (Some(_), None) => bail!("--deck requires --catalog"),
        (None, _) => args.cards.clone(),
    };
    if cards.is_empty() {
        bail!("no cards given; use --card or --deck");
    }
    encode_deck(args.hero, &cards).context("failed to encode deck")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedCard {
    dbf_id: u32,
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rarity: Option<Rarity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedDeck {
    format: u32,
    format_name: Option<&'static str>,
    heroes: Vec<u32>,
    total_cards: u64,
    cards: Vec<DecodedCard>,
    /// dbfIds the catalog does not know. Empty without a catalog.
    missing_dbf_ids: Vec<u32>,
}

fn run_decode(args: &DecodeArgs) -> Result<DecodedDeck> {
    let text = match (&args.code, &args.file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (Some(code), None) => code.clone(),
        (None, None) => bail!("no deck code given"),
    };
    let code = extract_deck_code(&text).ok_or_else(|| anyhow!("no deck code found in input"))?;
    let deck = decode_deck(code).context("invalid deck code")?;

    let mut cards: Vec<DecodedCard> = deck
        .cards
        .iter()
        .map(|&(dbf_id, count)| DecodedCard {
            dbf_id,
            count,
            card_id: None,
            name: None,
            rarity: None,
        })
        .collect();
    let mut missing_dbf_ids = Vec::new();

    if let Some(path) = &args.catalog {
        let catalog = load_catalog(path)?;
        let dbf_ids: Vec<u32> = deck.cards.iter().map(|&(dbf_id, _)| dbf_id).collect();
        for batch in dbf_ids.chunks(MAX_DBF_LOOKUP_BATCH) {
            let lookup = catalog.lookup_dbf_ids(batch)?;
            for card in cards.iter_mut().filter(|c| batch.contains(&c.dbf_id)) {
                if let Some(found) = lookup.found.get(&card.dbf_id) {
                    card.card_id = Some(found.id.clone());
                    card.name = Some(found.name.clone());
                    card.rarity = Some(found.effective_rarity());
                }
            }
            missing_dbf_ids.extend(lookup.missing);
        }
        if !missing_dbf_ids.is_empty() {
            warn!(missing = ?missing_dbf_ids, "deck code references unknown cards");
        }
    }

    Ok(DecodedDeck {
        format: deck.format,
        format_name: format_name(deck.format),
        heroes: deck.heroes.clone(),
        total_cards: deck.total_cards(),
        cards,
        missing_dbf_ids,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckCount {
    total_cards: u32,
    entries: Vec<DeckEntry>,
    /// Set only when checked against a catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_count(args: &CountArgs) -> Result<DeckCount> {
    let deck = load_deck(&args.deck)?;
    let mut count = DeckCount {
        total_cards: deck.total_cards(),
        entries: deck.entries().to_vec(),
        valid: None,
        error: None,
    };
    if let Some(path) = &args.catalog {
        let catalog = load_catalog(path)?;
        let result = deck.validate(|id| catalog.get(id));
        count.valid = Some(result.is_ok());
        count.error = result.err().map(|e| e.to_string());
    }
    Ok(count)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Open(open) => print_json(&run_open(open)?),
        Command::Encode(encode) => {
            println!("{}", run_encode(encode)?);
            Ok(())
        }
        Command::Decode(decode) => print_json(&run_decode(decode)?),
        Command::Count(count) => print_json(&run_count(count)?),
        Command::Vectors => {
            println!("{}", hearthpack_codec::golden_vectors::export_golden_vectors_json()?);
            Ok(())
        }
    }
}
