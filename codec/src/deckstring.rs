//! Deck code encode/decode.
//!
//! # Layout
//!
//! ```text
//! 0x00                      reserved
//! varint  version           always 1
//! varint  format            e.g. 2 = standard
//! varint  hero count        then that many hero dbfIds
//! varint  n1                then n1 dbfIds, count 1, ascending
//! varint  n2                then n2 dbfIds, count 2, ascending
//! varint  nN                then nN (dbfId, count) pairs, count > 2
//! ```
//!
//! The byte string is wrapped in standard, padded Base64. Ascending order in
//! the single and double sections is part of the canonical form the game
//! client produces, so identical decks always yield identical codes.

use crate::varint::{ByteReader, ByteWriter, CodecError, CodecResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Reserved leading byte.
pub const DECK_CODE_HEADER: u8 = 0;

/// The only supported layout version.
pub const DECK_CODE_VERSION: u64 = 1;

/// Format tag written by [`encode_deck`].
pub const FORMAT_STANDARD: u32 = 2;

/// Format tags the game client is known to emit.
pub const FORMAT_WILD: u32 = 1;
pub const FORMAT_CLASSIC: u32 = 3;
pub const FORMAT_TWIST: u32 = 4;

/// Upper bound on accepted deck-code text (DoS protection).
pub const MAX_DECK_CODE_LEN: usize = 4096;

/// Human-readable name for a format tag.
pub fn format_name(format: u32) -> Option<&'static str> {
    match format {
        FORMAT_WILD => Some("Wild"),
        FORMAT_STANDARD => Some("Standard"),
        FORMAT_CLASSIC => Some("Classic"),
        FORMAT_TWIST => Some("Twist"),
        _ => None,
    }
}

/// A decoded deck code.
///
/// `cards` holds `(dbfId, count)` pairs in wire order: singles, then doubles,
/// then the N section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDefinition {
    pub format: u32,
    pub heroes: Vec<u32>,
    pub cards: Vec<(u32, u32)>,
}

impl DeckDefinition {
    pub fn total_cards(&self) -> u64 {
        self.cards.iter().map(|&(_, count)| count as u64).sum()
    }

    /// Cards sorted by dbfId, for order-insensitive comparison.
    pub fn sorted_cards(&self) -> Vec<(u32, u32)> {
        let mut cards = self.cards.clone();
        cards.sort_unstable();
        cards
    }
}

/// Cards grouped by copy count, in the order they are written.
#[derive(Debug, Default)]
struct Buckets {
    singles: Vec<u32>,
    doubles: Vec<u32>,
    multiples: Vec<(u32, u32)>,
}

/// Merge repeated dbfIds, reject zero counts, and bucket by count.
fn bucket_cards(cards: &[(u32, u32)]) -> CodecResult<Buckets> {
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(cards.len());
    for &(dbf_id, count) in cards {
        if count == 0 {
            return Err(CodecError::InvalidCardCount { dbf_id, count });
        }
        match merged.iter_mut().find(|(id, _)| *id == dbf_id) {
            Some((_, total)) => *total = total.saturating_add(count),
            None => merged.push((dbf_id, count)),
        }
    }

    let mut buckets = Buckets::default();
    for (dbf_id, count) in merged {
        match count {
            1 => buckets.singles.push(dbf_id),
            2 => buckets.doubles.push(dbf_id),
            _ => buckets.multiples.push((dbf_id, count)),
        }
    }
    buckets.singles.sort_unstable();
    buckets.doubles.sort_unstable();
    Ok(buckets)
}

/// Encode the raw payload bytes (before Base64).
pub fn encode_deck_bytes(hero: u32, cards: &[(u32, u32)]) -> CodecResult<Vec<u8>> {
    let buckets = bucket_cards(cards)?;

    let mut writer = ByteWriter::with_capacity(8 + cards.len() * 3);
    writer.write_byte(DECK_CODE_HEADER);
    writer.write_varint(DECK_CODE_VERSION);
    writer.write_varint(FORMAT_STANDARD as u64);
    writer.write_varint(1);
    writer.write_varint(hero as u64);

    writer.write_varint(buckets.singles.len() as u64);
    for dbf_id in &buckets.singles {
        writer.write_varint(*dbf_id as u64);
    }
    writer.write_varint(buckets.doubles.len() as u64);
    for dbf_id in &buckets.doubles {
        writer.write_varint(*dbf_id as u64);
    }
    writer.write_varint(buckets.multiples.len() as u64);
    for (dbf_id, count) in &buckets.multiples {
        writer.write_varint(*dbf_id as u64);
        writer.write_varint(*count as u64);
    }

    Ok(writer.finish())
}

/// Encode a single-hero deck as a deck code.
pub fn encode_deck(hero: u32, cards: &[(u32, u32)]) -> CodecResult<String> {
    Ok(STANDARD.encode(encode_deck_bytes(hero, cards)?))
}

/// Encode a deck code, returning an empty string on failure.
///
/// Callers must check for emptiness before using the result.
pub fn encode(hero: u32, cards: &[(u32, u32)]) -> String {
    match encode_deck(hero, cards) {
        Ok(code) => code,
        Err(err) => {
            warn!(?err, hero, cards = cards.len(), "deck code encoding failed");
            String::new()
        }
    }
}

/// Read `count` items, capping the preallocation at what the buffer could
/// possibly hold.
fn read_section<T>(
    reader: &mut ByteReader<'_>,
    mut read_item: impl FnMut(&mut ByteReader<'_>) -> CodecResult<T>,
) -> CodecResult<Vec<T>> {
    let count = reader.read_varint()?;
    let capacity = usize::try_from(count).unwrap_or(usize::MAX).min(reader.remaining());
    let mut items = Vec::with_capacity(capacity);
    for _ in 0..count {
        items.push(read_item(&mut *reader)?);
    }
    Ok(items)
}

/// Decode raw payload bytes (after Base64).
///
/// Bytes following the N section are ignored; newer clients append optional
/// sections there.
pub fn decode_deck_bytes(bytes: &[u8]) -> CodecResult<DeckDefinition> {
    let mut reader = ByteReader::new(bytes);

    let header = reader.read_byte()?;
    if header != DECK_CODE_HEADER {
        return Err(CodecError::InvalidHeader { byte: header });
    }
    let version = reader.read_varint()?;
    if version != DECK_CODE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            version,
            expected: DECK_CODE_VERSION,
        });
    }
    let format = reader.read_varint_u32()?;
    let heroes = read_section(&mut reader, |r| r.read_varint_u32())?;

    let singles = read_section(&mut reader, |r| Ok((r.read_varint_u32()?, 1u32)))?;
    let doubles = read_section(&mut reader, |r| Ok((r.read_varint_u32()?, 2u32)))?;
    let multiples = read_section(&mut reader, |r| {
        let dbf_id = r.read_varint_u32()?;
        let count = r.read_varint_u32()?;
        Ok((dbf_id, count))
    })?;

    let mut cards = singles;
    cards.extend(doubles);
    cards.extend(multiples);

    Ok(DeckDefinition {
        format,
        heroes,
        cards,
    })
}

/// Decode a deck code. Surrounding whitespace is ignored.
pub fn decode_deck(code: &str) -> CodecResult<DeckDefinition> {
    let code = code.trim();
    if code.len() > MAX_DECK_CODE_LEN {
        return Err(CodecError::TooLong {
            len: code.len(),
            max: MAX_DECK_CODE_LEN,
        });
    }
    let bytes = STANDARD.decode(code)?;
    decode_deck_bytes(&bytes)
}

/// Decode a deck code, returning `None` on any failure.
///
/// Decoding is all-or-nothing: no partially populated deck is ever returned.
pub fn decode(code: &str) -> Option<DeckDefinition> {
    decode_deck(code).ok()
}

/// Pull the deck code out of text copied from the game client.
///
/// The client wraps the code in `#`-prefixed comment lines (deck name, class,
/// card list); the code is the first non-empty line that is not a comment.
pub fn extract_deck_code(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_deck() {
        let code = encode(637, &[(1001, 1), (1002, 2), (1003, 3)]);
        assert_eq!(code, "AAECAf0EAekHAeoHAesHAw==");

        let bytes = encode_deck_bytes(637, &[(1001, 1), (1002, 2), (1003, 3)]).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x01, 0x02, 0x01, 0xFD, 0x04, // header, version, format, 1 hero (637)
                0x01, 0xE9, 0x07, // singles: 1001
                0x01, 0xEA, 0x07, // doubles: 1002
                0x01, 0xEB, 0x07, 0x03, // N: 1003 x3
            ]
        );
    }

    #[test]
    fn test_decode_known_deck() {
        let deck = decode("AAECAf0EAekHAeoHAesHAw==").unwrap();
        assert_eq!(deck.format, FORMAT_STANDARD);
        assert_eq!(deck.heroes, vec![637]);
        assert_eq!(deck.cards, vec![(1001, 1), (1002, 2), (1003, 3)]);
        assert_eq!(deck.total_cards(), 6);
    }

    #[test]
    fn test_singles_and_doubles_sorted() {
        let bytes = encode_deck_bytes(7, &[(300, 1), (128, 2), (1, 1)]).unwrap();
        // singles [1, 300], doubles [128], empty N section
        assert_eq!(
            bytes,
            vec![0x00, 0x01, 0x02, 0x01, 0x07, 0x02, 0x01, 0xAC, 0x02, 0x01, 0x80, 0x01, 0x00]
        );
    }

    #[test]
    fn test_multiples_keep_input_order() {
        let deck = decode(&encode(7, &[(50, 4), (10, 3)])).unwrap();
        assert_eq!(deck.cards, vec![(50, 4), (10, 3)]);
    }

    #[test]
    fn test_repeated_ids_are_merged() {
        let deck = decode(&encode(7, &[(10, 1), (10, 1), (11, 2), (11, 1)])).unwrap();
        assert_eq!(deck.cards, vec![(10, 2), (11, 3)]);
    }

    #[test]
    fn test_zero_count_rejected() {
        assert_eq!(
            encode_deck(7, &[(10, 0)]),
            Err(CodecError::InvalidCardCount { dbf_id: 10, count: 0 })
        );
        assert_eq!(encode(7, &[(10, 1), (11, 0)]), "");
    }

    #[test]
    fn test_empty_deck() {
        let code = encode(7, &[]);
        assert_eq!(code, "AAECAQcAAAA=");
        let deck = decode(&code).unwrap();
        assert_eq!(deck.heroes, vec![7]);
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn test_nonzero_header_rejected() {
        // 01 01 02 01 07 00 00 00
        assert_eq!(
            decode_deck("AQECAQcAAAA="),
            Err(CodecError::InvalidHeader { byte: 1 })
        );
        assert_eq!(decode("AQECAQcAAAA="), None);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        // 00 02 02 01 07 00 00 00
        assert_eq!(
            decode_deck("AAICAQcAAAA="),
            Err(CodecError::UnsupportedVersion {
                version: 2,
                expected: 1
            })
        );
    }

    #[test]
    fn test_section_length_overrun_rejected() {
        // 00 01 02 01 07 03 05: three singles declared, one present
        assert!(matches!(
            decode_deck("AAECAQcDBQ=="),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_truncated_varint_rejected() {
        // 00 01 02 01 87: hero id has its continuation bit set and then ends
        assert!(matches!(
            decode_deck("AAECAYc="),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            decode_deck("not*base64"),
            Err(CodecError::InvalidBase64(_))
        ));
        assert_eq!(decode(""), None);
    }

    #[test]
    fn test_too_long_rejected() {
        let code = "A".repeat(MAX_DECK_CODE_LEN + 4);
        assert!(matches!(decode_deck(&code), Err(CodecError::TooLong { .. })));
    }

    #[test]
    fn test_huge_declared_count_does_not_allocate() {
        let mut writer = ByteWriter::new();
        writer.write_byte(0);
        writer.write_varint(1);
        writer.write_varint(2);
        writer.write_varint(u32::MAX as u64);
        let code = STANDARD.encode(writer.finish());
        assert!(matches!(
            decode_deck(&code),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_trailing_sections_ignored() {
        let mut bytes = encode_deck_bytes(7, &[(1, 1)]).unwrap();
        bytes.extend_from_slice(&[0x01, 0x00]);
        let deck = decode_deck_bytes(&bytes).unwrap();
        assert_eq!(deck.cards, vec![(1, 1)]);
    }

    #[test]
    fn test_extract_deck_code() {
        let text = "### My Deck\n# Class: Mage\n# Format: Standard\n#\nAAECAf0EAekHAeoHAesHAw==\n#\n# To use this deck, copy it to your clipboard\n";
        assert_eq!(extract_deck_code(text), Some("AAECAf0EAekHAeoHAesHAw=="));
        assert_eq!(extract_deck_code("# only comments\n"), None);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(format_name(FORMAT_STANDARD), Some("Standard"));
        assert_eq!(format_name(FORMAT_WILD), Some("Wild"));
        assert_eq!(format_name(99), None);
    }

    fn card_list() -> impl Strategy<Value = Vec<(u32, u32)>> {
        proptest::collection::btree_map(any::<u32>(), 1u32..=10, 1..40)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #[test]
        fn deck_round_trip(hero in any::<u32>(), cards in card_list()) {
            let code = encode(hero, &cards);
            prop_assert!(!code.is_empty());
            let deck = decode(&code).expect("encoded deck must decode");
            prop_assert_eq!(deck.format, FORMAT_STANDARD);
            prop_assert_eq!(deck.heroes, vec![hero]);
            let mut expected = cards.clone();
            expected.sort_unstable();
            let mut actual = deck.cards.clone();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode_deck_bytes(&bytes);
        }
    }
}
