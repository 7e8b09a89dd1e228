//! Golden vectors for deck-code parity testing.
//!
//! Each vector pins the exact payload bytes and Base64 text for a fixed deck.
//! Any other encoder (the game client, a web front end) must produce the same
//! strings for the same input.
//!
//! ```
//! use hearthpack_codec::golden_vectors::GoldenVectors;
//!
//! let vectors = GoldenVectors::canonical();
//! for vector in &vectors.vectors {
//!     vector.verify().unwrap();
//! }
//! ```
//!
//! Vectors are frozen once published. A layout change adds new vectors with a
//! version suffix instead of editing existing ones.

use crate::deckstring::{decode_deck, encode_deck_bytes};
use crate::varint::CodecError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bump when the export structure changes in a breaking way.
pub const GOLDEN_VECTORS_SCHEMA_VERSION: u32 = 1;

/// A deck input and its expected encodings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,
    pub hero: u32,
    /// `(dbfId, count)` input, in the order handed to the encoder.
    pub cards: Vec<(u32, u32)>,
    /// Expected payload, hex-encoded.
    pub bytes_hex: String,
    /// Expected deck code.
    pub deck_code: String,
}

#[derive(Debug, Error)]
pub enum GoldenVectorMismatch {
    #[error("golden vector '{name}' bytes mismatch:\n  expected: {expected}\n  actual:   {actual}")]
    Bytes {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("golden vector '{name}' deck code mismatch:\n  expected: {expected}\n  actual:   {actual}")]
    DeckCode {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("golden vector '{name}' does not decode back to its input")]
    RoundTrip { name: String },

    #[error("golden vector '{name}' failed to encode: {source}")]
    Codec {
        name: String,
        #[source]
        source: CodecError,
    },
}

impl GoldenVector {
    fn new(
        name: &str,
        description: &str,
        hero: u32,
        cards: &[(u32, u32)],
        bytes_hex: &str,
        deck_code: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            hero,
            cards: cards.to_vec(),
            bytes_hex: bytes_hex.to_string(),
            deck_code: deck_code.to_string(),
        }
    }

    /// Encode the input and compare against the frozen bytes and text, then
    /// decode the text and compare against the input.
    pub fn verify(&self) -> Result<(), GoldenVectorMismatch> {
        let codec_err = |source| GoldenVectorMismatch::Codec {
            name: self.name.clone(),
            source,
        };

        let bytes = encode_deck_bytes(self.hero, &self.cards).map_err(codec_err)?;
        let actual_hex = hex::encode(&bytes);
        if actual_hex != self.bytes_hex {
            return Err(GoldenVectorMismatch::Bytes {
                name: self.name.clone(),
                expected: self.bytes_hex.clone(),
                actual: actual_hex,
            });
        }

        let code = crate::deckstring::encode_deck(self.hero, &self.cards).map_err(codec_err)?;
        if code != self.deck_code {
            return Err(GoldenVectorMismatch::DeckCode {
                name: self.name.clone(),
                expected: self.deck_code.clone(),
                actual: code,
            });
        }

        let deck = decode_deck(&self.deck_code).map_err(codec_err)?;
        let mut expected = self.cards.clone();
        expected.sort_unstable();
        if deck.heroes != [self.hero] || deck.sorted_cards() != expected {
            return Err(GoldenVectorMismatch::RoundTrip {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoldenVectors {
    pub schema_version: u32,
    pub vectors: Vec<GoldenVector>,
}

impl GoldenVectors {
    /// The frozen vector set.
    pub fn canonical() -> Self {
        let vectors = vec![
            GoldenVector::new(
                "empty_deck",
                "Hero only, all three sections empty",
                7,
                &[],
                "0001020107000000",
                "AAECAQcAAAA=",
            ),
            GoldenVector::new(
                "one_per_section",
                "One card in each of the single, double and N sections",
                637,
                &[(1001, 1), (1002, 2), (1003, 3)],
                "00010201fd0401e90701ea0701eb0703",
                "AAECAf0EAekHAeoHAesHAw==",
            ),
            GoldenVector::new(
                "unsorted_input",
                "Singles given out of order are written ascending; multi-byte ids",
                7,
                &[(300, 1), (128, 2), (1, 1)],
                "00010201070201ac0201800100",
                "AAECAQcCAawCAYABAA==",
            ),
        ];
        Self {
            schema_version: GOLDEN_VECTORS_SCHEMA_VERSION,
            vectors,
        }
    }

    pub fn get(&self, name: &str) -> Option<&GoldenVector> {
        self.vectors.iter().find(|v| v.name == name)
    }

    /// Verify every vector, stopping at the first mismatch.
    pub fn verify_all(&self) -> Result<(), GoldenVectorMismatch> {
        self.vectors.iter().try_for_each(GoldenVector::verify)
    }
}

/// Export the canonical vectors as pretty JSON for other implementations.
pub fn export_golden_vectors_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&GoldenVectors::canonical())
}
