//! Deck codes: the game client's compact deck format.
//!
//! A deck code is a Base64 string wrapping a short binary payload of
//! unsigned LEB128 VarInts (see [`deckstring`] for the layout). The format is
//! an external compatibility contract, so the encoder here must stay
//! byte-for-byte identical to the client's.
//!
//! # Example
//!
//! ```
//! use hearthpack_codec::{decode, encode};
//!
//! let code = encode(637, &[(1001, 1), (1002, 2), (1003, 3)]);
//! assert_eq!(code, "AAECAf0EAekHAeoHAesHAw==");
//!
//! let deck = decode(&code).expect("valid deck code");
//! assert_eq!(deck.heroes, vec![637]);
//! assert_eq!(deck.cards, vec![(1001, 1), (1002, 2), (1003, 3)]);
//! ```
//!
//! # Failure signalling
//!
//! [`encode_deck`] and [`decode_deck`] return [`CodecResult`]. The thin
//! [`encode`] and [`decode`] wrappers collapse failures into an empty string
//! and `None` respectively, for callers that only need to show an
//! "invalid code" message.

pub mod deckstring;
pub mod golden_vectors;
pub mod varint;

pub use deckstring::{
    decode, decode_deck, decode_deck_bytes, encode, encode_deck, encode_deck_bytes,
    extract_deck_code, format_name, DeckDefinition, DECK_CODE_VERSION, FORMAT_CLASSIC,
    FORMAT_STANDARD, FORMAT_TWIST, FORMAT_WILD, MAX_DECK_CODE_LEN,
};
pub use varint::{
    decode_varint, encode_varint, ByteReader, ByteWriter, CodecError, CodecResult, MAX_VARINT_LEN,
};
