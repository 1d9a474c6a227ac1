#![forbid(unsafe_code)]

//! A crate for carrying character card data inside PNG files.
//!
//! A "character card" is a structured record (persona text, dialogue seeds,
//! optionally a lorebook of keyed snippets) that travels embedded in an
//! ordinary PNG, so one image file is the whole distributable artifact. The
//! card rides in a `tEXt` chunk under the keyword `"chara"`, as base64 of the
//! UTF-8 JSON of a `{spec, spec_version, data}` envelope.
//!
//! This is *not* a PNG decoder. The [`png`] module works purely at the chunk
//! level: it can split a PNG byte stream into chunks, splice in a metadata
//! chunk ahead of `IEND`, and re-serialize with correct CRCs, all without
//! looking at pixel data.
//!
//! The two entry points most applications want:
//!
//! ```
//! use cardpng::{embed, extract, CharacterCard};
//!
//! # fn demo(image_bytes: &[u8]) -> Result<(), cardpng::CardPngError> {
//! let card = CharacterCard { name: "Aria".to_string(), ..CharacterCard::default() };
//! let tagged: Vec<u8> = embed(image_bytes, &card)?;
//! assert_eq!(extract(&tagged), Some(card));
//! # Ok(()) }
//! ```
//!
//! Malformed or absent metadata is a normal condition ([`extract`] gives
//! `None`); errors are reserved for inputs that structurally can't produce
//! valid output (not a PNG, or no `IEND` to splice ahead of).

pub mod ascii_array;
pub use ascii_array::*;

mod error;
pub use error::*;

pub mod png;

pub mod card;
pub use card::{CharacterCard, EntryId, EntryPosition, Extensions, Lorebook, LorebookEntry};

use card::{build_text_chunk, chunk_keyword_is, find_card, CHARA_KEYWORD};
use png::{is_png_signature, read_chunks, write_chunks, ChunkType, ReadOptions};

/// Pulls the embedded character card out of a PNG, if there is one.
///
/// `None` covers both "not a PNG" and "no (decodable) card chunk"; a plain
/// image with no metadata is a perfectly normal input.
#[inline]
#[must_use]
pub fn extract(image_bytes: &[u8]) -> Option<CharacterCard> {
  extract_with(image_bytes, ReadOptions::default())
}

/// [`extract`] with explicit read options (e.g. strict CRC checking).
#[must_use]
pub fn extract_with(image_bytes: &[u8], options: ReadOptions) -> Option<CharacterCard> {
  let chunks = read_chunks(image_bytes, options);
  find_card(&chunks, CHARA_KEYWORD)
}

/// Produces a copy of the image with the card embedded as its only `"chara"`
/// metadata chunk.
///
/// Any existing `"chara"` chunks are removed first (even duplicates left by
/// other tooling), then the fresh chunk is spliced in immediately before
/// `IEND` with every other chunk's relative order preserved. Re-embedding is
/// stable: the chunk count never grows across repeated calls.
#[inline]
pub fn embed(image_bytes: &[u8], card: &CharacterCard) -> Result<Vec<u8>, CardPngError> {
  embed_with(image_bytes, card, ReadOptions::default())
}

/// [`embed`] with explicit read options (e.g. strict CRC checking).
pub fn embed_with(
  image_bytes: &[u8], card: &CharacterCard, options: ReadOptions,
) -> Result<Vec<u8>, CardPngError> {
  if !is_png_signature(image_bytes) {
    return Err(CardPngError::NotPng);
  }
  let mut chunks = read_chunks(image_bytes, options);
  chunks.retain(|chunk| !chunk_keyword_is(chunk, CHARA_KEYWORD));
  let iend =
    chunks.iter().position(|c| c.ty == ChunkType::IEND).ok_or(CardPngError::MissingIend)?;
  chunks.insert(iend, build_text_chunk(CHARA_KEYWORD, card));
  Ok(write_chunks(&chunks))
}
