//! The `tEXt` metadata codec: a card in, a chunk out, and back again.
//!
//! The chunk data layout is the standard `tEXt` one: an ascii keyword, one
//! null byte, then the text. The text here is the base64 of the UTF-8 JSON of
//! the card's envelope, which keeps the chunk data inside `tEXt`'s
//! single-byte-character rules no matter what the card contains.

use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{card_from_value, CardEnvelope};
use super::payload::CharacterCard;
use crate::png::{ChunkType, PngChunk};

/// The `tEXt` keyword under which character cards are embedded.
pub const CHARA_KEYWORD: &str = "chara";

/// Builds the `tEXt` chunk carrying a card under the given keyword.
#[must_use]
pub fn build_text_chunk(keyword: &str, card: &CharacterCard) -> PngChunk<'static> {
  let envelope = CardEnvelope::wrap(card.clone());
  let json = serde_json::to_string(&envelope).unwrap_or_default();
  let b64 = BASE64.encode(json.as_bytes());
  let mut data = Vec::with_capacity(keyword.len() + 1 + b64.len());
  data.extend_from_slice(keyword.as_bytes());
  data.push(0);
  data.extend_from_slice(b64.as_bytes());
  PngChunk { ty: ChunkType::tEXt, data: Cow::Owned(data) }
}

/// Splits `tEXt` chunk data at the first null byte into keyword and text.
fn split_keyword(data: &[u8]) -> Option<(&[u8], &[u8])> {
  let null = data.iter().position(|&b| b == 0)?;
  Some((&data[..null], &data[null + 1..]))
}

/// Is this a `tEXt` chunk with the given keyword?
pub(crate) fn chunk_keyword_is(chunk: &PngChunk<'_>, keyword: &str) -> bool {
  chunk.ty == ChunkType::tEXt
    && split_keyword(&chunk.data).is_some_and(|(kw, _)| kw == keyword.as_bytes())
}

/// Scans a chunk sequence for a card embedded under the given keyword.
///
/// Matching chunks are tried in order; one that fails to decode (bad base64,
/// bad JSON, family envelope missing its `data`) is skipped with a warning
/// and the scan moves on to any later match. Absence only when no match
/// decodes.
#[must_use]
pub fn find_card(chunks: &[PngChunk<'_>], keyword: &str) -> Option<CharacterCard> {
  for chunk in chunks.iter().filter(|c| c.ty == ChunkType::tEXt) {
    let Some((kw, text)) = split_keyword(&chunk.data) else { continue };
    if kw != keyword.as_bytes() {
      continue;
    }
    match decode_card_text(text) {
      Ok(card) => return Some(card),
      Err(why) => warn!(keyword, %why, "skipping malformed metadata chunk"),
    }
  }
  debug!(keyword, "no metadata chunk decoded");
  None
}

fn decode_card_text(text: &[u8]) -> Result<CharacterCard, String> {
  let json_bytes = BASE64.decode(text).map_err(|e| e.to_string())?;
  let value: Value = serde_json::from_slice(&json_bytes).map_err(|e| e.to_string())?;
  card_from_value(value).map_err(|e| e.to_string())
}
