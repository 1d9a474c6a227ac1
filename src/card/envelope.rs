//! The `{spec, spec_version, data}` envelope and the JSON file interface.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lorebook::Lorebook;
use super::payload::CharacterCard;
use crate::error::CardPngError;

/// The spec identifier written on every exported card.
pub const CARD_SPEC: &str = "chara_card_v3";
/// The spec revision written on every exported card.
pub const CARD_SPEC_VERSION: &str = "3.0";
/// Any spec identifier with this prefix is treated as one of ours on import.
pub const CARD_SPEC_FAMILY: &str = "chara_card_v";

/// The versioned wrapper a card travels in, both in PNG chunks and in
/// exported JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEnvelope {
  pub spec: String,
  pub spec_version: String,
  pub data: CharacterCard,
}
impl CardEnvelope {
  /// Wraps a card in the current spec envelope.
  #[inline]
  #[must_use]
  pub fn wrap(data: CharacterCard) -> Self {
    CardEnvelope {
      spec: CARD_SPEC.to_string(),
      spec_version: CARD_SPEC_VERSION.to_string(),
      data,
    }
  }
}

/// Reads a card out of an already-parsed JSON value, enveloped or bare.
///
/// The unwrap rule: an object whose `spec` is a string starting with
/// `chara_card_v` *and* which has a `data` member yields that `data`; a
/// family-tagged object *without* `data` is malformed; anything else is taken
/// to be a bare pre-envelope card and parsed as-is.
pub(crate) fn card_from_value(value: Value) -> Result<CharacterCard, serde_json::Error> {
  let payload = match value {
    Value::Object(mut map) => {
      let in_family = map
        .get("spec")
        .and_then(Value::as_str)
        .is_some_and(|spec| spec.starts_with(CARD_SPEC_FAMILY));
      if in_family {
        map.remove("data").ok_or_else(|| serde_json::Error::custom("envelope has no data member"))?
      } else {
        Value::Object(map)
      }
    }
    other => other,
  };
  serde_json::from_value(payload)
}

/// Parses a card from JSON text, accepting the enveloped form or a bare
/// payload object. This is the import half of the file interface.
pub fn card_from_json_str(text: &str) -> Result<CharacterCard, CardPngError> {
  let value: Value =
    serde_json::from_str(text).map_err(|e| CardPngError::InvalidJson(e.to_string()))?;
  card_from_value(value).map_err(|e| CardPngError::InvalidJson(e.to_string()))
}

/// Renders a card as pretty-printed, enveloped JSON text for file export.
#[must_use]
pub fn card_to_json_string(card: &CharacterCard) -> String {
  serde_json::to_string_pretty(&CardEnvelope::wrap(card.clone())).unwrap_or_default()
}

/// Renders a standalone lorebook export: the bare lorebook object, no
/// envelope.
#[must_use]
pub fn lorebook_to_json_string(lorebook: &Lorebook) -> String {
  serde_json::to_string_pretty(lorebook).unwrap_or_default()
}

/// The file name a standalone lorebook export should get, derived from the
/// lorebook's own name when it has one.
#[must_use]
pub fn lorebook_export_file_name(lorebook: &Lorebook) -> String {
  match lorebook.name.as_deref() {
    Some(name) if !name.trim().is_empty() => format!("{}.json", name.trim()),
    _ => "lorebook.json".to_string(),
  }
}
