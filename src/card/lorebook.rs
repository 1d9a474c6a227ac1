//! The lorebook ("world info") model.
//!
//! Lorebook entries have accumulated several generations of field spellings
//! out in the wild: `key` vs `keys`, `keysecondary` vs `secondary_keys`,
//! `order`/`priority` vs `insertion_order`, an inverted `disable` instead of
//! `enabled`, and both string and numeric `position` vocabularies. One
//! canonical schema lives here; every historical spelling is resolved in
//! [`RawEntry`] at the serde decode boundary and nowhere else. Serialization
//! only ever emits the canonical names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque bag of app-specific keys, round-tripped without interpretation.
///
/// `serde_json`'s `preserve_order` feature is enabled, so key order survives
/// a decode/encode round trip too.
pub type Extensions = serde_json::Map<String, Value>;

/// An auxiliary collection of keyed text snippets carried alongside a card.
///
/// Entry list order is the editing order; `insertion_order` on each entry is
/// what downstream consumers sort by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lorebook {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scan_depth: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub token_budget: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recursive_scanning: Option<bool>,
  #[serde(default)]
  pub entries: Vec<LorebookEntry>,
  #[serde(default, skip_serializing_if = "Extensions::is_empty")]
  pub extensions: Extensions,
}

/// An entry's identity key, assigned at creation and stable for the session.
///
/// Numeric in every card this crate has seen (editors tend to use a
/// millisecond timestamp), but strings appear in other tooling's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
  Num(i64),
  Text(String),
}
impl Default for EntryId {
  #[inline]
  fn default() -> Self {
    EntryId::Num(0)
  }
}

/// Where an entry's content gets injected, relative to the prompt structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPosition {
  BeforeChar,
  AfterChar,
  AfterPrompt,
}
impl EntryPosition {
  /// Reads any of the historical `position` vocabularies: the canonical
  /// strings, or the numeric encoding (`0` before, `1` after the character
  /// definition). Anything unrecognized is simply no position.
  #[must_use]
  pub(crate) fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) => match s.as_str() {
        "before_char" => Some(EntryPosition::BeforeChar),
        "after_char" => Some(EntryPosition::AfterChar),
        "after_prompt" => Some(EntryPosition::AfterPrompt),
        _ => None,
      },
      Value::Number(n) => match n.as_i64() {
        Some(0) => Some(EntryPosition::BeforeChar),
        Some(1) => Some(EntryPosition::AfterChar),
        _ => None,
      },
      _ => None,
    }
  }
}

/// A single keyed snippet.
///
/// The codec never enforces content rules (an entry with no trigger keys is
/// carried as-is); validity is the editing layer's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct LorebookEntry {
  pub id: EntryId,
  /// Trigger keys that activate this entry.
  pub keys: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub secondary_keys: Option<Vec<String>>,
  pub content: String,
  pub enabled: bool,
  pub constant: bool,
  pub case_sensitive: bool,
  pub use_regex: bool,
  pub selective: bool,
  pub insertion_order: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position: Option<EntryPosition>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
  #[serde(default, skip_serializing_if = "Extensions::is_empty")]
  pub extensions: Extensions,
}
impl Default for LorebookEntry {
  #[inline]
  fn default() -> Self {
    LorebookEntry {
      id: EntryId::default(),
      keys: Vec::new(),
      secondary_keys: None,
      content: String::new(),
      enabled: true,
      constant: false,
      case_sensitive: false,
      use_regex: false,
      selective: false,
      insertion_order: 0,
      position: None,
      comment: None,
      extensions: Extensions::new(),
    }
  }
}

/// The decode-boundary shape of an entry: every accepted spelling of every
/// field, resolved into the canonical [`LorebookEntry`] by the `From` impl.
#[derive(Deserialize)]
struct RawEntry {
  #[serde(default)]
  id: Option<EntryId>,
  #[serde(default, alias = "key")]
  keys: Option<Vec<String>>,
  #[serde(default, alias = "keysecondary")]
  secondary_keys: Option<Vec<String>>,
  #[serde(default)]
  content: String,
  #[serde(default)]
  enabled: Option<bool>,
  /// Legacy inverted spelling of `enabled`; `enabled` wins when both appear.
  #[serde(default)]
  disable: Option<bool>,
  #[serde(default)]
  constant: bool,
  #[serde(default)]
  case_sensitive: bool,
  #[serde(default)]
  use_regex: bool,
  #[serde(default)]
  selective: bool,
  #[serde(default, alias = "order", alias = "priority")]
  insertion_order: Option<i64>,
  #[serde(default)]
  position: Option<Value>,
  #[serde(default)]
  comment: Option<String>,
  #[serde(default)]
  extensions: Extensions,
}
impl From<RawEntry> for LorebookEntry {
  fn from(raw: RawEntry) -> Self {
    let enabled = match (raw.enabled, raw.disable) {
      (Some(enabled), _) => enabled,
      (None, Some(disable)) => !disable,
      (None, None) => true,
    };
    LorebookEntry {
      id: raw.id.unwrap_or_default(),
      keys: raw.keys.unwrap_or_default(),
      secondary_keys: raw.secondary_keys,
      content: raw.content,
      enabled,
      constant: raw.constant,
      case_sensitive: raw.case_sensitive,
      use_regex: raw.use_regex,
      selective: raw.selective,
      insertion_order: raw.insertion_order.unwrap_or(0),
      position: raw.position.as_ref().and_then(EntryPosition::from_value),
      comment: raw.comment,
      extensions: raw.extensions,
    }
  }
}
