use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lorebook::Lorebook;

/// A character card, the structured payload this whole crate exists to carry.
///
/// Field names follow the `chara_card_v3` wire vocabulary exactly, so the
/// struct serializes to interchange-ready JSON with no renaming layer. Cards
/// in the wild are frequently partial, so every field tolerates being absent
/// on import and the required strings just default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterCard {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub personality: String,
  #[serde(default)]
  pub scenario: String,
  /// The character's opening message.
  #[serde(default)]
  pub first_mes: String,
  /// Example dialogue.
  #[serde(default)]
  pub mes_example: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creator_notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub system_prompt: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post_history_instructions: Option<String>,
  /// Normalized on import: accepts either a sequence of strings or one
  /// comma-delimited string, and anything else becomes empty.
  #[serde(default, deserialize_with = "de_tags")]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creator: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub character_version: Option<String>,
  /// The embedded lorebook, if the card carries one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub character_book: Option<Lorebook>,
}

fn de_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(normalize_tags(&value))
}

/// The tag normalization rule: older cards store `tags` as one
/// comma-delimited string, current cards store a sequence of strings.
pub(crate) fn normalize_tags(value: &Value) -> Vec<String> {
  match value {
    Value::String(s) => s.split(',').map(|tag| tag.trim().to_string()).collect(),
    Value::Array(items) => {
      items.iter().filter_map(Value::as_str).map(String::from).collect()
    }
    _ => Vec::new(),
  }
}
