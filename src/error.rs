use thiserror::Error;

/// An error from the `cardpng` crate.
///
/// Malformed *metadata* is never an error: a PNG without an embedded card is
/// a perfectly normal input, so [`extract`](crate::extract) reports absence
/// with `None` instead. Errors are reserved for the cases where valid output
/// cannot be produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardPngError {
  /// The buffer does not start with the 8-byte PNG signature.
  #[error("not a png: bad signature")]
  NotPng,

  /// The image has no `IEND` chunk.
  ///
  /// A container without the terminal chunk can't be safely re-serialized,
  /// so embedding refuses to produce output.
  #[error("png has no IEND chunk")]
  MissingIend,

  /// The JSON file interface was handed text that isn't a character card in
  /// any accepted shape.
  #[error("invalid card json: {0}")]
  InvalidJson(String),
}
