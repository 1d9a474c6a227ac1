use core::fmt::Debug;
use std::borrow::Cow;

use tracing::warn;

use super::crc32::png_crc;
use crate::ascii_array::AsciiArray;

/// The fixed 8 bytes that open every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Does this buffer start with the PNG signature?
#[inline]
#[must_use]
pub const fn is_png_signature(bytes: &[u8]) -> bool {
  matches!(bytes, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..])
}

/// A four-byte PNG chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub AsciiArray<4>);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(AsciiArray(*b"IHDR"));
  pub const IDAT: Self = Self(AsciiArray(*b"IDAT"));
  pub const IEND: Self = Self(AsciiArray(*b"IEND"));
  pub const tEXt: Self = Self(AsciiArray(*b"tEXt"));

  /// The raw tag bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; 4] {
    self.0.as_bytes()
  }
}
impl core::fmt::Debug for ChunkType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Display::fmt(&self.0, f)
  }
}
impl From<[u8; 4]> for ChunkType {
  #[inline]
  #[must_use]
  fn from(array: [u8; 4]) -> Self {
    Self(AsciiArray(array))
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunk<'b> {
  pub(crate) ty: ChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Each chunk on the wire is `u32_be length`, the 4-byte type tag, `length`
/// data bytes, then a `u32_be` CRC over tag and data. Truncated trailing
/// records just end the iteration; nothing here panics on garbage input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawChunkIter<'b>(&'b [u8]);
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = RawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let chunk_len: u32 = if self.0.len() >= 4 {
      let (len_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      u32::from_be_bytes(len_bytes.try_into().unwrap())
    } else {
      return None;
    };
    let ty: ChunkType = if self.0.len() >= 4 {
      let (type_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      ChunkType::from(<[u8; 4]>::try_from(type_bytes).unwrap())
    } else {
      return None;
    };
    let data: &'b [u8] = if self.0.len() >= chunk_len as usize {
      let (data, rest) = self.0.split_at(chunk_len as usize);
      self.0 = rest;
      data
    } else {
      return None;
    };
    let declared_crc: u32 = if self.0.len() >= 4 {
      let (decl_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      u32::from_be_bytes(decl_bytes.try_into().unwrap())
    } else {
      return None;
    };
    Some(RawChunk { ty, data, declared_crc })
  }
}

/// A chunk held as a value, ready to be re-serialized.
///
/// Chunks lifted out of an existing stream borrow their data; chunks built
/// fresh own it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunk<'b> {
  /// The four-byte type tag.
  pub ty: ChunkType,
  /// The chunk's payload, without length or CRC.
  pub data: Cow<'b, [u8]>,
}
impl<'b> From<RawChunk<'b>> for PngChunk<'b> {
  #[inline]
  #[must_use]
  fn from(raw: RawChunk<'b>) -> Self {
    Self { ty: raw.ty, data: Cow::Borrowed(raw.data) }
  }
}

/// What to do about the per-chunk CRC values declared by the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrcPolicy {
  /// Consume the declared CRC without checking it.
  ///
  /// PNG's checksums guard against 1990s-era transfer corruption; most
  /// decoders skip them and so does this one unless asked otherwise.
  #[default]
  Lenient,
  /// Recompute each chunk's CRC and stop at the first mismatch.
  Strict,
}

/// Options for [`read_chunks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
  /// CRC handling, [`CrcPolicy::Lenient`] by default.
  pub crc: CrcPolicy,
}

/// Reads a PNG stream into its ordered chunk sequence.
///
/// An input that doesn't open with the PNG signature gives an empty sequence:
/// that's the sole "this isn't a PNG" signal. Otherwise chunks are collected
/// in order up to and including `IEND`; anything past `IEND` is ignored.
///
/// Under [`CrcPolicy::Strict`] the sequence is cut off at the first chunk
/// whose declared CRC doesn't match a recomputation, which generally leaves
/// the sequence without its `IEND` and makes re-serialization refuse to run.
#[must_use]
pub fn read_chunks(bytes: &[u8], options: ReadOptions) -> Vec<PngChunk<'_>> {
  if !is_png_signature(bytes) {
    return Vec::new();
  }
  let mut chunks = Vec::new();
  for raw in RawChunkIter::new(bytes) {
    if options.crc == CrcPolicy::Strict {
      let actual = png_crc(raw.ty.as_bytes().iter().copied().chain(raw.data.iter().copied()));
      if actual != raw.declared_crc {
        warn!(
          ty = ?raw.ty,
          declared = raw.declared_crc,
          actual,
          "chunk crc mismatch, cutting off the chunk sequence"
        );
        break;
      }
    }
    let ty = raw.ty;
    chunks.push(PngChunk::from(raw));
    if ty == ChunkType::IEND {
      break;
    }
  }
  chunks
}
