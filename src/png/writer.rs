use super::crc32::png_crc;
use super::raw_chunk::{PngChunk, PNG_SIGNATURE};

/// Serializes a chunk sequence back into PNG bytes.
///
/// Emits the 8-byte signature, then each chunk in order as `u32_be length`,
/// the type tag, the data, and a freshly computed `u32_be` CRC over tag and
/// data. Whatever CRC the chunk carried when it was read is irrelevant here;
/// the output is always internally consistent.
///
/// The input is not inspected for structural sense (that's the embed
/// pipeline's job), so this is a pure function of the sequence: output length
/// is exactly `8 + Σ(12 + data.len())`.
#[must_use]
pub fn write_chunks(chunks: &[PngChunk<'_>]) -> Vec<u8> {
  let total: usize = 8 + chunks.iter().map(|c| 12 + c.data.len()).sum::<usize>();
  let mut out = Vec::with_capacity(total);
  out.extend_from_slice(&PNG_SIGNATURE);
  for chunk in chunks {
    out.extend_from_slice(&(chunk.data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk.ty.as_bytes());
    out.extend_from_slice(&chunk.data);
    let crc = png_crc(chunk.ty.as_bytes().iter().copied().chain(chunk.data.iter().copied()));
    out.extend_from_slice(&crc.to_be_bytes());
  }
  debug_assert_eq!(out.len(), total);
  out
}
