//! The CRC-32 used by every PNG chunk.
//!
//! Polynomial `0xEDB88320`, register initialized to all-ones, each input byte
//! xor'd into the low byte before table lookup, final value complemented.
//!
//! The 256-entry lookup table is built by a `const fn`, so it's plain
//! immutable static data: there is no lazy run-time initialization to guard,
//! and concurrent callers can share it freely.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c = c >> 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the PNG CRC-32 of a byte sequence.
///
/// Total over every input, including the empty sequence (which is 0).
#[inline]
#[must_use]
pub fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  update_crc(u32::MAX, iter) ^ u32::MAX
}

/// [`png_crc`], but over a slice.
#[inline]
#[must_use]
pub fn png_crc_slice(bytes: &[u8]) -> u32 {
  png_crc(bytes.iter().copied())
}
