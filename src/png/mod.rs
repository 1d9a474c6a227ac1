//! The PNG container layer: chunk reading, chunk writing, and the CRC.
//!
//! This is deliberately *not* a PNG decoder. The information a PNG carries is
//! stored in "chunks", and everything this crate needs — finding a `tEXt`
//! chunk, splicing one in ahead of `IEND`, keeping every chunk's CRC correct —
//! works at the chunk level without ever touching pixel data. Color types,
//! interlacing, and the compressed image stream all pass through untouched as
//! opaque chunk payloads.

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod writer;
pub use writer::*;
