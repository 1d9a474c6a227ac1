//! The payload layer: the character card model, its lorebook, the spec
//! envelope, and the `tEXt` chunk codec that carries all of it.

mod payload;
pub use payload::*;

mod lorebook;
pub use lorebook::*;

mod envelope;
pub use envelope::*;

mod text_chunk;
pub use text_chunk::*;
