//! Turning fetched verses and local annotations into something drawable.

pub mod compositor;
pub mod snapshot;

pub use compositor::{VerseSegment, apply_edit, compose, to_marked_text};
pub use snapshot::{ReaderSnapshot, RenderVerse, VerseListStatus};
