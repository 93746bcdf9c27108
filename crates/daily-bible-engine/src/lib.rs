pub mod annotations;
pub mod api;
pub mod models;
pub mod reader;
pub mod rendering;
pub mod selection;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use annotations::{AnnotationStore, VerseEdit};
pub use api::{ApiError, BibleApi, DEFAULT_BASE_URL, HttpBibleClient};
pub use models::*;
pub use reader::Reader;
pub use rendering::*;
pub use selection::{
    FetchOutcome, FetchRequest, SelectionState, SelectionStateMachine, Stage, Ticket,
};
