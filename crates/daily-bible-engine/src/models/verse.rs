use serde::{Deserialize, Serialize};

use super::book::{BookId, ChapterNumber, Testament};

/// Globally unique verse identifier. Stable across translations.
pub type VerseId = u64;

/// Trimmed-down book reference embedded in each verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: BookId,
    pub name: String,
    pub testament: Testament,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub id: VerseId,
    pub book: BookRef,
    pub chapter_id: ChapterNumber,
    /// Verse number within the chapter
    pub verse_id: u32,
    #[serde(rename = "verse")]
    pub text: String,
}
