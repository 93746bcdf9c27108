pub mod book;
pub mod translation;
pub mod verse;

pub use book::{
    Book, BookId, BookSection, ChapterEntry, ChapterNumber, Genre, Testament, group_by_testament,
};
pub use translation::{
    DEFAULT_TRANSLATION, Translation, TranslationOption, popular_translations,
    translation_options,
};
pub use verse::{BookRef, Verse, VerseId};
