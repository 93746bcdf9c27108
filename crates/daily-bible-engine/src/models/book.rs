use serde::{Deserialize, Serialize};

pub type BookId = u32;

/// Chapter index within a book.
pub type ChapterNumber = u32;

/// Which part of the canon a book belongs to.
///
/// The service sends `"OT"` / `"NT"`; anything else is kept verbatim so it can
/// still be grouped and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Testament {
    Old,
    New,
    Other(String),
}

impl Testament {
    /// Section heading used when grouping books
    pub fn title(&self) -> &str {
        match self {
            Testament::Old => "Old Testament",
            Testament::New => "New Testament",
            Testament::Other(label) => label,
        }
    }
}

impl From<String> for Testament {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OT" => Testament::Old,
            "NT" => Testament::New,
            _ => Testament::Other(value),
        }
    }
}

impl From<Testament> for String {
    fn from(value: Testament) -> Self {
        match value {
            Testament::Old => "OT".to_string(),
            Testament::New => "NT".to_string(),
            Testament::Other(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A book of the Bible as listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub testament: Testament,
    pub genre: Genre,
}

/// Wire shape of one entry in the chapter listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub id: ChapterNumber,
}

/// Books sharing a testament, ready for a sectioned list.
#[derive(Debug, Clone, PartialEq)]
pub struct BookSection {
    pub title: String,
    pub books: Vec<Book>,
}

/// Group books into testament sections.
///
/// Old Testament comes first, then New Testament, then any other labels in the
/// order they first appear. Books within a section are sorted by id.
pub fn group_by_testament(books: &[Book]) -> Vec<BookSection> {
    let mut sections: Vec<BookSection> = vec![
        BookSection {
            title: Testament::Old.title().to_string(),
            books: Vec::new(),
        },
        BookSection {
            title: Testament::New.title().to_string(),
            books: Vec::new(),
        },
    ];

    for book in books {
        let title = book.testament.title();
        match sections.iter_mut().find(|s| s.title == title) {
            Some(section) => section.books.push(book.clone()),
            None => sections.push(BookSection {
                title: title.to_string(),
                books: vec![book.clone()],
            }),
        }
    }

    sections.retain(|s| !s.books.is_empty());
    for section in &mut sections {
        section.books.sort_by_key(|b| b.id);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::book;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_testament_deserializes_known_and_unknown_labels() {
        let json = r#"[
            {"id": 1, "name": "Genesis", "testament": "OT", "genre": {"id": 1, "name": "Law"}},
            {"id": 40, "name": "Matthew", "testament": "NT", "genre": {"id": 5, "name": "Gospels"}},
            {"id": 99, "name": "Tobit", "testament": "Apocrypha", "genre": {"id": 9, "name": "Other"}}
        ]"#;

        let books: Vec<Book> = serde_json::from_str(json).unwrap();

        assert_eq!(books[0].testament, Testament::Old);
        assert_eq!(books[1].testament, Testament::New);
        assert_eq!(
            books[2].testament,
            Testament::Other("Apocrypha".to_string())
        );
        assert_eq!(books[1].genre.name, "Gospels");
    }

    #[test]
    fn test_testament_serializes_back_to_wire_label() {
        let value = serde_json::to_value(Testament::New).unwrap();
        assert_eq!(value, serde_json::json!("NT"));
    }

    #[test]
    fn test_group_orders_sections_and_sorts_books() {
        let books = vec![
            book(41, "Mark", "NT"),
            book(2, "Exodus", "OT"),
            book(99, "Tobit", "Apocrypha"),
            book(1, "Genesis", "OT"),
            book(40, "Matthew", "NT"),
        ];

        let sections = group_by_testament(&books);

        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Old Testament", "New Testament", "Apocrypha"]);

        let ot: Vec<_> = sections[0].books.iter().map(|b| b.id).collect();
        assert_eq!(ot, vec![1, 2]);
        let nt: Vec<_> = sections[1].books.iter().map(|b| b.id).collect();
        assert_eq!(nt, vec![40, 41]);
    }

    #[test]
    fn test_group_skips_empty_testaments() {
        let books = vec![book(40, "Matthew", "NT")];

        let sections = group_by_testament(&books);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "New Testament");
    }

    #[test]
    fn test_group_of_nothing_is_empty() {
        assert!(group_by_testament(&[]).is_empty());
    }
}
