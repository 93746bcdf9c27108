use regex::RegexBuilder;
use serde::Serialize;

use crate::annotations::VerseEdit;

/// A span of composed verse text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerseSegment {
    /// Verse text untouched by any edit
    Literal { text: String },
    /// An occurrence claimed by an edit. `original` is the text exactly as it
    /// appeared in the verse, which may differ in case from the edit.
    Substitution {
        original: String,
        replacement: String,
    },
}

impl VerseSegment {
    pub fn literal(text: impl Into<String>) -> Self {
        VerseSegment::Literal { text: text.into() }
    }

    pub fn substitution(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        VerseSegment::Substitution {
            original: original.into(),
            replacement: replacement.into(),
        }
    }
}

/// Overlay edits onto verse text.
///
/// Edits apply in order. Each edit scans only the literal spans left by the
/// edits before it, so a span claimed once is never matched again. Matching
/// is case-insensitive on the trimmed `original`, treated as a plain substring.
/// An edit that matches nothing leaves the sequence exactly as it was.
pub fn compose(text: &str, edits: &[VerseEdit]) -> Vec<VerseSegment> {
    edits
        .iter()
        .fold(vec![VerseSegment::literal(text)], |segments, edit| {
            apply_edit(segments, edit)
        })
}

/// Apply one edit to an already composed sequence.
pub fn apply_edit(segments: Vec<VerseSegment>, edit: &VerseEdit) -> Vec<VerseSegment> {
    let pattern = edit.pattern();
    if pattern.is_empty() {
        return segments;
    }

    let matcher = match RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => matcher,
        Err(e) => {
            log::warn!("Skipping edit {}: {e}", edit.id);
            return segments;
        }
    };

    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let text = match segment {
            VerseSegment::Literal { text } => text,
            claimed => {
                out.push(claimed);
                continue;
            }
        };
        if !matcher.is_match(&text) {
            out.push(VerseSegment::Literal { text });
            continue;
        }

        let mut last = 0;
        for found in matcher.find_iter(&text) {
            if found.start() > last {
                out.push(VerseSegment::literal(&text[last..found.start()]));
            }
            out.push(VerseSegment::substitution(
                found.as_str(),
                edit.replacement.as_str(),
            ));
            last = found.end();
        }
        if last < text.len() {
            out.push(VerseSegment::literal(&text[last..]));
        }
    }
    out
}

/// Flatten segments into a single line, marking substitutions as
/// `[original→replacement]`. Handy for plain-text frontends and logs.
pub fn to_marked_text(segments: &[VerseSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            VerseSegment::Literal { text } => text.clone(),
            VerseSegment::Substitution {
                original,
                replacement,
            } => format!("[{original}→{replacement}]"),
        })
        .collect()
}
