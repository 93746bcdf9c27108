use serde::{Deserialize, Serialize};

/// Translation code used when nothing else is configured
pub const DEFAULT_TRANSLATION: &str = "KJV";

/// A reading edition offered by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: u32,
    pub table: String,
    pub language: String,
    pub abbreviation: String,
    pub version: String,
    #[serde(default)]
    pub info_url: Option<String>,
}

/// Entry in a translation picker: the code sent to the service plus a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOption {
    pub value: String,
    pub label: String,
}

impl From<&Translation> for TranslationOption {
    fn from(translation: &Translation) -> Self {
        Self {
            value: translation.abbreviation.clone(),
            label: translation.version.clone(),
        }
    }
}

const POPULAR: [(&str, &str); 5] = [
    ("KJV", "King James Version (KJV)"),
    ("ESV", "English Standard Version (ESV)"),
    ("NIV", "New International Version (NIV)"),
    ("NLT", "New Living Translation (NLT)"),
    ("ASV", "American Standard Version (ASV)"),
];

/// Built-in picker list, used when the service's catalogue is unavailable.
pub fn popular_translations() -> Vec<TranslationOption> {
    POPULAR
        .iter()
        .map(|(value, label)| TranslationOption {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// Picker options from a fetched catalogue, falling back to the built-in list
/// when the catalogue is empty.
pub fn translation_options(fetched: &[Translation]) -> Vec<TranslationOption> {
    if fetched.is_empty() {
        return popular_translations();
    }
    fetched.iter().map(TranslationOption::from).collect()
}
