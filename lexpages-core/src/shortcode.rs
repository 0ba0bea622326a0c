//! Shortcodes: `[key]` macros replaced by stored text at render time

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcode {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub comment: String,
}

/// Shortcodes loaded for one request.
#[derive(Debug, Clone, Default)]
pub struct ShortcodeSet {
    codes: Vec<(String, String)>,
}

impl ShortcodeSet {
    pub fn new(codes: impl IntoIterator<Item = Shortcode>) -> Self {
        Self {
            codes: codes.into_iter().map(|c| (c.key, c.value)).collect(),
        }
    }

    /// Replace every `[key]` occurrence with its value.
    pub fn apply(&self, text: &str) -> String {
        self.codes
            .iter()
            .fold(text.to_owned(), |acc, (key, value)| acc.replace(&format!("[{key}]"), value))
    }

    /// Value of `key`, or `default` if it is missing or empty.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.codes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
