//! Normalisation of admin API payloads
//!
//! The admin front-end posts loosely typed JSON: ids may arrive as
//! numbers or strings, text fields may be missing, tags come as
//! `[{"text": ...}]`. Everything is coerced here into typed inputs that
//! the repositories write verbatim.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::html::Sanitizer;
use crate::kind::PageKind;
use crate::label::{self, MAIN_LABEL};
use crate::validation::ValidationError;

/// Minimum tag name length in characters.
const MIN_TAG_LEN: usize = 2;

/// Minimum question heading length in characters.
const MIN_QUESTION_HEADING_LEN: usize = 3;

/// Borrowed view over a JSON object with lenient accessors.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(ValidationError::InvalidFormat {
                field: "payload",
                reason: "expected a JSON object",
            }),
        }
    }

    /// Integer id from a number or a numeric string. Missing, null and
    /// blank values are `None`.
    pub fn id(&self, key: &'static str) -> Result<Option<i32>, ValidationError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Some)
                .ok_or(ValidationError::InvalidFormat {
                    field: key,
                    reason: "must be an integer",
                }),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| {
                ValidationError::InvalidFormat {
                    field: key,
                    reason: "must be an integer",
                }
            }),
            Some(_) => Err(ValidationError::InvalidFormat {
                field: key,
                reason: "must be an integer",
            }),
        }
    }

    /// Trimmed text; missing and null give an empty string, numbers and
    /// booleans their JSON spelling.
    pub fn text(&self, key: &str) -> String {
        match self.map.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_owned(),
            Some(other) => other.to_string(),
        }
    }

    /// Trimmed rich text passed through the sanitizer.
    pub fn html(&self, key: &str, sanitizer: &Sanitizer) -> String {
        sanitizer.clean(&self.text(key))
    }

    /// Integer with a default for missing values.
    pub fn int_or(&self, key: &'static str, default: i32) -> Result<i32, ValidationError> {
        Ok(self.id(key)?.unwrap_or(default))
    }

    /// Truthiness of a field, `default` when absent.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.map.get(key) {
            None => default,
            Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    /// Tag names from `[{"text": ...}]` or `["..."]`.
    pub fn tags(&self, key: &str) -> Result<Vec<String>, ValidationError> {
        let Some(Value::Array(items)) = self.map.get(key) else {
            return Ok(Vec::new());
        };
        let names = items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(o) => o.get("text").and_then(Value::as_str),
            _ => None,
        });
        normalize_tags(names)
    }
}

/// Trim tag names, drop blanks and case-insensitive duplicates (first
/// spelling wins) and check the minimum length.
pub fn normalize_tags<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names.into_iter().map(str::trim).filter(|n| !n.is_empty()) {
        if name.chars().count() < MIN_TAG_LEN {
            return Err(ValidationError::TooShort {
                field: "tag name",
                min: MIN_TAG_LEN,
            });
        }
        if seen.insert(name.to_lowercase()) {
            out.push(name.to_owned());
        }
    }
    Ok(out)
}

/// Validated page create/update input
#[derive(Debug, Clone, PartialEq)]
pub struct PageInput {
    pub id: Option<i32>,
    pub label: String,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub kind: PageKind,
    pub priority: i32,
    pub visible_in_menu: bool,
    pub parent_id: Option<i32>,
    pub aux: [String; 3],
    pub tags: Vec<String>,
}

impl PageInput {
    pub fn from_json(value: &Value, sanitizer: &Sanitizer) -> Result<Self, ValidationError> {
        let f = Fields::new(value)?;

        let label = f.text("label").to_lowercase();
        label::Label::new(&label)?;

        let heading = f.text("heading");
        if heading.is_empty() {
            return Err(ValidationError::Empty { field: "heading" });
        }

        let kind_text = f.text("kind");
        if kind_text.is_empty() {
            return Err(ValidationError::Missing { field: "kind" });
        }
        let kind: PageKind = kind_text.parse()?;

        if (kind == PageKind::Main) != (label == MAIN_LABEL) {
            return Err(ValidationError::InvalidFormat {
                field: "label",
                reason: "the label 'main' is reserved for the main page",
            });
        }

        let parent_id = f.id("parent_id")?;
        if !kind.is_top_level() && kind != PageKind::Main && parent_id.is_none() {
            return Err(ValidationError::Missing { field: "parent_id" });
        }

        Ok(Self {
            id: f.id("id")?,
            label,
            heading,
            title: f.text("title"),
            description: f.text("description"),
            content: f.html("content", sanitizer),
            kind,
            priority: f.int_or("priority", 0)?,
            visible_in_menu: f.flag("visible_in_menu", true),
            parent_id,
            aux: [f.text("aux_field_1"), f.text("aux_field_2"), f.text("aux_field_3")],
            tags: f.tags("tags")?,
        })
    }
}

/// Validated question create/update input
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionInput {
    pub id: Option<i32>,
    pub parent_id: i32,
    pub jurist_id: Option<i32>,
    pub heading: String,
    pub content_question: String,
    pub content_answer: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl QuestionInput {
    pub fn from_json(value: &Value, sanitizer: &Sanitizer) -> Result<Self, ValidationError> {
        let f = Fields::new(value)?;

        let heading = f.text("heading");
        if heading.chars().count() < MIN_QUESTION_HEADING_LEN {
            return Err(ValidationError::TooShort {
                field: "heading",
                min: MIN_QUESTION_HEADING_LEN,
            });
        }

        Ok(Self {
            id: f.id("id")?,
            parent_id: f.id("parent_id")?.ok_or(ValidationError::Missing { field: "parent_id" })?,
            jurist_id: f.id("jurist_id")?,
            heading,
            content_question: f.html("content_question", sanitizer),
            content_answer: f.html("content_answer", sanitizer),
            author: f.text("author"),
            tags: f.tags("tags")?,
        })
    }
}

/// Validated shortcode create/update input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeInput {
    pub id: Option<i32>,
    pub key: String,
    pub value: String,
    pub comment: String,
}

impl ShortcodeInput {
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let f = Fields::new(value)?;
        let key = f.text("key");
        if key.is_empty() {
            return Err(ValidationError::Empty { field: "key" });
        }
        if !label::is_valid(&key) {
            return Err(ValidationError::InvalidFormat {
                field: "key",
                reason: "must contain only lowercase latin letters, digits and hyphens",
            });
        }
        Ok(Self {
            id: f.id("id")?,
            key,
            value: f.text("value"),
            comment: f.text("comment"),
        })
    }
}
