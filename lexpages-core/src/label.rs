//! Page labels (URL slugs): validation, generation and vacancy probing
//!
//! Label format: lowercase ASCII alphanumerics and hyphens, at least one
//! character. Matches the DB constraint `label ~ '^[a-z0-9-]{1,}$'`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::translit;
use crate::validation::ValidationError;

/// Label of the single root page.
pub const MAIN_LABEL: &str = "main";

/// Highest numeric suffix tried before falling back to a random one.
const MAX_SUFFIX_PROBES: u32 = 10;

/// Range of the random fallback suffix.
const FALLBACK_SUFFIX: std::ops::RangeInclusive<u32> = 23..=99;

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("invalid label regex"));

/// Validated page label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Create a label, validating its format.
    ///
    /// # Example
    /// ```
    /// use lexpages_core::label::Label;
    ///
    /// assert!(Label::new("family-law").is_ok());
    /// assert!(Label::new("Family").is_err());
    /// assert!(Label::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "label" });
        }
        if !is_valid(s) {
            return Err(ValidationError::InvalidFormat {
                field: "label",
                reason: "must contain only lowercase latin letters, digits and hyphens",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `s` has the label format.
pub fn is_valid(s: &str) -> bool {
    LABEL_RE.is_match(s)
}

/// Turn a human-readable name into a label candidate.
///
/// Trims and lowercases the name, replaces spaces with hyphens,
/// transliterates Cyrillic and drops everything that is not an ASCII
/// alphanumeric or a hyphen.
pub fn slugify(name: &str) -> String {
    let prepared = name.trim().to_lowercase().replace(' ', "-");
    translit::to_latin(&prepared)
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .collect()
}

fn with_suffix(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_owned()
    } else {
        format!("{base}-{n}")
    }
}

/// Storage that knows which labels are taken.
#[async_trait]
pub trait LabelRegistry {
    type Error;

    /// Whether no page other than `exclude` uses `label`.
    async fn is_vacant(&self, label: &str, exclude: Option<i32>) -> Result<bool, Self::Error>;
}

/// Check a label typed by an admin: it must have the label format and
/// not belong to another page.
pub async fn check_label<R>(
    registry: &R,
    label: &str,
    page_id: Option<i32>,
) -> Result<bool, R::Error>
where
    R: LabelRegistry + Sync + ?Sized,
{
    if !is_valid(label) {
        return Ok(false);
    }
    registry.is_vacant(label, page_id).await
}

/// Pick a vacant label for a page named `name`.
///
/// A name with nothing usable gives an empty label. Otherwise tries the
/// bare slug, then `-1` through `-10`. If every probe collides
/// the label gets a random suffix, which may itself collide; the unique
/// constraint catches that on save.
pub async fn pick_label<R>(
    registry: &R,
    name: &str,
    page_id: Option<i32>,
) -> Result<String, R::Error>
where
    R: LabelRegistry + Sync + ?Sized,
{
    let candidate = slugify(name);
    if candidate.is_empty() {
        return Ok(candidate);
    }

    for n in 0..=MAX_SUFFIX_PROBES {
        let label = with_suffix(&candidate, n);
        if registry.is_vacant(&label, page_id).await? {
            return Ok(label);
        }
    }

    let n = rand::thread_rng().gen_range(FALLBACK_SUFFIX);
    tracing::warn!(candidate = %candidate, suffix = n, "all label probes taken, using random suffix");
    Ok(with_suffix(&candidate, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// label -> owning page id
    #[derive(Default)]
    struct Taken {
        labels: HashMap<String, i32>,
        probes: AtomicUsize,
    }

    impl Taken {
        fn with(labels: &[(&str, i32)]) -> Self {
            Self {
                labels: labels.iter().map(|(l, id)| (l.to_string(), *id)).collect(),
                probes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LabelRegistry for Taken {
        type Error = Infallible;

        async fn is_vacant(&self, label: &str, exclude: Option<i32>) -> Result<bool, Infallible> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Ok(match self.labels.get(label) {
                None => true,
                Some(owner) => Some(*owner) == exclude,
            })
        }
    }

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("Семейный юрист"), "semejnyj-jurist");
        assert_eq!(slugify("  Раздел имущества! "), "razdel-imuschestva");
        assert_eq!(slugify("Объявление"), "objavlenie");
        assert_eq!(slugify("Paid Legal Advice"), "paid-legal-advice");
        assert_eq!(slugify("ДТП 2024"), "dtp-2024");
    }

    #[test]
    fn label_validation() {
        assert!(Label::new("question-answer").is_ok());
        assert!(Label::new("a1").is_ok());
        assert!(matches!(
            Label::new("under_score"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(Label::new(""), Err(ValidationError::Empty { .. })));
    }

    #[tokio::test]
    async fn picks_bare_slug_when_free() {
        let reg = Taken::default();
        let label = pick_label(&reg, "Семейный юрист", None).await.unwrap();
        assert_eq!(label, "semejnyj-jurist");
    }

    #[tokio::test]
    async fn picks_smallest_unused_suffix() {
        let reg = Taken::with(&[("family", 1), ("family-1", 2), ("family-3", 3)]);
        let label = pick_label(&reg, "Family", None).await.unwrap();
        assert_eq!(label, "family-2");
    }

    #[tokio::test]
    async fn own_label_counts_as_vacant() {
        let reg = Taken::with(&[("family", 7)]);
        let label = pick_label(&reg, "family", Some(7)).await.unwrap();
        assert_eq!(label, "family");
    }

    #[tokio::test]
    async fn falls_back_to_random_suffix() {
        let mut taken: Vec<(String, i32)> = vec![("x".into(), 0)];
        taken.extend((1..=10).map(|n| (format!("x-{n}"), n)));
        let pairs: Vec<(&str, i32)> = taken.iter().map(|(l, i)| (l.as_str(), *i)).collect();
        let reg = Taken::with(&pairs);

        let label = pick_label(&reg, "x", None).await.unwrap();
        let suffix: u32 = label.strip_prefix("x-").unwrap().parse().unwrap();
        assert!((23..=99).contains(&suffix));
        assert_eq!(reg.probes.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn empty_name_gives_empty_label() {
        let reg = Taken::default();
        assert_eq!(pick_label(&reg, "   ", None).await.unwrap(), "");
        assert_eq!(pick_label(&reg, "!!! ???", None).await.unwrap(), "");
        assert_eq!(reg.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn check_rejects_bad_format_without_probing() {
        let reg = Taken::default();
        assert!(!check_label(&reg, "Bad Label", None).await.unwrap());
        assert_eq!(reg.probes.load(Ordering::SeqCst), 0);

        let reg = Taken::with(&[("taken", 1)]);
        assert!(!check_label(&reg, "taken", None).await.unwrap());
        assert!(check_label(&reg, "taken", Some(1)).await.unwrap());
        assert!(check_label(&reg, "free", None).await.unwrap());
    }
}
