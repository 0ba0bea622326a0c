//! Page kinds and the parent/child compatibility table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Position-type of a page in the site hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Main,
    Static,
    Category,
    Subcategory,
    Paper,
    Service,
}

/// Every `(child, parent)` pair the hierarchy allows.
///
/// Mirrors the `possible_relations` table seeded into the database.
pub const RELATIONS: &[(PageKind, PageKind)] = &[
    (PageKind::Static, PageKind::Main),
    (PageKind::Category, PageKind::Main),
    (PageKind::Subcategory, PageKind::Category),
    (PageKind::Paper, PageKind::Category),
    (PageKind::Paper, PageKind::Subcategory),
    (PageKind::Service, PageKind::Category),
    (PageKind::Service, PageKind::Subcategory),
];

impl PageKind {
    pub const ALL: [PageKind; 6] = [
        PageKind::Main,
        PageKind::Static,
        PageKind::Category,
        PageKind::Subcategory,
        PageKind::Paper,
        PageKind::Service,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Static => "static",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Paper => "paper",
            Self::Service => "service",
        }
    }

    /// Kinds this kind may hang under. Empty for `main`.
    pub fn allowed_parents(self) -> impl Iterator<Item = PageKind> {
        RELATIONS
            .iter()
            .filter(move |(child, _)| *child == self)
            .map(|(_, parent)| *parent)
    }

    /// Whether a page of this kind may have a parent of `parent` kind
    /// (`None` meaning "no parent").
    pub fn accepts_parent(self, parent: Option<PageKind>) -> bool {
        match parent {
            None => self == Self::Main,
            Some(parent) => RELATIONS.contains(&(self, parent)),
        }
    }

    /// Kinds whose parent is always the main page.
    pub fn is_top_level(self) -> bool {
        matches!(self, Self::Static | Self::Category)
    }

    /// Leaf kinds listed in the admin article lists.
    pub fn is_article(self) -> bool {
        matches!(self, Self::Paper | Self::Service)
    }

    pub fn is_category_like(self) -> bool {
        matches!(self, Self::Category | Self::Subcategory)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "kind",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_kinds() {
        for kind in PageKind::ALL {
            assert_eq!(kind.as_str().parse::<PageKind>().unwrap(), kind);
        }
        assert!("blog".parse::<PageKind>().is_err());
        assert!("Main".parse::<PageKind>().is_err());
    }

    #[test]
    fn main_has_no_parent() {
        assert!(PageKind::Main.accepts_parent(None));
        for kind in PageKind::ALL {
            assert!(!PageKind::Main.accepts_parent(Some(kind)));
        }
        assert_eq!(PageKind::Main.allowed_parents().count(), 0);
    }

    #[test]
    fn non_main_requires_parent() {
        for kind in PageKind::ALL.into_iter().filter(|k| *k != PageKind::Main) {
            assert!(!kind.accepts_parent(None), "{kind} accepted no parent");
        }
    }

    #[test]
    fn compatibility_table() {
        use PageKind::*;
        assert!(Static.accepts_parent(Some(Main)));
        assert!(Category.accepts_parent(Some(Main)));
        assert!(Subcategory.accepts_parent(Some(Category)));
        assert!(Paper.accepts_parent(Some(Subcategory)));
        assert!(Service.accepts_parent(Some(Category)));

        assert!(!Subcategory.accepts_parent(Some(Main)));
        assert!(!Subcategory.accepts_parent(Some(Subcategory)));
        assert!(!Category.accepts_parent(Some(Category)));
        assert!(!Paper.accepts_parent(Some(Main)));
        assert!(!Service.accepts_parent(Some(Paper)));
        assert!(!Static.accepts_parent(Some(Category)));
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&PageKind::Subcategory).unwrap();
        assert_eq!(json, "\"subcategory\"");
        let kind: PageKind = serde_json::from_str("\"service\"").unwrap();
        assert_eq!(kind, PageKind::Service);
    }
}
