//! Public path resolution and legacy redirects
//!
//! A public path has one to three label segments. Each length expects a
//! fixed kind sequence:
//!
//! | segments | expected kinds                          |
//! |----------|-----------------------------------------|
//! | `a`      | main, static or category                |
//! | `a/b`    | category / any child of it              |
//! | `a/b/c`  | category / subcategory / any child      |
//!
//! and every segment must be the parent of the next.

use async_trait::async_trait;

use crate::kind::PageKind;
use crate::page::Page;

/// Old `/msk/...` URLs and the category paths that replaced them.
const LEGACY_MSK: &[((&str, Option<&str>), (&str, Option<&str>))] = &[
    (("urist", Some("semejnyj_jurist")), ("family", None)),
    (("alimenty", None), ("family", Some("alimony"))),
    (("nasledstvo", None), ("legacy", None)),
    (("urist", Some("trudovoj_jurist")), ("labor", None)),
    (("urist", Some("grazhdanskie_dela")), ("civil", None)),
    (("uk", None), ("criminal", None)),
    (("advokat", Some("voennyj_advokat")), ("military", None)),
    (("zpp", None), ("zpp", None)),
    (("advokat", None), ("lawyer", None)),
];

/// Sections that moved under another category.
const RELOCATED: &[(&[&str], &[&str])] = &[
    (&["military"], &["lawyer", "military"]),
    (&["civil"], &["lawyer", "civil"]),
    (&["civil", "debt"], &["lawyer", "civil", "debt"]),
];

/// One to three label segments of a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePath {
    segments: Vec<String>,
}

impl SitePath {
    /// Build a path from its segments; `None` unless there are one to
    /// three of them.
    pub fn new<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        (1..=3).contains(&segments.len()).then_some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_single(&self, label: &str) -> bool {
        self.segments.len() == 1 && self.segments[0] == label
    }

    pub fn url(&self) -> String {
        path_url(&self.segments)
    }
}

fn path_url<S: AsRef<str>>(segments: &[S]) -> String {
    let mut url = String::from("/");
    for s in segments {
        url.push_str(s.as_ref());
        url.push('/');
    }
    url
}

/// Target of an old `/msk/{topic}/{phrase}` URL.
pub fn legacy_redirect(topic: &str, phrase: Option<&str>) -> Option<String> {
    LEGACY_MSK
        .iter()
        .find(|((t, p), _)| *t == topic && *p == phrase)
        .map(|(_, (category, subcategory))| {
            let mut segments = vec![*category];
            segments.extend(*subcategory);
            path_url(&segments)
        })
}

/// Target of a path whose section moved elsewhere.
pub fn relocated(path: &SitePath) -> Option<String> {
    RELOCATED
        .iter()
        .find(|(from, _)| from.iter().copied().eq(path.segments.iter().map(String::as_str)))
        .map(|(_, to)| path_url(to))
}

/// Read access to pages by label.
#[async_trait]
pub trait PageSource {
    type Error;

    async fn page_by_label(&self, label: &str) -> Result<Option<Page>, Self::Error>;
}

/// Resolve `path` to a page, `Ok(None)` when any segment is missing, of
/// the wrong kind or not a child of the previous one.
pub async fn resolve<S>(source: &S, path: &SitePath) -> Result<Option<Page>, S::Error>
where
    S: PageSource + Sync + ?Sized,
{
    let mut pages = Vec::with_capacity(path.segments.len());
    for label in &path.segments {
        match source.page_by_label(label).await? {
            Some(page) => pages.push(page),
            None => return Ok(None),
        }
    }
    Ok(check_chain(pages))
}

fn check_chain(mut pages: Vec<Page>) -> Option<Page> {
    let linked = pages.windows(2).all(|w| w[0].is_parent_of(&w[1]));
    let kinds_ok = match pages.as_slice() {
        [a] => matches!(a.kind, PageKind::Main | PageKind::Static | PageKind::Category),
        [a, _] => a.kind == PageKind::Category,
        [a, b, _] => a.kind == PageKind::Category && b.kind == PageKind::Subcategory,
        _ => false,
    };
    if linked && kinds_ok {
        pages.pop()
    } else {
        None
    }
}
