//! In-memory view of (part of) the page tree
//!
//! Everything positional is derived here: URLs, breadcrumbs, inherited
//! aux fields, menus and the orderings used by the admin lists. A tree
//! may hold every page (sitemap, admin lists) or just one page's ancestor
//! chain plus its menu candidates (public rendering); all lookups only
//! need a page's ancestors to be present.

use std::collections::{HashMap, HashSet};

use crate::kind::PageKind;
use crate::page::{Breadcrumb, MenuItem, Page, PageView, AUX_FIELDS};

/// Depth below which a chain walk is cut off. The hierarchy is four
/// levels deep, so anything longer means corrupt data.
const MAX_CHAIN: usize = 8;

/// Prefix of subcategory names in category pickers.
pub const NESTED_PREFIX: &str = "— ";

/// Menu kinds in display order.
const MENU_KINDS: [PageKind; 3] = [PageKind::Category, PageKind::Subcategory, PageKind::Service];

#[derive(Debug, Clone, Default)]
pub struct PageTree {
    pages: HashMap<i32, Page>,
}

/// Category or subcategory entry for the admin category picker
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry<'a> {
    pub page: &'a Page,
    pub name: String,
}

impl PageTree {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        let mut tree = Self::default();
        tree.extend(pages);
        tree
    }

    pub fn insert(&mut self, page: Page) {
        self.pages.insert(page.id, page);
    }

    pub fn extend(&mut self, pages: impl IntoIterator<Item = Page>) {
        for page in pages {
            self.insert(page);
        }
    }

    pub fn get(&self, id: i32) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn main(&self) -> Option<&Page> {
        self.pages.values().find(|p| p.is_main())
    }

    pub fn by_label(&self, label: &str) -> Option<&Page> {
        self.pages.values().find(|p| p.label == label)
    }

    /// The page followed by its ancestors, nearest first. Stops at the
    /// first ancestor missing from the tree.
    pub fn chain(&self, id: i32) -> Vec<&Page> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.pages.get(&id);
        while let Some(page) = next {
            if !seen.insert(page.id) || chain.len() >= MAX_CHAIN {
                tracing::warn!(page_id = id, "page chain is cyclic or too deep");
                break;
            }
            chain.push(page);
            next = page.parent_id.and_then(|pid| self.pages.get(&pid));
        }
        chain
    }

    /// Ancestors only, nearest first.
    pub fn parents(&self, id: i32) -> Vec<&Page> {
        self.chain(id).into_iter().skip(1).collect()
    }

    /// Canonical URL: `/` for main, otherwise the labels of the chain
    /// below main, outermost first.
    pub fn url(&self, id: i32) -> Option<String> {
        let chain = self.chain(id);
        chain.first()?;
        Some(url_for_chain(&chain))
    }

    /// Aux fields with each empty value taken from the nearest ancestor
    /// that has one.
    pub fn aux_fields(&self, id: i32) -> [String; AUX_FIELDS] {
        let chain = self.chain(id);
        std::array::from_fn(|i| {
            chain
                .iter()
                .map(|p| p.aux[i].as_str())
                .find(|v| !v.is_empty())
                .unwrap_or_default()
                .to_owned()
        })
    }

    /// Trail from main down to the page. Empty for main itself.
    pub fn breadcrumbs(&self, id: i32) -> Vec<Breadcrumb> {
        let chain = self.chain(id);
        let Some(page) = chain.first() else {
            return Vec::new();
        };
        if page.is_main() {
            return Vec::new();
        }
        let mut crumbs: Vec<Breadcrumb> = chain[1..]
            .iter()
            .rev()
            .map(|p| Breadcrumb::new(p.heading.clone(), self.url(p.id)))
            .collect();
        crumbs.push(Breadcrumb::new(page.heading.clone(), None));
        crumbs
    }

    /// Render-ready view of a stored page.
    pub fn view(&self, id: i32) -> Option<PageView> {
        let page = self.get(id)?;
        Some(PageView {
            label: Some(page.label.clone()),
            kind: Some(page.kind),
            heading: page.heading.clone(),
            title: page.title.clone(),
            description: page.description.clone(),
            content: page.content.clone(),
            aux: self.aux_fields(id),
            breadcrumbs: self.breadcrumbs(id),
            url: self.url(id),
            date_modified: Some(page.date_modified),
        })
    }

    /// Id of the page whose children make up `page`'s menu, or `None`
    /// when the page kind shows no menu.
    pub fn menu_parent(page: &Page) -> Option<i32> {
        match page.kind {
            PageKind::Service => page.parent_id,
            PageKind::Main | PageKind::Category | PageKind::Subcategory => Some(page.id),
            _ => None,
        }
    }

    /// Navigation menu for `current`: visible category, subcategory and
    /// service children of the menu parent, by kind, priority and id. The
    /// current page and hidden services are shown without a link.
    pub fn menu(&self, current: &Page) -> Vec<MenuItem> {
        let Some(parent_id) = Self::menu_parent(current) else {
            return Vec::new();
        };
        let mut children: Vec<&Page> = self
            .pages
            .values()
            .filter(|p| p.parent_id == Some(parent_id))
            .filter(|p| p.visible_in_menu)
            .filter(|p| MENU_KINDS.contains(&p.kind))
            .collect();
        children.sort_by_key(|p| (menu_rank(p.kind), p.priority, p.id));

        children
            .into_iter()
            .map(|p| {
                let url = if p.label == current.label || p.should_be_404() {
                    None
                } else {
                    self.url(p.id)
                };
                MenuItem {
                    name: p.heading.clone(),
                    url,
                    important: p.kind.is_category_like(),
                }
            })
            .collect()
    }

    /// Papers or services ordered by category, subcategory and own
    /// priority, as in the admin lists.
    pub fn sorted_articles(&self, kind: PageKind) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.values().filter(|p| p.kind == kind).collect();
        pages.sort_by_key(|p| self.article_key(p));
        pages
    }

    fn article_key(&self, page: &Page) -> (i32, i32, Option<(i32, i32)>, i32, i32) {
        let parent = page.parent_id.and_then(|id| self.get(id));
        let grandparent = parent.and_then(|p| p.parent_id).and_then(|id| self.get(id));
        match (parent, grandparent) {
            (Some(sub), Some(cat)) if cat.kind == PageKind::Category => (
                cat.priority,
                cat.id,
                Some((sub.priority, sub.id)),
                page.priority,
                page.id,
            ),
            (Some(cat), _) => (cat.priority, cat.id, None, page.priority, page.id),
            (None, _) => (i32::MAX, i32::MAX, None, page.priority, page.id),
        }
    }

    /// Categories (and, unless `only_root`, their subcategories right
    /// after them) with subcategory names prefixed by a long dash.
    pub fn categories(&self, only_root: bool) -> Vec<CategoryEntry<'_>> {
        let mut pages: Vec<&Page> = self
            .pages
            .values()
            .filter(|p| p.kind == PageKind::Category || (!only_root && p.kind == PageKind::Subcategory))
            .collect();
        pages.sort_by_key(|p| self.category_key(p));
        pages
            .into_iter()
            .map(|page| CategoryEntry {
                page,
                name: nested_name(page),
            })
            .collect()
    }

    fn category_key(&self, page: &Page) -> (i32, i32, Option<(i32, i32)>) {
        if page.kind == PageKind::Category {
            return (page.priority, page.id, None);
        }
        match page.parent_id.and_then(|id| self.get(id)) {
            Some(parent) => (parent.priority, parent.id, Some((page.priority, page.id))),
            None => (i32::MAX, i32::MAX, Some((page.priority, page.id))),
        }
    }

    /// All pages ordered for the sitemap: kind descending, then priority
    /// and id.
    pub fn sitemap_order(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.values().collect();
        pages.sort_by(|a, b| {
            b.kind
                .as_str()
                .cmp(a.kind.as_str())
                .then(a.priority.cmp(&b.priority))
                .then(a.id.cmp(&b.id))
        });
        pages
    }
}

/// URL of the first page of `chain` (page followed by its ancestors).
pub fn url_for_chain(chain: &[&Page]) -> String {
    let labels: Vec<&str> = chain
        .iter()
        .rev()
        .filter(|p| !p.is_main())
        .map(|p| p.label.as_str())
        .collect();
    if labels.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}/", labels.join("/"))
    }
}

/// Display name of a category-like page in pickers.
pub fn nested_name(page: &Page) -> String {
    if page.kind == PageKind::Subcategory {
        format!("{NESTED_PREFIX}{}", page.heading)
    } else {
        page.heading.clone()
    }
}

fn menu_rank(kind: PageKind) -> usize {
    MENU_KINDS.iter().position(|k| *k == kind).unwrap_or(MENU_KINDS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fixtures::page;

    use PageKind::*;

    /// main(1) ─┬─ family(2, category) ─┬─ alimony(4, subcategory) ── calc(6, paper)
    ///          │                       └─ divorce(5, service)
    ///          ├─ labor(3, category)
    ///          └─ contacts(7, static)
    fn site() -> PageTree {
        PageTree::new([
            page(1, "main", Main, None),
            page(2, "family", Category, Some((1, Main))),
            page(3, "labor", Category, Some((1, Main))),
            page(4, "alimony", Subcategory, Some((2, Category))),
            page(5, "divorce", Service, Some((2, Category))),
            page(6, "calc", Paper, Some((4, Subcategory))),
            page(7, "contacts", Static, Some((1, Main))),
        ])
    }

    #[test]
    fn urls_follow_position() {
        let tree = site();
        assert_eq!(tree.url(1).as_deref(), Some("/"));
        assert_eq!(tree.url(2).as_deref(), Some("/family/"));
        assert_eq!(tree.url(4).as_deref(), Some("/family/alimony/"));
        assert_eq!(tree.url(6).as_deref(), Some("/family/alimony/calc/"));
        assert_eq!(tree.url(7).as_deref(), Some("/contacts/"));
        assert_eq!(tree.url(99), None);
    }

    #[test]
    fn chain_is_nearest_first() {
        let tree = site();
        let labels: Vec<&str> = tree.chain(6).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["calc", "alimony", "family", "main"]);
    }

    #[test]
    fn chain_survives_cycles() {
        let mut tree = site();
        let mut a = page(10, "a", Subcategory, Some((11, Category)));
        a.parent_id = Some(11);
        let b = page(11, "b", Category, Some((10, Subcategory)));
        tree.extend([a, b]);
        assert_eq!(tree.chain(10).len(), 2);
    }

    #[test]
    fn aux_fields_inherit_nearest_non_empty() {
        let mut pages: Vec<Page> = site().pages.into_values().collect();
        for p in &mut pages {
            match p.id {
                1 => p.aux = ["main-1".into(), "main-2".into(), "main-3".into()],
                2 => p.aux[1] = "family-2".into(),
                4 => p.aux[2] = "alimony-3".into(),
                _ => {}
            }
        }
        let tree = PageTree::new(pages);
        assert_eq!(tree.aux_fields(6), ["main-1", "family-2", "alimony-3"]);
        assert_eq!(tree.aux_fields(3), ["main-1", "main-2", "main-3"]);
    }

    #[test]
    fn breadcrumbs_from_main_down() {
        let tree = site();
        assert!(tree.breadcrumbs(1).is_empty());

        let crumbs = tree.breadcrumbs(6);
        let names: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["MAIN", "FAMILY", "ALIMONY", "CALC"]);
        assert_eq!(crumbs[0].url.as_deref(), Some("/"));
        assert_eq!(crumbs[2].url.as_deref(), Some("/family/alimony/"));
        assert_eq!(crumbs[3].url, None);
    }

    #[test]
    fn menu_for_category_lists_children_by_kind() {
        let mut tree = site();
        let mut hidden = page(8, "hidden", Service, Some((2, Category)));
        hidden.visible_in_menu = false;
        let mut empty = page(9, "empty", Service, Some((2, Category)));
        empty.content.clear();
        let paper = page(12, "essay", Paper, Some((2, Category)));
        tree.extend([hidden, empty, paper]);

        let family = tree.get(2).unwrap().clone();
        let menu = tree.menu(&family);
        let names: Vec<&str> = menu.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["ALIMONY", "DIVORCE", "EMPTY"]);
        assert!(menu[0].important);
        assert!(!menu[1].important);
        assert_eq!(menu[1].url.as_deref(), Some("/family/divorce/"));
        assert_eq!(menu[2].url, None);
    }

    #[test]
    fn service_menu_uses_siblings_and_unlinks_itself() {
        let tree = site();
        let divorce = tree.get(5).unwrap().clone();
        let menu = tree.menu(&divorce);
        let current = menu.iter().find(|m| m.name == "DIVORCE").unwrap();
        assert_eq!(current.url, None);
        assert!(menu.iter().any(|m| m.name == "ALIMONY"));
    }

    #[test]
    fn static_and_paper_pages_have_no_menu() {
        let tree = site();
        assert!(tree.menu(tree.get(7).unwrap()).is_empty());
        assert!(tree.menu(tree.get(6).unwrap()).is_empty());
    }

    #[test]
    fn articles_sorted_by_category_then_subcategory() {
        let mut pages: Vec<Page> = site().pages.into_values().collect();
        for p in &mut pages {
            if p.id == 2 {
                p.priority = 5;
            }
        }
        let mut tree = PageTree::new(pages);
        tree.extend([
            page(20, "labor-paper", Paper, Some((3, Category))),
            page(21, "family-paper", Paper, Some((2, Category))),
        ]);
        let order: Vec<&str> = tree
            .sorted_articles(Paper)
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(order, ["labor-paper", "family-paper", "calc"]);
    }

    #[test]
    fn categories_nest_subcategories() {
        let tree = site();
        let all: Vec<String> = tree.categories(false).into_iter().map(|c| c.name).collect();
        assert_eq!(all, ["FAMILY", "— ALIMONY", "LABOR"]);

        let roots: Vec<String> = tree.categories(true).into_iter().map(|c| c.name).collect();
        assert_eq!(roots, ["FAMILY", "LABOR"]);
    }

    #[test]
    fn sitemap_orders_kind_descending() {
        let tree = site();
        let kinds: Vec<PageKind> = tree.sitemap_order().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [Subcategory, Static, Service, Paper, Main, Category, Category]);
    }

    #[test]
    fn view_carries_position_data() {
        let tree = site();
        let view = tree.view(4).unwrap();
        assert_eq!(view.url.as_deref(), Some("/family/alimony/"));
        assert_eq!(view.breadcrumbs.len(), 3);
        assert_eq!(view.kind, Some(Subcategory));
    }
}
