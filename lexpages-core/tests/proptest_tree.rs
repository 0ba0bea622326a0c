use chrono::Utc;
use lexpages_core::kind::{PageKind, RELATIONS};
use lexpages_core::label;
use lexpages_core::leads::{normalize_phone, MIN_PHONE_DIGITS};
use lexpages_core::{Page, PageTree};
use proptest::prelude::*;

fn page(id: i32, label: &str, kind: PageKind, parent: Option<(i32, PageKind)>, aux: [&str; 3]) -> Page {
    let now = Utc::now();
    Page {
        id,
        label: label.to_owned(),
        heading: label.to_owned(),
        title: String::new(),
        description: String::new(),
        content: String::new(),
        kind,
        priority: 0,
        visible_in_menu: true,
        parent_id: parent.map(|(id, _)| id),
        parent_kind: parent.map(|(_, kind)| kind),
        aux: aux.map(str::to_owned),
        date_created: now,
        date_modified: now,
    }
}

fn arb_kind() -> impl Strategy<Value = PageKind> {
    prop::sample::select(PageKind::ALL.to_vec())
}

fn arb_label() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,12}"
}

proptest! {
    /// Property: names made of Cyrillic, Latin, digits and spaces slugify
    /// to the label alphabet
    #[test]
    fn prop_slug_is_label_shaped(name in "[а-яА-ЯёЁa-zA-Z0-9 ]{1,40}") {
        let slug = label::slugify(&name);
        prop_assert!(slug.is_empty() || label::is_valid(&slug), "bad slug {slug:?} for {name:?}");
    }

    /// Property: slugs are stable under re-slugification
    #[test]
    fn prop_slug_is_idempotent(name in "[а-яa-z0-9 -]{1,40}") {
        let once = label::slugify(&name);
        prop_assert_eq!(label::slugify(&once), once);
    }

    /// Property: parent compatibility is exactly the relation table, and
    /// only main may be parentless
    #[test]
    fn prop_parent_rules_match_table(child in arb_kind(), parent in arb_kind()) {
        prop_assert_eq!(
            child.accepts_parent(Some(parent)),
            RELATIONS.contains(&(child, parent))
        );
        prop_assert_eq!(child.accepts_parent(None), child == PageKind::Main);
    }

    /// Property: URL is the ancestor labels below main, outermost first
    #[test]
    fn prop_url_follows_chain(a in arb_label(), b in arb_label(), c in arb_label()) {
        let tree = PageTree::new([
            page(1, "main", PageKind::Main, None, ["", "", ""]),
            page(2, &a, PageKind::Category, Some((1, PageKind::Main)), ["", "", ""]),
            page(3, &b, PageKind::Subcategory, Some((2, PageKind::Category)), ["", "", ""]),
            page(4, &c, PageKind::Paper, Some((3, PageKind::Subcategory)), ["", "", ""]),
        ]);
        prop_assert_eq!(tree.url(1), Some("/".to_owned()));
        prop_assert_eq!(tree.url(2), Some(format!("/{a}/")));
        prop_assert_eq!(tree.url(4), Some(format!("/{a}/{b}/{c}/")));
    }

    /// Property: each aux field comes from the nearest non-empty ancestor
    #[test]
    fn prop_aux_nearest_non_empty(
        top in "[a-z]{0,3}",
        middle in "[a-z]{0,3}",
        own in "[a-z]{0,3}",
    ) {
        let tree = PageTree::new([
            page(1, "main", PageKind::Main, None, [top.as_str(), "", ""]),
            page(2, "family", PageKind::Category, Some((1, PageKind::Main)), [middle.as_str(), "", ""]),
            page(3, "divorce", PageKind::Service, Some((2, PageKind::Category)), [own.as_str(), "", ""]),
        ]);
        let expected = [&own, &middle, &top]
            .into_iter()
            .find(|v| !v.is_empty())
            .cloned()
            .unwrap_or_default();
        prop_assert_eq!(&tree.aux_fields(3)[0], &expected);
        prop_assert_eq!(&tree.aux_fields(3)[1], "");
    }

    /// Property: normalised phones are digits only, and any ten-digit
    /// national number becomes an eleven-digit `7...` number
    #[test]
    fn prop_phone_normalisation(national in "[0-9]{10}", noise in "[ ()+-]{0,4}") {
        let raw = format!("{noise}{national}");
        let phone = normalize_phone(&raw);
        prop_assert!(phone.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(phone.len(), 11);
        prop_assert!(phone.starts_with('7'));
        prop_assert!(phone.len() >= MIN_PHONE_DIGITS);
    }
}
