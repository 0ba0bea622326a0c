//! `sitemap.xml`

use chrono::{DateTime, Utc};

use lexpages_core::html::escape;
use lexpages_core::{PageTree, Question};

/// One `<url>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

/// Every page in sitemap order, then every question by id.
pub fn entries(base_url: &str, tree: &PageTree, questions: &[Question]) -> Vec<SitemapEntry> {
    let pages = tree.sitemap_order().into_iter().filter_map(|page| {
        tree.url(page.id).map(|url| SitemapEntry {
            loc: format!("{base_url}{url}"),
            lastmod: page.date_modified,
        })
    });
    let questions = questions.iter().map(|q| SitemapEntry {
        loc: format!("{base_url}{}", q.url()),
        lastmod: q.date_modified,
    });
    pages.chain(questions).collect()
}

pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "<url><loc>{}</loc><lastmod>{}</lastmod></url>\n",
            escape(&entry.loc),
            entry.lastmod.format("%Y-%m-%d"),
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lexpages_core::{Page, PageKind};

    fn page(id: i32, label: &str, kind: PageKind, parent: Option<(i32, PageKind)>, priority: i32) -> Page {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Page {
            id,
            label: label.into(),
            heading: label.into(),
            title: String::new(),
            description: String::new(),
            content: String::new(),
            kind,
            priority,
            visible_in_menu: true,
            parent_id: parent.map(|p| p.0),
            parent_kind: parent.map(|p| p.1),
            aux: Default::default(),
            date_created: stamp,
            date_modified: stamp,
        }
    }

    #[test]
    fn pages_by_kind_then_questions() {
        let tree = PageTree::new([
            page(1, "main", PageKind::Main, None, 0),
            page(2, "family", PageKind::Category, Some((1, PageKind::Main)), 1),
            page(3, "contacts", PageKind::Static, Some((1, PageKind::Main)), 0),
        ]);
        let stamp = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let question = Question {
            id: 9,
            parent_id: 2,
            jurist_id: None,
            heading: "Вопрос".into(),
            content_question: String::new(),
            content_answer: String::new(),
            author: String::new(),
            date_created: stamp,
            date_modified: stamp,
        };
        let entries = entries("https://jurist.example", &tree, &[question]);
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://jurist.example/contacts/",
                "https://jurist.example/",
                "https://jurist.example/family/",
                "https://jurist.example/question-answer/9/",
            ]
        );

        let xml = render(&entries);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<lastmod>2024-05-02</lastmod>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
