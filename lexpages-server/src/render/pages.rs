//! Page templates

use lexpages_core::html::escape;
use lexpages_core::{MenuItem, PageView, Question, ShortcodeSet};

use super::forms::LeadForm;
use super::layout::{document, Site};
use crate::db::Jurist;
use crate::models::Paginated;

pub const NOT_FOUND_HEADING: &str = "Страница не найдена";
pub const THANKS_HEADING: &str = "Спасибо за обращение!";

/// Template variant, chosen by page label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Generic,
    Thanks,
    Document,
    Answer,
    Reports,
    QuestionAnswer,
    Visit,
    PaidLegalAdvice,
    Contacts,
}

impl Template {
    pub fn for_label(label: Option<&str>) -> Self {
        match label {
            Some("thanks") => Self::Thanks,
            Some("document") => Self::Document,
            Some("answer") => Self::Answer,
            Some("reports") => Self::Reports,
            Some("question-answer") => Self::QuestionAnswer,
            Some("visit") => Self::Visit,
            Some("paid-legal-advice") => Self::PaidLegalAdvice,
            Some("contacts") => Self::Contacts,
            _ => Self::Generic,
        }
    }

    fn form(self) -> Option<LeadForm> {
        match self {
            Self::Generic | Self::Contacts => Some(LeadForm::Callback),
            Self::Document => Some(LeadForm::Document),
            Self::Answer | Self::QuestionAnswer => Some(LeadForm::Question),
            Self::Visit => Some(LeadForm::Visit),
            Self::PaidLegalAdvice => Some(LeadForm::PaidAdvice),
            Self::Thanks | Self::Reports => None,
        }
    }
}

/// A stored page with its menu.
pub fn page(site: &Site<'_>, view: &PageView, menu: &[MenuItem]) -> String {
    let template = Template::for_label(view.label.as_deref());
    let content = format!(r#"<div class="page-content">{}</div>"#, site.rich(&view.content));
    let body = match template {
        Template::Reports => format!(r#"<section class="reports">{content}</section>"#),
        Template::Contacts => format!("{content}{}", contacts_block(site)),
        _ => content,
    };
    let body = with_form(site, view, template, body);
    document(site, view, menu, &body)
}

/// The thank-you page shown after a lead was sent.
pub fn thanks(site: &Site<'_>) -> String {
    let view = PageView::bare(THANKS_HEADING);
    let body = format!(
        r#"<p class="thanks">Мы свяжемся с вами в ближайшее время. Телефон для срочных вопросов: {}</p>"#,
        site.fragment("phone", "")
    );
    document(site, &view, &[], &body)
}

/// One question with its answer and the answering jurist.
pub fn question(site: &Site<'_>, view: &PageView, q: &Question, jurist: Option<&Jurist>) -> String {
    let asked = format!(
        r#"<section class="question">
<p class="question-meta">{author}, {date}</p>
<div class="question-body">{body}</div>
</section>"#,
        author = escape(author_or_anonymous(&q.author)),
        date = q.date_created.format("%d.%m.%Y"),
        body = site.rich(&q.content_question),
    );
    let answered = if q.is_answer_provided() {
        format!(
            r#"<section class="answer">
{jurist}
<div class="answer-body">{body}</div>
</section>"#,
            jurist = jurist.map(jurist_card).unwrap_or_default(),
            body = site.rich(&q.content_answer),
        )
    } else {
        r#"<p class="answer-pending">Вопрос ожидает ответа юриста.</p>"#.to_owned()
    };
    let body = with_form(site, view, Template::QuestionAnswer, format!("{asked}\n{answered}"));
    document(site, view, &[], &body)
}

/// The Q&A listing page with its pager.
pub fn question_list(site: &Site<'_>, view: &PageView, listing: &Paginated<Question>) -> String {
    let items: String = listing
        .items
        .iter()
        .map(|q| {
            let state = if q.is_answer_provided() {
                "Есть ответ"
            } else {
                "Ожидает ответа"
            };
            format!(
                r#"<article class="question-item">
<h2><a href="{url}">{heading}</a></h2>
<p>{description}</p>
<span class="question-state">{state}</span>
</article>"#,
                url = q.url(),
                heading = escape(&q.heading),
                description = escape(&site.shortcodes.apply(&q.description())),
            )
        })
        .collect();
    let base = view.url.as_deref().unwrap_or("/question-answer/");
    let body = format!(
        r#"<div class="page-content">{content}</div>
<div class="question-list">{items}</div>
{pager}"#,
        content = site.rich(&view.content),
        pager = pager(base, listing),
    );
    let body = with_form(site, view, Template::QuestionAnswer, body);
    document(site, view, &[], &body)
}

/// The 404 page. Needs no data, so it cannot fail.
pub fn not_found() -> String {
    let codes = ShortcodeSet::default();
    let site = Site::new("", &codes);
    let view = PageView::bare(NOT_FOUND_HEADING);
    document(
        &site,
        &view,
        &[],
        r#"<p>Запрошенная страница не существует или была удалена. <a href="/">Перейти на главную</a></p>"#,
    )
}

pub fn server_error() -> String {
    "<h1>500 Internal Server Error</h1>".to_owned()
}

fn with_form(site: &Site<'_>, view: &PageView, template: Template, body: String) -> String {
    match template.form() {
        Some(form) => {
            let source = site.absolute(view.url.as_deref().unwrap_or("/"));
            format!("{body}\n{}", form.render(&source, &view.heading))
        }
        None => body,
    }
}

fn contacts_block(site: &Site<'_>) -> String {
    format!(
        r#"<address class="contacts">
<p>{address}</p>
<p><a href="tel:{phone}">{phone}</a></p>
<p><a href="mailto:{email}">{email}</a></p>
</address>"#,
        address = site.fragment("address", ""),
        phone = site.fragment("phone", ""),
        email = site.fragment("email", ""),
    )
}

fn jurist_card(jurist: &Jurist) -> String {
    format!(
        r#"<div class="jurist">
<img src="/static/company/img/{face}" alt="{name}">
<p class="jurist-name">{name}</p>
<p class="jurist-title">{title}</p>
</div>"#,
        face = escape(&jurist.face),
        name = escape(&jurist.name),
        title = escape(&jurist.job_title),
    )
}

fn author_or_anonymous(author: &str) -> &str {
    if author.trim().is_empty() {
        "Аноним"
    } else {
        author
    }
}

fn pager<T>(base: &str, listing: &Paginated<T>) -> String {
    let pages = listing.total_pages();
    if pages <= 1 {
        return String::new();
    }
    let link = |n: u32| {
        if n == 1 {
            base.to_owned()
        } else {
            format!("{base}?page={n}")
        }
    };
    let mut items = String::new();
    if listing.has_prev() {
        items.push_str(&format!(r#"<a class="prev" href="{}">&larr;</a>"#, link(listing.page - 1)));
    }
    for n in 1..=pages {
        if n == listing.page {
            items.push_str(&format!(r#"<span class="current">{n}</span>"#));
        } else {
            items.push_str(&format!(r#"<a href="{}">{n}</a>"#, link(n)));
        }
    }
    if listing.has_next() {
        items.push_str(&format!(r#"<a class="next" href="{}">&rarr;</a>"#, link(listing.page + 1)));
    }
    format!(r#"<nav class="pager">{items}</nav>"#)
}
