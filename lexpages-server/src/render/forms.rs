//! Lead forms posted to `/sender`

use lexpages_core::html::escape;

/// Form variants shown under page content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeadForm {
    Callback,
    Question,
    Document,
    Visit,
    PaidAdvice,
}

impl LeadForm {
    fn title(self) -> &'static str {
        match self {
            Self::Callback => "Перезвоните мне",
            Self::Question => "Задать вопрос юристу",
            Self::Document => "Заказать документ",
            Self::Visit => "Записаться на приём",
            Self::PaidAdvice => "Платная консультация",
        }
    }

    fn purpose(self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::Question => "question",
            Self::Document => "document",
            Self::Visit => "visit",
            Self::PaidAdvice => "paid-advice",
        }
    }

    /// Form markup. `source` is the absolute URL of the page the form is
    /// on, `topic` the page heading used in the deal title.
    pub(crate) fn render(self, source: &str, topic: &str) -> String {
        let extra = match self {
            Self::Callback => String::new(),
            Self::Document => concat!(
                r#"<input type="text" name="doctype" placeholder="Документ" required>"#,
                r#"<input type="text" name="doctype_detailed" placeholder="Подробнее">"#,
                r#"<textarea name="question" placeholder="Комментарий"></textarea>"#,
            )
            .to_owned(),
            Self::Question | Self::Visit | Self::PaidAdvice => {
                r#"<textarea name="question" placeholder="Ваш вопрос"></textarea>"#.to_owned()
            }
        };
        format!(
            r#"<form class="lead-form lead-form-{purpose}" method="post" action="/sender">
<h3>{title}</h3>
<input type="hidden" name="purpose" value="{purpose}">
<input type="hidden" name="source_url" value="{source}">
<input type="hidden" name="topic" value="{topic}">
<input type="text" name="name" placeholder="Имя">
<input type="tel" name="phone" placeholder="Телефон" required>
{extra}
<button type="submit">Отправить</button>
</form>"#,
            purpose = self.purpose(),
            title = self.title(),
            source = escape(source),
            topic = escape(topic),
        )
    }
}
