//! Leads submitted through the site's contact forms
//!
//! Phone numbers are normalised to Russian E.164 without the leading
//! `+` (`79161234567`); anything shorter than a ten-digit national number
//! is treated as spam.

use std::collections::HashMap;

use serde::Serialize;

/// Length of the shortest real number, e.g. `4950001122`.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Country calling code prepended to national numbers.
const COUNTRY_CODE: char = '7';

/// Domestic trunk prefix replaced by the country code.
const TRUNK_PREFIX: char = '8';

/// Analytics custom field holding the question text.
const FIELD_QUESTION: &str = "1565056";
/// Analytics custom field holding the city template.
const FIELD_CITY: &str = "1574354";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub question: String,
    pub source: String,
    pub topic: Option<String>,
    pub purpose: Option<String>,
    pub doctype: Option<String>,
    pub doctype_detailed: Option<String>,
    pub category: Option<String>,
}

/// Body posted to the CRM endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrmLead {
    pub name: String,
    pub phone: String,
    pub question: String,
    pub domain: String,
    pub source: String,
}

/// Keep the digits of `raw` and normalise them to `7XXXXXXXXXX`.
///
/// - 11 digits starting with `8` or `7`: the leading digit becomes `7`
/// - up to 10 digits: `7` is prepended
/// - longer numbers are international and kept as they are
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        0 => digits,
        11 if digits.starts_with(TRUNK_PREFIX) || digits.starts_with(COUNTRY_CODE) => {
            format!("{COUNTRY_CODE}{}", &digits[1..])
        }
        1..=10 => format!("{COUNTRY_CODE}{digits}"),
        _ => digits,
    }
}

fn non_blank(form: &HashMap<String, String>, key: &str) -> Option<String> {
    form.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl Lead {
    /// Build a lead from submitted form fields. `fallback_source` is used
    /// when the form carries no `source_url` (the request URL).
    pub fn from_form(form: &HashMap<String, String>, fallback_source: &str) -> Self {
        Self {
            name: non_blank(form, "name").unwrap_or_default(),
            phone: normalize_phone(form.get("phone").map(String::as_str).unwrap_or_default()),
            question: non_blank(form, "question").unwrap_or_default(),
            source: non_blank(form, "source_url").unwrap_or_else(|| fallback_source.to_owned()),
            topic: non_blank(form, "topic"),
            purpose: non_blank(form, "purpose"),
            doctype: non_blank(form, "doctype"),
            doctype_detailed: non_blank(form, "doctype_detailed"),
            category: non_blank(form, "category"),
        }
    }

    pub fn is_spam(&self) -> bool {
        self.phone.len() < MIN_PHONE_DIGITS
    }

    /// Question text for the CRM, with the form's context lines first.
    pub fn crm_question(&self) -> String {
        let mut lines = Vec::new();
        if self.purpose.as_deref() == Some("callback") {
            lines.push("Обратный звонок".to_owned());
        }
        if let Some(doctype) = &self.doctype {
            let detail = self.doctype_detailed.as_deref().unwrap_or_default();
            lines.push(format!("Заказ документа: {doctype} ({detail})"));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Категория права: {category}"));
        }
        if !self.question.is_empty() {
            lines.push(format!("Комментарий: {}", self.question));
        }
        lines.join("\n")
    }

    pub fn to_crm(&self, domain: &str) -> CrmLead {
        CrmLead {
            name: self.name.clone(),
            phone: self.phone.clone(),
            question: self.crm_question(),
            domain: domain.to_owned(),
            source: self.source.clone(),
        }
    }

    /// Deal title in the analytics CRM, by specialist and topic.
    pub fn analytics_title(&self) -> String {
        let specialist = if self.source.contains("lawyer") {
            "Адвоката"
        } else {
            "Юриста"
        };
        let topic = self.topic.as_deref().unwrap_or_default();
        format!("Заявка для {specialist}. {topic}")
    }

    /// Query parameters for the analytics endpoint, custom fields
    /// flattened to `fields[...]`. `roistat` is only sent with a visit id.
    pub fn analytics_params(&self, key: &str, visit: Option<&str>) -> Vec<(String, String)> {
        let title = self.analytics_title();
        let mut params: Vec<(String, String)> = visit
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| ("roistat".to_owned(), v.to_owned()))
            .into_iter()
            .collect();
        params.extend([
            ("key".to_owned(), key.to_owned()),
            ("title".to_owned(), title),
            ("comment".to_owned(), self.question.clone()),
            ("name".to_owned(), self.name.clone()),
            ("email".to_owned(), String::new()),
            ("phone".to_owned(), self.phone.clone()),
            ("is_need_check_order".to_owned(), "1".to_owned()),
        ]);

        let fields = [
            (FIELD_QUESTION, self.question.as_str()),
            (FIELD_CITY, "{city}"),
            ("is_need_check_order", "1"),
        ];
        params.extend(
            fields
                .into_iter()
                .map(|(k, v)| (format!("fields[{k}]"), v.to_owned())),
        );
        params
    }
}
