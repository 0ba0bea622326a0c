pub mod config;
pub mod error;
pub mod html;
pub mod kind;
pub mod label;
pub mod leads;
pub mod page;
pub mod payload;
pub mod question;
pub mod resolve;
pub mod shortcode;
pub mod translit;
pub mod tree;
pub mod validation;

pub use config::SiteConfig;
pub use error::{CoreError, Result};
pub use html::Sanitizer;
pub use kind::PageKind;
pub use label::{check_label, pick_label, slugify, Label, LabelRegistry};
pub use leads::{normalize_phone, CrmLead, Lead};
pub use page::{Breadcrumb, MenuItem, Page, PageView, TagText};
pub use payload::{PageInput, QuestionInput, ShortcodeInput};
pub use question::Question;
pub use resolve::{legacy_redirect, relocated, resolve, PageSource, SitePath};
pub use shortcode::{Shortcode, ShortcodeSet};
pub use tree::{CategoryEntry, PageTree};
pub use validation::ValidationError;
