//! HTML and XML rendering
//!
//! Pages are assembled from `format!` fragments. Plain values go through
//! `html::escape`; rich-text fields written in the admin are emitted as
//! stored, after shortcode substitution.

mod forms;
mod layout;
mod pages;
pub mod sitemap;

pub use layout::Site;
pub use pages::{
    not_found, page, question, question_list, server_error, thanks, Template, NOT_FOUND_HEADING,
    THANKS_HEADING,
};
