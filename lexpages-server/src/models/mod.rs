//! API models - pagination and admin JSON shapes

pub mod admin;
pub mod pagination;

pub use admin::{CategoryJson, JuristJson, PageJson, PageSummary, QuestionJson, QuestionSummary};
pub use pagination::{Paginated, Pagination, QUESTIONS_PER_PAGE};
