//! Route handlers organized by resource

pub mod admin;
pub mod health;
pub mod leads;
pub mod lookups;
pub mod qa;
pub mod redirects;
pub mod site;
pub mod sitemap;
