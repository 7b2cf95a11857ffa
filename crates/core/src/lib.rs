//! Domain types shared by the SiteScore crates.

pub mod error;
pub mod evaluation;
pub mod types;
pub mod url;
