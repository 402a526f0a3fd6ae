//! Digest rendering.
//!
//! Assembles the weekly page from fetched items, turns timestamps into
//! relative phrases, resolves a stylesheet and inlines it for mail clients.

mod generator;
mod humanize;
mod inline;
mod stylesheet;

pub use generator::{DigestGenerator, FeedSection};
pub use humanize::humanize;
pub use inline::{inline_document, DEFAULT_BASE_URL};
pub use stylesheet::StylesheetSource;
