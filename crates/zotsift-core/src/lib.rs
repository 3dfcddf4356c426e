// Public fallible APIs in this crate share one concrete error contract (`ZotsiftError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod host_tools;
pub mod index;
pub mod launcher;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::Zotsift;
pub use config::AppConfig;
pub use date::{DateRange, PartialDate, parse_date_range};
pub use error::{Result, ZotsiftError};
pub use index::LibraryIndex;
pub use launcher::{LaunchAction, Launcher, ZoteroUri};
pub use models::{Attachment, Author, Candidate, Item, ResolvedAttachment};
pub use query::{Query, QueryEngine};
