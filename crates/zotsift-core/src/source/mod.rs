//! Row-level access to a Zotero library.
//!
//! The index never talks to SQLite directly; it consumes flat rows through
//! [`RowSource`], which keeps the load path testable with [`MemoryRowSource`].

use crate::error::Result;
use crate::models::Attachment;

mod memory;
mod sqlite;


pub use memory::MemoryRowSource;
pub use sqlite::SqliteRowSource;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Abstract,
    Date,
}

impl FieldKind {
    #[must_use]
    pub const fn field_id(self) -> i64 {
        match self {
            Self::Title => 1,
            Self::Abstract => 2,
            Self::Date => 6,
        }
    }

    #[must_use]
    pub const fn from_field_id(field_id: i64) -> Option<Self> {
        match field_id {
            1 => Some(Self::Title),
            2 => Some(Self::Abstract),
            6 => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorRow {
    pub creator_id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCreatorRow {
    pub item_id: i64,
    pub creator_id: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub field_id: i64,
    pub value: String,
}

/// An items row joined with at most one of its field values. Items without any
/// selected field arrive once with `field: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFieldRow {
    pub item_id: i64,
    pub key: String,
    pub item_type_id: i64,
    pub date_added: String,
    pub date_modified: String,
    pub field: Option<FieldValue>,
}

pub type RowSink<'a, R> = &'a mut dyn FnMut(R) -> Result<()>;

pub trait RowSource {
    fn for_each_creator(&self, sink: RowSink<'_, CreatorRow>) -> Result<()>;

    fn for_each_item_creator(&self, sink: RowSink<'_, ItemCreatorRow>) -> Result<()>;

    fn for_each_item_field(&self, sink: RowSink<'_, ItemFieldRow>) -> Result<()>;

    /// PDF attachments whose parent is `parent_item_id`. Issued on demand; not
    /// part of the index load.
    fn attachments(&self, parent_item_id: i64) -> Result<Vec<Attachment>>;
}
