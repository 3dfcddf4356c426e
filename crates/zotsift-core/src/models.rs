use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::date::PartialDate;

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_ABSTRACT: &str = "No Abstract";

const STORAGE_PATH_PREFIX: &str = "storage:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `Last, First`, or just the last name for single-field creators.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() {
            self.last_name.clone()
        } else {
            format!("{}, {}", self.last_name, self.first_name)
        }
    }
}

/// One byline slot of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorOrderEntry {
    pub author_id: i64,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub key: String,
    pub item_type_id: i64,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub publication_date: Option<PartialDate>,
    pub added_date: PartialDate,
    pub date_modified: String,
}

impl Item {
    #[must_use]
    pub fn new(id: i64, key: impl Into<String>, added_date: PartialDate) -> Self {
        Self {
            id,
            key: key.into(),
            item_type_id: 0,
            title: DEFAULT_TITLE.to_string(),
            abstract_text: DEFAULT_ABSTRACT.to_string(),
            publication_date: None,
            added_date,
            date_modified: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub key: String,
    pub path: Option<String>,
    pub content_type: String,
}

impl Attachment {
    /// Resolves Zotero's `storage:<file>` form under `<storage_dir>/<key>/`.
    /// Linked files already carry an absolute path and are returned unchanged.
    #[must_use]
    pub fn resolve(&self, storage_dir: &Path) -> Option<PathBuf> {
        let raw = self.path.as_deref()?;
        if let Some(file_name) = raw.strip_prefix(STORAGE_PATH_PREFIX) {
            return Some(storage_dir.join(&self.key).join(file_name));
        }
        Some(PathBuf::from(raw))
    }
}

/// Attachment paired with its on-disk location, when one can be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAttachment {
    #[serde(flatten)]
    pub attachment: Attachment,
    pub resolved_path: Option<PathBuf>,
}

impl ResolvedAttachment {
    #[must_use]
    pub fn new(attachment: Attachment, storage_dir: &Path) -> Self {
        let resolved_path = attachment.resolve(storage_dir);
        Self {
            attachment,
            resolved_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub score: i64,
    pub item: Item,
    pub authors: Vec<Author>,
}
