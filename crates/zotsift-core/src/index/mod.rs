use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::info;

use crate::date::PartialDate;
use crate::error::{Result, ZotsiftError};
use crate::models::{Attachment, Author, AuthorOrderEntry, Item};
use crate::source::{CreatorRow, FieldKind, ItemCreatorRow, ItemFieldRow, RowSource};

#[cfg(test)]
mod tests;

const ADDED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ADDED_DATE_FORMAT: &str = "%Y-%m-%d";

/// One occurrence of an author on an item, as seen from the author side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorItemRef {
    pub item_id: i64,
    pub position: u32,
}

/// Immutable in-memory view of a library snapshot.
///
/// Both directions of the item/author relation are derived from the same
/// association rows in one pass, so neither map refers into the other.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    items: HashMap<i64, Item>,
    item_authors: HashMap<i64, Vec<AuthorOrderEntry>>,
    authors: HashMap<i64, Author>,
    author_items: HashMap<i64, Vec<AuthorItemRef>>,
    keys: HashMap<String, i64>,
}

impl LibraryIndex {
    /// Loads creators, then associations, then items. Any failure aborts the
    /// whole load.
    pub fn build(source: &dyn RowSource) -> Result<Self> {
        let mut index = Self::default();

        source
            .for_each_creator(&mut |row| {
                index.insert_creator(row);
                Ok(())
            })
            .map_err(|err| ZotsiftError::load("creators", err))?;
        source
            .for_each_item_creator(&mut |row| index.insert_item_creator(row))
            .map_err(|err| ZotsiftError::load("item_creators", err))?;
        source
            .for_each_item_field(&mut |row| index.apply_item_field(row))
            .map_err(|err| ZotsiftError::load("items", err))?;

        info!(
            items = index.items.len(),
            authors = index.authors.len(),
            associations = index.association_count(),
            "library index built"
        );
        Ok(index)
    }

    fn insert_creator(&mut self, row: CreatorRow) {
        self.authors
            .insert(row.creator_id, Author::new(row.first_name, row.last_name));
    }

    fn insert_item_creator(&mut self, row: ItemCreatorRow) -> Result<()> {
        let position = u32::try_from(row.order_index).map_err(|_| {
            ZotsiftError::MalformedRow(format!(
                "item {} creator {} has invalid order index {}",
                row.item_id, row.creator_id, row.order_index
            ))
        })?;
        self.item_authors
            .entry(row.item_id)
            .or_default()
            .push(AuthorOrderEntry {
                author_id: row.creator_id,
                position,
            });
        self.author_items
            .entry(row.creator_id)
            .or_default()
            .push(AuthorItemRef {
                item_id: row.item_id,
                position,
            });
        Ok(())
    }

    fn apply_item_field(&mut self, row: ItemFieldRow) -> Result<()> {
        let item = match self.items.entry(row.item_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let added_date = parse_added_date(&row.date_added)?;
                let mut item = Item::new(row.item_id, row.key.clone(), added_date);
                item.item_type_id = row.item_type_id;
                item.date_modified = row.date_modified;
                self.keys.insert(row.key, row.item_id);
                entry.insert(item)
            }
        };

        let Some(field) = row.field else {
            return Ok(());
        };
        match FieldKind::from_field_id(field.field_id) {
            Some(FieldKind::Title) => item.title = field.value,
            Some(FieldKind::Abstract) => item.abstract_text = field.value,
            Some(FieldKind::Date) => item.publication_date = parse_field_date(&field.value)?,
            None => {
                return Err(ZotsiftError::UnexpectedFieldKind {
                    item_id: row.item_id,
                    field_id: field.field_id,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get_item(&self, id: i64) -> Option<Item> {
        self.items.get(&id).cloned()
    }

    #[must_use]
    pub fn get_item_by_key(&self, key: &str) -> Option<Item> {
        self.keys.get(key).and_then(|id| self.get_item(*id))
    }

    #[must_use]
    pub fn item(&self, id: i64) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Authors of `id` in byline order.
    ///
    /// Entries are placed by their stored position; duplicate positions keep
    /// load order and gaps in a sparse ordering close up.
    pub fn get_authors_ordered(&self, id: i64) -> Result<Vec<Author>> {
        let Some(entries) = self.item_authors.get(&id) else {
            return Ok(Vec::new());
        };

        let mut placed = Vec::with_capacity(entries.len());
        for entry in entries {
            let author = self.authors.get(&entry.author_id).ok_or(
                ZotsiftError::DanglingAuthorReference {
                    item_id: id,
                    author_id: entry.author_id,
                },
            )?;
            placed.push((entry.position, author));
        }
        placed.sort_by_key(|(position, _)| *position);
        Ok(placed
            .into_iter()
            .map(|(_, author)| author.clone())
            .collect())
    }

    pub fn authors(&self) -> impl Iterator<Item = (i64, &Author)> {
        self.authors.iter().map(|(id, author)| (*id, author))
    }

    #[must_use]
    pub fn author_item_refs(&self, author_id: i64) -> &[AuthorItemRef] {
        self.author_items
            .get(&author_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn items_by_author(&self, author_id: i64) -> impl Iterator<Item = i64> + '_ {
        self.author_item_refs(author_id)
            .iter()
            .map(|item_ref| item_ref.item_id)
    }

    /// On-demand attachment lookup; every call queries `source` again.
    pub fn get_attachments(&self, source: &dyn RowSource, id: i64) -> Result<Vec<Attachment>> {
        if !self.items.contains_key(&id) {
            return Err(ZotsiftError::NotFound(format!("item {id}")));
        }
        source.attachments(id)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn association_count(&self) -> usize {
        self.item_authors.values().map(Vec::len).sum()
    }
}

// Zotero stores `YYYY-MM-DD <original text>`; an all-zero date means the
// original text could not be parsed.
fn parse_field_date(raw: &str) -> Result<Option<PartialDate>> {
    let Some(token) = raw.split_whitespace().next() else {
        return Ok(None);
    };
    let date = token.parse::<PartialDate>()?;
    if date.year == 0 {
        return Ok(None);
    }
    Ok(Some(date))
}

fn parse_added_date(raw: &str) -> Result<PartialDate> {
    let raw = raw.trim();
    let date = NaiveDateTime::parse_from_str(raw, ADDED_TIMESTAMP_FORMAT)
        .map(|timestamp| timestamp.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, ADDED_DATE_FORMAT))
        .map_err(|err| ZotsiftError::malformed_date(raw, format!("invalid dateAdded: {err}")))?;
    Ok(PartialDate {
        year: date.year(),
        month: u8::try_from(date.month()).ok(),
        day: u8::try_from(date.day()).ok(),
    })
}
