use std::collections::HashMap;

use crate::error::Result;
use crate::models::Attachment;

use super::{CreatorRow, FieldKind, FieldValue, ItemCreatorRow, ItemFieldRow, RowSink, RowSource};

/// Row source backed by plain vectors, replayed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    creators: Vec<CreatorRow>,
    item_creators: Vec<ItemCreatorRow>,
    item_fields: Vec<ItemFieldRow>,
    attachments: HashMap<i64, Vec<Attachment>>,
}

impl MemoryRowSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_creator(
        &mut self,
        creator_id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> &mut Self {
        self.creators.push(CreatorRow {
            creator_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        });
        self
    }

    pub fn push_item_creator(
        &mut self,
        item_id: i64,
        creator_id: i64,
        order_index: i64,
    ) -> &mut Self {
        self.item_creators.push(ItemCreatorRow {
            item_id,
            creator_id,
            order_index,
        });
        self
    }

    /// Adds the bare items row; `date_added` uses Zotero's `YYYY-MM-DD HH:MM:SS`.
    pub fn push_item(
        &mut self,
        item_id: i64,
        key: impl Into<String>,
        date_added: impl Into<String>,
    ) -> &mut Self {
        self.item_fields.push(ItemFieldRow {
            item_id,
            key: key.into(),
            item_type_id: 0,
            date_added: date_added.into(),
            date_modified: String::new(),
            field: None,
        });
        self
    }

    /// Adds a field row for an item previously added with [`Self::push_item`].
    pub fn push_field(
        &mut self,
        item_id: i64,
        field_id: i64,
        value: impl Into<String>,
    ) -> &mut Self {
        let template = self
            .item_fields
            .iter()
            .find(|row| row.item_id == item_id)
            .cloned()
            .unwrap_or_else(|| ItemFieldRow {
                item_id,
                key: format!("ITEM{item_id}"),
                item_type_id: 0,
                date_added: String::new(),
                date_modified: String::new(),
                field: None,
            });
        self.item_fields.push(ItemFieldRow {
            field: Some(FieldValue {
                field_id,
                value: value.into(),
            }),
            ..template
        });
        self
    }

    pub fn push_title(&mut self, item_id: i64, title: impl Into<String>) -> &mut Self {
        self.push_field(item_id, FieldKind::Title.field_id(), title)
    }

    pub fn push_date(&mut self, item_id: i64, date: impl Into<String>) -> &mut Self {
        self.push_field(item_id, FieldKind::Date.field_id(), date)
    }

    pub fn push_attachment(&mut self, parent_item_id: i64, attachment: Attachment) -> &mut Self {
        self.attachments
            .entry(parent_item_id)
            .or_default()
            .push(attachment);
        self
    }
}

impl RowSource for MemoryRowSource {
    fn for_each_creator(&self, sink: RowSink<'_, CreatorRow>) -> Result<()> {
        for row in &self.creators {
            sink(row.clone())?;
        }
        Ok(())
    }

    fn for_each_item_creator(&self, sink: RowSink<'_, ItemCreatorRow>) -> Result<()> {
        for row in &self.item_creators {
            sink(*row)?;
        }
        Ok(())
    }

    fn for_each_item_field(&self, sink: RowSink<'_, ItemFieldRow>) -> Result<()> {
        for row in &self.item_fields {
            sink(row.clone())?;
        }
        Ok(())
    }

    fn attachments(&self, parent_item_id: i64) -> Result<Vec<Attachment>> {
        Ok(self
            .attachments
            .get(&parent_item_id)
            .map(|list| {
                list.iter()
                    .filter(|a| a.content_type == super::PDF_CONTENT_TYPE)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
