use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row, params};

use crate::error::{Result, ZotsiftError};
use crate::models::Attachment;

use super::{
    CreatorRow, FieldKind, FieldValue, ItemCreatorRow, ItemFieldRow, PDF_CONTENT_TYPE, RowSink,
    RowSource,
};

const CREATORS_SQL: &str = r"
    SELECT creatorID, firstName, lastName
    FROM creators
";

const ITEM_CREATORS_SQL: &str = r"
    SELECT itemID, creatorID, orderIndex
    FROM itemCreators
";

const ITEM_FIELDS_SQL: &str = r"
    SELECT
      i.itemID,
      i.key,
      i.itemTypeID,
      i.dateAdded,
      i.dateModified,
      d.fieldID,
      v.value
    FROM items i
    LEFT JOIN itemData d
      ON d.itemID = i.itemID AND d.fieldID IN (?1, ?2, ?3)
    LEFT JOIN itemDataValues v
      ON v.valueID = d.valueID
    WHERE i.itemID NOT IN (SELECT itemID FROM itemAttachments)
      AND i.itemID NOT IN (SELECT itemID FROM itemNotes)
      AND i.itemID NOT IN (SELECT itemID FROM deletedItems)
    ORDER BY i.itemID ASC, d.fieldID ASC
";

const ATTACHMENTS_SQL: &str = r"
    SELECT i.key, a.path, a.contentType
    FROM itemAttachments a
    JOIN items i ON i.itemID = a.itemID
    WHERE a.parentItemID = ?1
      AND a.contentType = ?2
      AND a.itemID NOT IN (SELECT itemID FROM deletedItems)
    ORDER BY a.itemID ASC
";

/// Read-only view over a `zotero.sqlite` file.
pub struct SqliteRowSource {
    conn: Connection,
}

impl std::fmt::Debug for SqliteRowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRowSource").finish_non_exhaustive()
    }
}

impl SqliteRowSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ZotsiftError::NotFound(format!(
                "zotero database {}",
                path.display()
            )));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }
}

impl RowSource for SqliteRowSource {
    fn for_each_creator(&self, sink: RowSink<'_, CreatorRow>) -> Result<()> {
        let mut stmt = self.conn.prepare(CREATORS_SQL)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            sink(CreatorRow {
                creator_id: row.get(0)?,
                first_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                last_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })?;
        }
        Ok(())
    }

    fn for_each_item_creator(&self, sink: RowSink<'_, ItemCreatorRow>) -> Result<()> {
        let mut stmt = self.conn.prepare(ITEM_CREATORS_SQL)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            sink(ItemCreatorRow {
                item_id: row.get(0)?,
                creator_id: row.get(1)?,
                order_index: row.get(2)?,
            })?;
        }
        Ok(())
    }

    fn for_each_item_field(&self, sink: RowSink<'_, ItemFieldRow>) -> Result<()> {
        let mut stmt = self.conn.prepare(ITEM_FIELDS_SQL)?;
        let mut rows = stmt.query(params![
            FieldKind::Title.field_id(),
            FieldKind::Abstract.field_id(),
            FieldKind::Date.field_id(),
        ])?;
        while let Some(row) = rows.next()? {
            sink(read_item_field_row(row)?)?;
        }
        Ok(())
    }

    fn attachments(&self, parent_item_id: i64) -> Result<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(ATTACHMENTS_SQL)?;
        let rows = stmt.query_map(params![parent_item_id, PDF_CONTENT_TYPE], |row| {
            Ok(Attachment {
                key: row.get(0)?,
                path: row.get(1)?,
                content_type: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn read_item_field_row(row: &Row<'_>) -> Result<ItemFieldRow> {
    let item_id: i64 = row.get(0)?;
    let field_id: Option<i64> = row.get(5)?;
    let value: Option<String> = row.get(6)?;
    let field = match (field_id, value) {
        (Some(field_id), Some(value)) => Some(FieldValue { field_id, value }),
        (Some(field_id), None) => {
            return Err(ZotsiftError::MalformedRow(format!(
                "item {item_id} field {field_id} has no stored value"
            )));
        }
        (None, _) => None,
    };

    Ok(ItemFieldRow {
        item_id,
        key: row.get(1)?,
        item_type_id: row.get(2)?,
        date_added: row.get(3)?,
        date_modified: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        field,
    })
}
