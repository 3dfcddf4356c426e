//! Zotero-shaped fixture databases for tests.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::Result;

const FIXTURE_SCHEMA_SQL: &str = r"
    CREATE TABLE items (
        itemID INTEGER PRIMARY KEY,
        itemTypeID INT NOT NULL,
        dateAdded TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        dateModified TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        libraryID INT NOT NULL DEFAULT 1,
        key TEXT NOT NULL
    );
    CREATE TABLE itemDataValues (
        valueID INTEGER PRIMARY KEY,
        value UNIQUE
    );
    CREATE TABLE itemData (
        itemID INT,
        fieldID INT,
        valueID,
        PRIMARY KEY (itemID, fieldID)
    );
    CREATE TABLE creators (
        creatorID INTEGER PRIMARY KEY,
        firstName TEXT,
        lastName TEXT,
        fieldMode INT
    );
    CREATE TABLE itemCreators (
        itemID INT NOT NULL,
        creatorID INT NOT NULL,
        creatorTypeID INT NOT NULL DEFAULT 1,
        orderIndex INT NOT NULL DEFAULT 0,
        PRIMARY KEY (itemID, creatorID, creatorTypeID, orderIndex)
    );
    CREATE TABLE itemAttachments (
        itemID INTEGER PRIMARY KEY,
        parentItemID INT,
        linkMode INT,
        contentType TEXT,
        path TEXT
    );
    CREATE TABLE itemNotes (
        itemID INTEGER PRIMARY KEY,
        parentItemID INT,
        note TEXT,
        title TEXT
    );
    CREATE TABLE deletedItems (
        itemID INTEGER PRIMARY KEY,
        dateDeleted DEFAULT CURRENT_TIMESTAMP NOT NULL
    );
";

pub const BOOK_TYPE_ID: i64 = 2;
pub const ARTICLE_TYPE_ID: i64 = 4;
pub const ATTACHMENT_TYPE_ID: i64 = 14;
pub const NOTE_TYPE_ID: i64 = 1;

/// Item ids of the fixture library.
pub mod ids {
    pub const NINETEEN_EIGHTY_FOUR: i64 = 1;
    pub const ANIMAL_FARM: i64 = 2;
    pub const BRAVE_NEW_WORLD: i64 = 3;
    pub const ATTENTION: i64 = 4;
    pub const ANONYMOUS_REPORT: i64 = 5;
    pub const PDF_1984: i64 = 10;
    pub const EPUB_1984: i64 = 11;
    pub const NOTE: i64 = 12;
    pub const TRASHED_ESSAY: i64 = 13;
}

/// Writes a small library:
///
/// | id | title | authors | date | added |
/// |----|-------|---------|------|-------|
/// | 1 | 1984 | Orwell | 1949-06-08 | 2021-03-04 |
/// | 2 | Animal Farm | Orwell | 1945-08-17 | 2021-03-05 |
/// | 3 | Brave New World | Huxley | 1932 | 2022-11-20 |
/// | 4 | Attention Is All You Need | Vaswani, Shazeer, Parmar | 2017-06-12 | 2023-01-15 |
/// | 5 | Annual Report (no authors) | - | 2019-00-00 | 2023-01-16 |
///
/// Item 1 has a PDF and an EPUB attachment. A note and a trashed Orwell essay
/// exist but must never be loaded.
pub fn write_fixture_library(path: &Path) -> Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(FIXTURE_SCHEMA_SQL)?;

    let mut writer = FixtureWriter::new(&conn);
    writer.creator(1, "George", "Orwell")?;
    writer.creator(2, "Aldous", "Huxley")?;
    writer.creator(3, "Ashish", "Vaswani")?;
    writer.creator(4, "Noam", "Shazeer")?;
    writer.creator(5, "Niki", "Parmar")?;

    writer.item(
        ids::NINETEEN_EIGHTY_FOUR,
        BOOK_TYPE_ID,
        "ORWL1984",
        "2021-03-04 10:00:00",
    )?;
    writer.field(ids::NINETEEN_EIGHTY_FOUR, 1, "1984")?;
    writer.field(ids::NINETEEN_EIGHTY_FOUR, 2, "A dystopian novel.")?;
    writer.field(ids::NINETEEN_EIGHTY_FOUR, 6, "1949-06-08 8 June 1949")?;
    writer.item_creator(ids::NINETEEN_EIGHTY_FOUR, 1, 0)?;

    writer.item(ids::ANIMAL_FARM, BOOK_TYPE_ID, "ORWLFARM", "2021-03-05 09:30:00")?;
    writer.field(ids::ANIMAL_FARM, 1, "Animal Farm")?;
    writer.field(ids::ANIMAL_FARM, 6, "1945-08-17 1945-08-17")?;
    writer.item_creator(ids::ANIMAL_FARM, 1, 0)?;

    writer.item(
        ids::BRAVE_NEW_WORLD,
        BOOK_TYPE_ID,
        "HUXLBNW0",
        "2022-11-20 18:45:12",
    )?;
    writer.field(ids::BRAVE_NEW_WORLD, 1, "Brave New World")?;
    writer.field(ids::BRAVE_NEW_WORLD, 6, "1932 1932")?;
    writer.item_creator(ids::BRAVE_NEW_WORLD, 2, 0)?;

    writer.item(ids::ATTENTION, ARTICLE_TYPE_ID, "VASW2017", "2023-01-15 08:00:00")?;
    writer.field(ids::ATTENTION, 1, "Attention Is All You Need")?;
    writer.field(ids::ATTENTION, 6, "2017-06-12 2017-06-12")?;
    // Stored out of byline order on purpose.
    writer.item_creator(ids::ATTENTION, 5, 2)?;
    writer.item_creator(ids::ATTENTION, 3, 0)?;
    writer.item_creator(ids::ATTENTION, 4, 1)?;

    writer.item(
        ids::ANONYMOUS_REPORT,
        ARTICLE_TYPE_ID,
        "ANONREPT",
        "2023-01-16 12:00:00",
    )?;
    writer.field(ids::ANONYMOUS_REPORT, 1, "Annual Report")?;
    writer.field(ids::ANONYMOUS_REPORT, 6, "2019-00-00 2019")?;

    writer.item(
        ids::PDF_1984,
        ATTACHMENT_TYPE_ID,
        "PDF19840",
        "2021-03-04 10:01:00",
    )?;
    writer.field(ids::PDF_1984, 1, "Full Text PDF")?;
    writer.attachment(
        ids::PDF_1984,
        ids::NINETEEN_EIGHTY_FOUR,
        "application/pdf",
        "storage:orwell-1984.pdf",
    )?;
    writer.item(
        ids::EPUB_1984,
        ATTACHMENT_TYPE_ID,
        "EPUB1984",
        "2021-03-04 10:02:00",
    )?;
    writer.attachment(
        ids::EPUB_1984,
        ids::NINETEEN_EIGHTY_FOUR,
        "application/epub+zip",
        "storage:orwell-1984.epub",
    )?;

    writer.item(ids::NOTE, NOTE_TYPE_ID, "NOTE0001", "2021-04-01 00:00:00")?;
    conn.execute(
        "INSERT INTO itemNotes(itemID, parentItemID, note, title) VALUES (?1, ?2, ?3, ?4)",
        params![ids::NOTE, ids::NINETEEN_EIGHTY_FOUR, "<p>reread</p>", "reread"],
    )?;

    writer.item(
        ids::TRASHED_ESSAY,
        BOOK_TYPE_ID,
        "ORWLTRSH",
        "2020-01-01 00:00:00",
    )?;
    writer.field(ids::TRASHED_ESSAY, 1, "Politics and the English Language")?;
    writer.item_creator(ids::TRASHED_ESSAY, 1, 0)?;
    conn.execute(
        "INSERT INTO deletedItems(itemID) VALUES (?1)",
        params![ids::TRASHED_ESSAY],
    )?;

    Ok(())
}

struct FixtureWriter<'a> {
    conn: &'a Connection,
    next_value_id: i64,
}

impl<'a> FixtureWriter<'a> {
    const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            next_value_id: 1,
        }
    }

    fn creator(&mut self, creator_id: i64, first: &str, last: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO creators(creatorID, firstName, lastName, fieldMode) VALUES (?1, ?2, ?3, 0)",
            params![creator_id, first, last],
        )?;
        Ok(())
    }

    fn item(&mut self, item_id: i64, type_id: i64, key: &str, added: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO items(itemID, itemTypeID, dateAdded, dateModified, key) VALUES (?1, ?2, ?3, ?3, ?4)",
            params![item_id, type_id, added, key],
        )?;
        Ok(())
    }

    fn field(&mut self, item_id: i64, field_id: i64, value: &str) -> Result<()> {
        let value_id = self.next_value_id;
        self.next_value_id += 1;
        self.conn.execute(
            "INSERT INTO itemDataValues(valueID, value) VALUES (?1, ?2)",
            params![value_id, value],
        )?;
        self.conn.execute(
            "INSERT INTO itemData(itemID, fieldID, valueID) VALUES (?1, ?2, ?3)",
            params![item_id, field_id, value_id],
        )?;
        Ok(())
    }

    fn item_creator(&mut self, item_id: i64, creator_id: i64, order_index: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO itemCreators(itemID, creatorID, orderIndex) VALUES (?1, ?2, ?3)",
            params![item_id, creator_id, order_index],
        )?;
        Ok(())
    }

    fn attachment(
        &mut self,
        item_id: i64,
        parent_item_id: i64,
        content_type: &str,
        path: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO itemAttachments(itemID, parentItemID, linkMode, contentType, path) VALUES (?1, ?2, 0, ?3, ?4)",
            params![item_id, parent_item_id, content_type, path],
        )?;
        Ok(())
    }
}
