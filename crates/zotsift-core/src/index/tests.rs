use super::*;
use crate::source::MemoryRowSource;

fn orwell_library() -> MemoryRowSource {
    let mut source = MemoryRowSource::new();
    source
        .push_creator(10, "George", "Orwell")
        .push_creator(20, "Eric", "Blair")
        .push_item(1, "ORWL1984", "2021-03-04 10:00:00")
        .push_title(1, "1984")
        .push_date(1, "1949-06-08 8 June 1949");
    source
}

#[test]
fn authors_are_placed_by_stored_position() {
    let mut source = orwell_library();
    source.push_item_creator(1, 10, 1).push_item_creator(1, 20, 0);

    let index = LibraryIndex::build(&source).expect("build");
    let authors = index.get_authors_ordered(1).expect("authors");
    assert_eq!(
        authors,
        vec![Author::new("Eric", "Blair"), Author::new("George", "Orwell")]
    );
}

#[test]
fn sparse_and_duplicate_positions_are_tolerated() {
    let mut source = orwell_library();
    source
        .push_item_creator(1, 10, 7)
        .push_item_creator(1, 20, 3)
        .push_item_creator(1, 10, 3);

    let index = LibraryIndex::build(&source).expect("build");
    let authors = index.get_authors_ordered(1).expect("authors");
    let last_names = authors
        .iter()
        .map(|a| a.last_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(last_names, vec!["Blair", "Orwell", "Orwell"]);
}

#[test]
fn association_rows_need_not_be_contiguous() {
    let mut source = orwell_library();
    source
        .push_item(2, "ORWLFARM", "2021-03-05 09:30:00")
        .push_item_creator(2, 10, 0)
        .push_item_creator(1, 20, 1)
        .push_item_creator(1, 10, 0);

    let index = LibraryIndex::build(&source).expect("build");
    let mut orwell_items = index.items_by_author(10).collect::<Vec<_>>();
    orwell_items.sort_unstable();
    assert_eq!(orwell_items, vec![1, 2]);
    assert_eq!(index.items_by_author(20).collect::<Vec<_>>(), vec![1]);
    assert_eq!(
        index.author_item_refs(20),
        &[AuthorItemRef {
            item_id: 1,
            position: 1
        }]
    );
    assert_eq!(index.association_count(), 3);
}

#[test]
fn dangling_author_reference_names_the_item() {
    let mut source = orwell_library();
    source.push_item_creator(1, 99, 0);

    let index = LibraryIndex::build(&source).expect("build");
    let err = index.get_authors_ordered(1).expect_err("dangling");
    assert!(matches!(
        err,
        ZotsiftError::DanglingAuthorReference {
            item_id: 1,
            author_id: 99
        }
    ));
    assert!(err.to_string().contains("item 1"));
}

#[test]
fn items_without_authors_resolve_to_empty_list() {
    let index = LibraryIndex::build(&orwell_library()).expect("build");
    assert!(index.get_authors_ordered(1).expect("authors").is_empty());
    assert!(index.get_authors_ordered(404).expect("unknown").is_empty());
}

#[test]
fn field_rows_fill_item_and_defaults_remain() {
    let mut source = MemoryRowSource::new();
    source
        .push_item(1, "K1", "2021-03-04 10:00:00")
        .push_item(2, "K2", "2022-01-01")
        .push_field(2, FieldKind::Abstract.field_id(), "An abstract");

    let index = LibraryIndex::build(&source).expect("build");
    let first = index.get_item(1).expect("item 1");
    assert_eq!(first.title, crate::models::DEFAULT_TITLE);
    assert_eq!(first.abstract_text, crate::models::DEFAULT_ABSTRACT);
    assert_eq!(first.publication_date, None);
    assert_eq!(first.added_date, PartialDate::ymd(2021, 3, 4));

    let second = index.get_item_by_key("K2").expect("by key");
    assert_eq!(second.id, 2);
    assert_eq!(second.abstract_text, "An abstract");
    assert_eq!(second.added_date, PartialDate::ymd(2022, 1, 1));
    assert_eq!(index.item_count(), 2);
}

#[test]
fn zotero_multipart_dates_keep_literal_precision() {
    let mut source = MemoryRowSource::new();
    source
        .push_item(1, "K1", "2021-03-04 10:00:00")
        .push_date(1, "2019-00-00 2019")
        .push_item(2, "K2", "2021-03-04 10:00:00")
        .push_date(2, "0000-00-00 Spring")
        .push_item(3, "K3", "2021-03-04 10:00:00")
        .push_date(3, "");

    let index = LibraryIndex::build(&source).expect("build");
    assert_eq!(
        index.get_item(1).expect("1").publication_date,
        Some(PartialDate::ymd(2019, 0, 0))
    );
    assert_eq!(index.get_item(2).expect("2").publication_date, None);
    assert_eq!(index.get_item(3).expect("3").publication_date, None);
}

#[test]
fn unexpected_field_kind_aborts_load() {
    let mut source = orwell_library();
    source.push_field(1, 14, "unexpected");

    let err = LibraryIndex::build(&source).expect_err("must fail");
    assert_eq!(err.code(), "LOAD_ERROR");
    assert!(matches!(
        err.root_cause(),
        ZotsiftError::UnexpectedFieldKind {
            item_id: 1,
            field_id: 14
        }
    ));
}

#[test]
fn unparseable_embedded_date_aborts_load() {
    let mut source = orwell_library();
    source.push_date(1, "June 1949");

    let err = LibraryIndex::build(&source).expect_err("must fail");
    assert!(matches!(err, ZotsiftError::Load { stage: "items", .. }));
    assert!(matches!(err.root_cause(), ZotsiftError::MalformedDate { .. }));
}

#[test]
fn malformed_added_timestamp_aborts_load() {
    let mut source = MemoryRowSource::new();
    source.push_item(1, "K1", "yesterday");

    let err = LibraryIndex::build(&source).expect_err("must fail");
    assert!(matches!(err.root_cause(), ZotsiftError::MalformedDate { .. }));
}

#[test]
fn negative_order_index_is_a_malformed_row() {
    let mut source = orwell_library();
    source.push_item_creator(1, 10, -1);

    let err = LibraryIndex::build(&source).expect_err("must fail");
    assert!(matches!(
        err,
        ZotsiftError::Load {
            stage: "item_creators",
            ..
        }
    ));
    assert!(matches!(err.root_cause(), ZotsiftError::MalformedRow(_)));
}

#[test]
fn attachments_are_fetched_on_demand() {
    let mut source = orwell_library();
    source.push_attachment(
        1,
        Attachment {
            key: "PDF1".to_string(),
            path: Some("storage:1984.pdf".to_string()),
            content_type: crate::source::PDF_CONTENT_TYPE.to_string(),
        },
    );

    let index = LibraryIndex::build(&source).expect("build");
    let attachments = index.get_attachments(&source, 1).expect("attachments");
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].key, "PDF1");

    let err = index.get_attachments(&source, 404).expect_err("unknown item");
    assert!(matches!(err, ZotsiftError::NotFound(_)));
}
