use chrono::{DateTime, FixedOffset, TimeZone};
use diary::db;
use diary::listing::{Catalog, Selection};
use diary::models::NewEntry;
use diary::paging::ActiveChoice;
use diary::tags::parse_title;
use tempfile::tempdir;

fn jst(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(y, m, d, hh, mm, 0)
        .unwrap()
}

fn new_entry(title: &str, body: &str) -> NewEntry {
    NewEntry {
        title: title.to_string(),
        body: body.to_string(),
        created_at: jst(2024, 4, 1, 8, 15),
    }
}

#[test]
fn entry_crud_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/diary.db");
    let conn = db::initialize_db(&path).expect("init");
    assert!(path.exists());

    let now = jst(2024, 4, 2, 12, 0);
    let id = db::create_entry(&conn, &new_entry("旅行[travel][food]", "京都へ"), &now).unwrap();
    assert!(id > 0);

    let entry = db::get_entry(&conn, id).unwrap().expect("entry");
    assert_eq!(entry.title, "旅行[travel][food]");
    assert_eq!(entry.body, "京都へ");
    assert_eq!(entry.created_at, "2024-04-01T08:15:00+09:00");
    assert_eq!(entry.updated_at, "2024-04-02T12:00:00+09:00");

    let parsed = parse_title(&entry.title);
    assert_eq!(parsed.tags, vec!["travel", "food"]);
    assert_eq!(parsed.display_title, "旅行");

    let later = jst(2024, 4, 3, 9, 0);
    let changed = db::update_entry(&conn, id, &new_entry("旅行[travel]", "奈良へ"), &later).unwrap();
    assert_eq!(changed, 1);
    let entry = db::get_entry(&conn, id).unwrap().expect("entry");
    assert_eq!(entry.id, id);
    assert_eq!(entry.body, "奈良へ");
    assert_eq!(entry.updated_at, "2024-04-03T09:00:00+09:00");

    assert_eq!(db::delete_entry(&conn, id).unwrap(), 1);
    assert!(db::get_entry(&conn, id).unwrap().is_none());
    assert!(db::list_entries(&conn).unwrap().is_empty());
}

#[test]
fn list_is_newest_id_first() {
    let dir = tempdir().unwrap();
    let conn = db::initialize_db(&dir.path().join("diary.db")).unwrap();
    let now = jst(2024, 4, 2, 12, 0);

    // created_at is user editable, so list order must follow the id
    let mut entry = new_entry("first", "b");
    entry.created_at = jst(2030, 1, 1, 0, 0);
    let a = db::create_entry(&conn, &entry, &now).unwrap();
    let b = db::create_entry(&conn, &new_entry("second", "b"), &now).unwrap();
    let c = db::create_entry(&conn, &new_entry("third", "b"), &now).unwrap();

    let ids: Vec<i64> = db::list_entries(&conn).unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c, b, a]);
}

#[test]
fn deleted_ids_are_not_reused() {
    let dir = tempdir().unwrap();
    let conn = db::initialize_db(&dir.path().join("diary.db")).unwrap();
    let now = jst(2024, 4, 2, 12, 0);

    let a = db::create_entry(&conn, &new_entry("a", "b"), &now).unwrap();
    let b = db::create_entry(&conn, &new_entry("b", "b"), &now).unwrap();
    db::delete_entry(&conn, b).unwrap();
    let c = db::create_entry(&conn, &new_entry("c", "b"), &now).unwrap();
    assert!(c > b && b > a);
}

#[test]
fn listing_pipeline_against_sqlite() {
    let dir = tempdir().unwrap();
    let conn = db::initialize_db(&dir.path().join("diary.db")).unwrap();
    let now = jst(2024, 4, 2, 12, 0);

    for n in 1..=25 {
        let title = if n % 2 == 0 {
            format!("day {n}[even]")
        } else {
            format!("day {n}")
        };
        db::create_entry(&conn, &new_entry(&title, "body"), &now).unwrap();
    }

    let selection = Selection::from_query(Some("13"), None, None);
    let listing = Catalog::build(db::list_entries(&conn).unwrap(), &selection.tag)
        .paginate(10, &selection);
    assert_eq!(listing.page, 2);
    assert_eq!(listing.total_pages, 3);
    assert_eq!(listing.resolve_active(13), Some(ActiveChoice::Selected(13)));

    let active = listing
        .load_active(selection.id, |id| db::get_entry(&conn, id))
        .unwrap()
        .expect("active");
    assert_eq!(active.0, 13);
    assert_eq!(active.1.title, "day 13");

    // stale link to an entry deleted after the list was read
    db::delete_entry(&conn, 13).unwrap();
    let active = listing
        .load_active(selection.id, |id| db::get_entry(&conn, id))
        .unwrap()
        .expect("fallback");
    assert_eq!(active.0, 15);

    let selection = Selection::from_query(None, Some("even"), None);
    let listing = Catalog::build(db::list_entries(&conn).unwrap(), &selection.tag)
        .paginate(10, &selection);
    assert_eq!(listing.catalog.total_entries, 24);
    assert_eq!(listing.catalog.filtered.len(), 12);
    assert_eq!(listing.total_pages, 2);
    assert_eq!(listing.page_items().first().map(|e| e.id), Some(24));
}
