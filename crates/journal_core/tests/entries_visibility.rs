use chrono::NaiveDate;
use journal_core::db::open_db_in_memory;
use journal_core::{
    can_view, AuthService, EntryDraft, EntryRepository, EntryService, JournalRepository,
    JournalService, ServiceError, SqliteEntryRepository, SqliteJournalRepository,
    SqliteUserRepository, User, ValidationError,
};
use rusqlite::Connection;

type SqliteEntryService<'conn> =
    EntryService<SqliteEntryRepository<'conn>, SqliteJournalRepository<'conn>>;

fn signup(conn: &Connection, email: &str, password: &str) -> User {
    let auth = AuthService::new(SqliteUserRepository::try_new(conn).unwrap());
    auth.signup(email, password, None).unwrap();
    auth.login(email, password).unwrap()
}

fn entry_service(conn: &Connection) -> SqliteEntryService<'_> {
    EntryService::new(
        SqliteEntryRepository::try_new(conn).unwrap(),
        SqliteJournalRepository::try_new(conn).unwrap(),
    )
}

fn journal_service(conn: &Connection) -> JournalService<SqliteJournalRepository<'_>> {
    JournalService::new(SqliteJournalRepository::try_new(conn).unwrap())
}

fn draft(content: &str, journal: Option<String>, is_public: bool) -> EntryDraft {
    EntryDraft {
        content: content.to_string(),
        journal,
        is_public,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn entry_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn journal_entry_becomes_visible_after_joining() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let trip = journal_service(&conn).create_journal(&a, "Trip").unwrap();
    let entries = entry_service(&conn);
    let day_one = entries
        .create_entry(&a, &draft("Day 1", Some(trip.to_string()), false))
        .unwrap();

    let b = signup(&conn, "b@x.com", "pw2");
    let before: Vec<_> = entries
        .list_visible_entries(&b)
        .unwrap()
        .into_iter()
        .map(|view| view.entry.id)
        .collect();
    assert!(!before.contains(&day_one));

    journal_service(&conn).join_journal(&b, trip).unwrap();

    let after = entries.list_visible_entries(&b).unwrap();
    let shown = after
        .iter()
        .find(|view| view.entry.id == day_one)
        .expect("Day 1 should be visible after joining");
    assert_eq!(shown.entry.content, "Day 1");
    assert_eq!(shown.owner_email, "a@x.com");
    assert_eq!(shown.journal_name.as_deref(), Some("Trip"));
}

#[test]
fn public_personal_entry_is_visible_to_everyone() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let b = signup(&conn, "b@x.com", "pw2");
    let c = signup(&conn, "c@x.com", "pw3");
    let entries = entry_service(&conn);

    let shared = entries
        .create_entry(&a, &draft("hello world", None, true))
        .unwrap();

    for viewer in [&a, &b, &c] {
        assert!(entries
            .list_visible_entries(viewer)
            .unwrap()
            .iter()
            .any(|view| view.entry.id == shared));
        assert_eq!(entries.view_entry(viewer, shared).unwrap().entry.id, shared);
    }
}

#[test]
fn empty_content_is_rejected_and_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let entries = entry_service(&conn);

    for content in ["", "   ", "\n\t"] {
        let err = entries
            .create_entry(&a, &draft(content, None, false))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidInput(ValidationError::EmptyContent)
        ));
    }
    assert_eq!(entry_count(&conn), 0);
}

#[test]
fn unparsable_journal_selector_creates_personal_private_entry() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let entries = entry_service(&conn);

    let id = entries
        .create_entry(&a, &draft("  note to self  ", Some("not-a-number".into()), false))
        .unwrap();

    let stored = SqliteEntryRepository::try_new(&conn)
        .unwrap()
        .get_entry(id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.journal_id, None);
    assert!(!stored.is_public);
    assert_eq!(stored.content, "note to self");
    assert_eq!(stored.entry_date, chrono::Local::now().date_naive());
}

#[test]
fn entry_into_missing_journal_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");

    let err = entry_service(&conn)
        .create_entry(&a, &draft("x", Some("77".into()), false))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            resource: "journal",
            id: 77
        }
    ));
    assert_eq!(entry_count(&conn), 0);
}

#[test]
fn non_member_cannot_write_into_journal() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let b = signup(&conn, "b@x.com", "pw2");
    let trip = journal_service(&conn).create_journal(&a, "Trip").unwrap();

    let err = entry_service(&conn)
        .create_entry(&b, &draft("sneaky", Some(trip.to_string()), false))
        .unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied { .. }));
    assert_eq!(entry_count(&conn), 0);
}

#[test]
fn personal_entries_exclude_journal_entries_and_are_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let trip = journal_service(&conn).create_journal(&a, "Trip").unwrap();
    let entries = entry_service(&conn);

    let first = entries.create_entry(&a, &draft("first", None, false)).unwrap();
    entries
        .create_entry(&a, &draft("in trip", Some(trip.to_string()), false))
        .unwrap();
    let second = entries.create_entry(&a, &draft("second", None, true)).unwrap();

    let personal: Vec<_> = entries
        .list_personal_entries(&a)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(personal, vec![second, first]);
}

#[test]
fn visible_entries_sort_by_date_then_id_descending() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let entries = entry_service(&conn);

    let old = entries
        .create_entry_on(&a, &draft("old", None, false), day(1))
        .unwrap();
    let newest = entries
        .create_entry_on(&a, &draft("newest", None, false), day(9))
        .unwrap();
    let mid_a = entries
        .create_entry_on(&a, &draft("mid a", None, false), day(5))
        .unwrap();
    let mid_b = entries
        .create_entry_on(&a, &draft("mid b", None, false), day(5))
        .unwrap();

    let order: Vec<_> = entries
        .list_visible_entries(&a)
        .unwrap()
        .into_iter()
        .map(|view| view.entry.id)
        .collect();
    assert_eq!(order, vec![newest, mid_b, mid_a, old]);

    let calendar = entries.calendar(&a).unwrap();
    assert_eq!(calendar.len(), 3);
    assert_eq!(calendar[1].date, day(5));
    assert_eq!(calendar[1].entries.len(), 2);
}

#[test]
fn view_entry_checks_access_and_existence() {
    let conn = open_db_in_memory().unwrap();
    let a = signup(&conn, "a@x.com", "pw1");
    let b = signup(&conn, "b@x.com", "pw2");
    let entries = entry_service(&conn);
    let private = entries.create_entry(&a, &draft("mine", None, false)).unwrap();

    assert!(entries.view_entry(&a, private).is_ok());
    assert!(matches!(
        entries.view_entry(&b, private).unwrap_err(),
        ServiceError::AccessDenied {
            resource: "entry",
            ..
        }
    ));
    assert!(matches!(
        entries.view_entry(&b, private + 1000).unwrap_err(),
        ServiceError::NotFound {
            resource: "entry",
            ..
        }
    ));
    // get_entry does not check access.
    assert_eq!(entries.get_entry(private).unwrap().owner_email, "a@x.com");
}

#[test]
fn sql_visibility_matches_can_view_for_every_user_and_entry() {
    let conn = open_db_in_memory().unwrap();
    let users: Vec<User> = ["a@x.com", "b@x.com", "c@x.com"]
        .iter()
        .map(|email| signup(&conn, email, "pw"))
        .collect();
    let journals = journal_service(&conn);
    let first = journals.create_journal(&users[0], "First").unwrap();
    let second = journals.create_journal(&users[1], "Second").unwrap();
    journals.join_journal(&users[2], first).unwrap();

    let entries = entry_service(&conn);
    let entry_repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let journal_repo = SqliteJournalRepository::try_new(&conn).unwrap();
    for author in &users {
        for is_public in [false, true] {
            for journal in [None, Some(first), Some(second)] {
                let is_member = match journal {
                    Some(id) => journal_repo.is_member(id, author.id).unwrap(),
                    None => true,
                };
                let selector = journal.map(|id: i64| id.to_string());
                let result = entries.create_entry(author, &draft("fixture", selector, is_public));
                if is_member {
                    assert!(result.is_ok(), "{} {:?}: {:?}", author.email, journal, result);
                } else {
                    assert!(
                        matches!(result, Err(ServiceError::AccessDenied { .. })),
                        "{} {:?}: {:?}",
                        author.email,
                        journal,
                        result
                    );
                }
            }
        }
    }

    let total = entry_count(&conn);
    assert!(total > 0);

    for viewer in &users {
        let memberships = journal_repo.memberships_of(viewer.id).unwrap();
        let mut expected = Vec::new();
        for id in 1..=total {
            let entry = entry_repo.get_entry(id).unwrap().unwrap();
            if can_view(viewer.id, &entry, &memberships) {
                expected.push(id);
            }
        }
        let mut listed: Vec<_> = entry_repo
            .list_visible(viewer.id)
            .unwrap()
            .into_iter()
            .map(|view| view.entry.id)
            .collect();
        listed.sort_unstable();
        assert_eq!(listed, expected, "viewer {}", viewer.email);
    }
}
