use journal_core::db::open_db_in_memory;
use journal_core::{
    AuthService, JoinOutcome, JournalRepository, JournalService, ServiceError,
    SqliteJournalRepository, SqliteUserRepository, User, ValidationError,
};
use rusqlite::Connection;

fn signup(conn: &Connection, email: &str) -> User {
    let auth = AuthService::new(SqliteUserRepository::try_new(conn).unwrap());
    auth.signup(email, "pw", None).unwrap();
    auth.login(email, "pw").unwrap()
}

fn membership_rows(conn: &Connection, journal_id: i64, user_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM journal_members WHERE journal_id = ?1 AND user_id = ?2;",
        [journal_id, user_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn creator_is_member_of_new_journal() {
    let conn = open_db_in_memory().unwrap();
    let owner = signup(&conn, "a@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());

    let journal_id = journals.create_journal(&owner, "  Trip ").unwrap();

    assert!(journals.is_member(&owner, journal_id).unwrap());
    let repo = SqliteJournalRepository::try_new(&conn).unwrap();
    let journal = repo.get_journal(journal_id).unwrap().unwrap();
    assert_eq!(journal.name, "Trip");
    assert_eq!(journal.owner_id, owner.id);
}

#[test]
fn blank_journal_name_is_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let owner = signup(&conn, "a@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());

    let err = journals.create_journal(&owner, "   ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::EmptyJournalName)
    ));
}

#[test]
fn joining_twice_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let owner = signup(&conn, "a@x.com");
    let guest = signup(&conn, "b@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());
    let journal_id = journals.create_journal(&owner, "Trip").unwrap();

    assert_eq!(
        journals.join_journal(&guest, journal_id).unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(
        journals.join_journal(&guest, journal_id).unwrap(),
        JoinOutcome::AlreadyMember
    );
    assert_eq!(membership_rows(&conn, journal_id, guest.id), 1);
}

#[test]
fn owner_joining_own_journal_is_already_member() {
    let conn = open_db_in_memory().unwrap();
    let owner = signup(&conn, "a@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());
    let journal_id = journals.create_journal(&owner, "Trip").unwrap();

    assert_eq!(
        journals.join_journal(&owner, journal_id).unwrap(),
        JoinOutcome::AlreadyMember
    );
}

#[test]
fn joining_missing_journal_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let guest = signup(&conn, "b@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());

    let err = journals.join_journal(&guest, 404).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            resource: "journal",
            id: 404
        }
    ));
}

#[test]
fn repeated_membership_insert_is_absorbed_by_primary_key() {
    let conn = open_db_in_memory().unwrap();
    let owner = signup(&conn, "a@x.com");
    let guest = signup(&conn, "b@x.com");
    let repo = SqliteJournalRepository::try_new(&conn).unwrap();
    let journal_id = repo.create_journal(owner.id, "Trip").unwrap();

    assert!(repo.add_member(journal_id, guest.id).unwrap());
    assert!(!repo.add_member(journal_id, guest.id).unwrap());
    assert_eq!(membership_rows(&conn, journal_id, guest.id), 1);
}

#[test]
fn accessible_journals_are_owned_or_joined_without_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let alice = signup(&conn, "a@x.com");
    let bob = signup(&conn, "b@x.com");
    let carol = signup(&conn, "c@x.com");
    let journals = JournalService::new(SqliteJournalRepository::try_new(&conn).unwrap());

    let trip = journals.create_journal(&alice, "Trip").unwrap();
    let book_club = journals.create_journal(&bob, "Book club").unwrap();
    let _private = journals.create_journal(&carol, "Carol only").unwrap();
    journals.join_journal(&alice, book_club).unwrap();
    journals.join_journal(&bob, trip).unwrap();

    let listed: Vec<_> = journals
        .list_accessible_journals(&alice)
        .unwrap()
        .into_iter()
        .map(|journal| journal.id)
        .collect();
    assert_eq!(listed, vec![book_club, trip]);
}

#[test]
fn memberships_of_lists_joined_journal_ids() {
    let conn = open_db_in_memory().unwrap();
    let alice = signup(&conn, "a@x.com");
    let bob = signup(&conn, "b@x.com");
    let repo = SqliteJournalRepository::try_new(&conn).unwrap();
    let trip = repo.create_journal(alice.id, "Trip").unwrap();
    let other = repo.create_journal(alice.id, "Other").unwrap();
    repo.add_member(trip, bob.id).unwrap();

    let bob_memberships = repo.memberships_of(bob.id).unwrap();
    assert!(bob_memberships.contains(&trip));
    assert!(!bob_memberships.contains(&other));
    assert_eq!(repo.memberships_of(alice.id).unwrap().len(), 2);
}
