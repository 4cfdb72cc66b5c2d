//! Integration tests for tree creation and the explicit deletion routine.

use assert_matches::assert_matches;
use figtree_core::records::{RecordKind, RecordRef};
use figtree_core::roles::TreeRole;
use figtree_db::models::records::citation::{Citation, CreateCitation};
use figtree_db::models::records::note::{CreateNote, Note};
use figtree_db::models::records::person::{CreatePerson, Person};
use figtree_db::models::records::source::{CreateSource, Source};
use figtree_db::models::tree::{CreateTree, UpdateTree};
use figtree_db::models::user::CreateUser;
use figtree_db::repositories::{MembershipRepo, RecordRepo, TreeRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn tree(name: &str) -> CreateTree {
    CreateTree {
        name: name.to_string(),
    }
}

fn note(text: &str, subject: Option<RecordRef>) -> CreateNote {
    CreateNote {
        text: text.to_string(),
        subject,
    }
}

async fn count(pool: &PgPool, table: &str, tree_id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE tree_id = $1"))
        .bind(tree_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_becomes_admin(pool: PgPool) {
    let user = new_user(&pool, "ada").await;

    let (family_tree, membership) = TreeRepo::create_with_admin(&pool, &tree("Lovelace"), user)
        .await
        .unwrap();

    assert_eq!(family_tree.name, "Lovelace");
    assert_eq!(membership.tree_id, family_tree.id);
    assert_eq!(membership.user_id, user);
    assert_eq!(membership.role, TreeRole::Admin);
    assert_eq!(
        MembershipRepo::find_role(&pool, user, family_tree.id).await.unwrap(),
        Some(TreeRole::Admin)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_membership_insert_rolls_back_tree(pool: PgPool) {
    // No such user: the membership insert violates its foreign key.
    let err = TreeRepo::create_with_admin(&pool, &tree("Orphan"), 999_999)
        .await
        .unwrap_err();
    assert_eq!(err.as_database_error().unwrap().code().as_deref(), Some("23503"));

    let trees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM family_trees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trees, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_tree(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let (family_tree, _) = TreeRepo::create_with_admin(&pool, &tree("Old"), user)
        .await
        .unwrap();

    let renamed = TreeRepo::update(
        &pool,
        family_tree.id,
        &UpdateTree {
            name: Some("New".into()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "New");

    let untouched = TreeRepo::update(&pool, family_tree.id, &UpdateTree::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.name, "New");
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tree_cannot_be_deleted_directly(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let (family_tree, _) = TreeRepo::create_with_admin(&pool, &tree("Kept"), user)
        .await
        .unwrap();

    let err = sqlx::query("DELETE FROM family_trees WHERE id = $1")
        .bind(family_tree.id)
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(err.as_database_error().unwrap().code().as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_every_owned_row(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let other = new_user(&pool, "bob").await;
    let (doomed, _) = TreeRepo::create_with_admin(&pool, &tree("Doomed"), user)
        .await
        .unwrap();
    let (kept, _) = TreeRepo::create_with_admin(&pool, &tree("Kept"), other)
        .await
        .unwrap();

    let person: Person = RecordRepo::create(&pool, doomed.id, true, &CreatePerson::default())
        .await
        .unwrap();
    let source: Source = RecordRepo::create(
        &pool,
        doomed.id,
        false,
        &CreateSource {
            title: "Parish register".into(),
            author: None,
            pubinfo: None,
        },
    )
    .await
    .unwrap();
    let _: Citation = RecordRepo::create(
        &pool,
        doomed.id,
        false,
        &CreateCitation {
            page_or_reference: None,
            confidence: None,
            source_id: source.id,
            subject: Some(RecordRef::new(RecordKind::Person, person.id)),
        },
    )
    .await
    .unwrap();
    let _: Note = RecordRepo::create(&pool, kept.id, true, &note("survives", None))
        .await
        .unwrap();

    assert!(TreeRepo::delete(&pool, doomed.id).await.unwrap());

    assert!(TreeRepo::find_by_id(&pool, doomed.id).await.unwrap().is_none());
    for kind in RecordKind::ALL {
        assert_eq!(count(&pool, kind.table(), doomed.id).await, 0, "{kind}");
    }
    assert_eq!(count(&pool, "tree_memberships", doomed.id).await, 0);

    assert_eq!(count(&pool, "notes", kept.id).await, 1);
    assert_eq!(count(&pool, "tree_memberships", kept.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_tree_returns_false(pool: PgPool) {
    assert!(!TreeRepo::delete(&pool, 424_242).await.unwrap());
}

// ---------------------------------------------------------------------------
// Record deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_delete_takes_attachments_along(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let (family_tree, _) = TreeRepo::create_with_admin(&pool, &tree("Attachments"), user)
        .await
        .unwrap();
    let t = family_tree.id;

    let person: Person = RecordRepo::create(&pool, t, true, &CreatePerson::default())
        .await
        .unwrap();
    let bystander: Person = RecordRepo::create(&pool, t, true, &CreatePerson::default())
        .await
        .unwrap();
    let on_person: Note = RecordRepo::create(
        &pool,
        t,
        true,
        &note("about the person", Some(RecordRef::new(RecordKind::Person, person.id))),
    )
    .await
    .unwrap();
    // Attached to the attachment: removed transitively.
    let on_note: Note = RecordRepo::create(
        &pool,
        t,
        true,
        &note("about the note", Some(RecordRef::new(RecordKind::Note, on_person.id))),
    )
    .await
    .unwrap();
    let unrelated: Note = RecordRepo::create(
        &pool,
        t,
        true,
        &note("about someone else", Some(RecordRef::new(RecordKind::Person, bystander.id))),
    )
    .await
    .unwrap();

    assert!(RecordRepo::delete(&pool, RecordKind::Person, person.id).await.unwrap());

    assert!(RecordRepo::find_by_id::<Note>(&pool, on_person.id).await.unwrap().is_none());
    assert!(RecordRepo::find_by_id::<Note>(&pool, on_note.id).await.unwrap().is_none());
    assert!(RecordRepo::find_by_id::<Note>(&pool, unrelated.id).await.unwrap().is_some());
    assert!(!RecordRepo::delete(&pool, RecordKind::Person, person.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_source_removes_its_citations_and_their_notes(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let (family_tree, _) = TreeRepo::create_with_admin(&pool, &tree("Sources"), user)
        .await
        .unwrap();
    let t = family_tree.id;

    let source: Source = RecordRepo::create(
        &pool,
        t,
        false,
        &CreateSource {
            title: "Census 1881".into(),
            author: None,
            pubinfo: None,
        },
    )
    .await
    .unwrap();
    let citation: Citation = RecordRepo::create(
        &pool,
        t,
        false,
        &CreateCitation {
            page_or_reference: Some("folio 3".into()),
            confidence: None,
            source_id: source.id,
            subject: None,
        },
    )
    .await
    .unwrap();
    let citation_note: Note = RecordRepo::create(
        &pool,
        t,
        false,
        &note("transcribed", Some(RecordRef::new(RecordKind::Citation, citation.id))),
    )
    .await
    .unwrap();

    assert!(RecordRepo::delete(&pool, RecordKind::Source, source.id).await.unwrap());

    assert!(RecordRepo::find_by_id::<Citation>(&pool, citation.id).await.unwrap().is_none());
    assert!(RecordRepo::find_by_id::<Note>(&pool, citation_note.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn optional_references_are_cleared_on_delete(pool: PgPool) {
    use figtree_db::models::records::event::{CreateEvent, Event};

    let user = new_user(&pool, "ada").await;
    let (family_tree, _) = TreeRepo::create_with_admin(&pool, &tree("Events"), user)
        .await
        .unwrap();
    let t = family_tree.id;

    let birth: Event = RecordRepo::create(
        &pool,
        t,
        true,
        &CreateEvent {
            event_type: "Birth".into(),
            date_type: None,
            date: None,
            date_end: None,
            description: None,
            place_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(birth.date_type, 0);

    let person: Person = RecordRepo::create(
        &pool,
        t,
        true,
        &CreatePerson {
            birth_id: Some(birth.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(RecordRepo::delete(&pool, RecordKind::Event, birth.id).await.unwrap());

    let person: Person = RecordRepo::find_by_id(&pool, person.id).await.unwrap().unwrap();
    assert_matches!(person.birth_id, None);
}
