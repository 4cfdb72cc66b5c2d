//! Family tree endpoints and their role checks.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_tree, create_user, delete_auth, expect_data, get_auth, grant,
    post_json_auth, put_json_auth, token_for,
};
use figtree_core::roles::TreeRole;
use figtree_db::repositories::{MembershipRepo, TreeRepo};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_becomes_admin(pool: PgPool) {
    let user = create_user(&pool, "ada").await;
    let app = common::build_test_app(pool.clone());

    let tree = expect_data(
        post_json_auth(&app, "/api/v1/trees", &token_for(&user), json!({ "name": "Lovelace" })).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(tree["name"], "Lovelace");

    let tree_id = tree["id"].as_i64().unwrap();
    let role = MembershipRepo::find_role(&pool, user.id, tree_id).await.unwrap();
    assert_eq!(role, Some(TreeRole::Admin));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_names(pool: PgPool) {
    let user = create_user(&pool, "ada").await;
    let app = common::build_test_app(pool);
    let token = token_for(&user);

    let blank = post_json_auth(&app, "/api/v1/trees", &token, json!({ "name": "  " })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let long = post_json_auth(&app, "/api/v1/trees", &token, json!({ "name": "x".repeat(51) })).await;
    assert_eq!(long.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(long).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_shows_only_member_trees(pool: PgPool) {
    let ada = create_user(&pool, "ada").await;
    let bo = create_user(&pool, "bo").await;
    let mine = create_tree(&pool, &ada, "Alpha").await;
    let shared = create_tree(&pool, &bo, "Beta").await;
    create_tree(&pool, &bo, "Gamma").await;
    grant(&pool, shared.id, &ada, TreeRole::Read).await;
    let app = common::build_test_app(pool);

    let trees = expect_data(get_auth(&app, "/api/v1/trees", &token_for(&ada)).await, StatusCode::OK).await;
    let ids: Vec<i64> = trees.as_array().unwrap().iter().map(|t| t["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![mine.id, shared.id]);

    let page = expect_data(
        get_auth(&app, "/api/v1/trees?limit=1&offset=1", &token_for(&ada)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["id"], shared.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_member_sees_not_found(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let stranger = create_user(&pool, "stranger").await;
    let tree = create_tree(&pool, &owner, "Private").await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/trees/{}", tree.id);
    let token = token_for(&stranger);

    let get = get_auth(&app, &uri, &token).await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);
    let put = put_json_auth(&app, &uri, &token, json!({ "name": "Mine" })).await;
    assert_eq!(put.status(), StatusCode::NOT_FOUND);
    let delete = delete_auth(&app, &uri, &token).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    // Same answer as for a tree that does not exist.
    let missing = get_auth(&app, "/api/v1/trees/999999", &token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admins_change_the_tree(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let writer = create_user(&pool, "writer").await;
    let tree = create_tree(&pool, &owner, "Family").await;
    grant(&pool, tree.id, &writer, TreeRole::Write).await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/trees/{}", tree.id);

    let read = get_auth(&app, &uri, &token_for(&writer)).await;
    assert_eq!(read.status(), StatusCode::OK);

    let rename = put_json_auth(&app, &uri, &token_for(&writer), json!({ "name": "Ours" })).await;
    assert_eq!(rename.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(rename).await["code"], "FORBIDDEN");

    let delete = delete_auth(&app, &uri, &token_for(&writer)).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let renamed = expect_data(
        put_json_auth(&app, &uri, &token_for(&owner), json!({ "name": "Ours" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(renamed["name"], "Ours");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_tree_records_and_memberships(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let reader = create_user(&pool, "reader").await;
    let tree = create_tree(&pool, &owner, "Doomed").await;
    grant(&pool, tree.id, &reader, TreeRole::Read).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(&owner);

    let person = expect_data(
        post_json_auth(&app, "/api/v1/people", &token, json!({ "tree_id": tree.id, "sex": 0 })).await,
        StatusCode::CREATED,
    )
    .await;
    let note = json!({
        "tree_id": tree.id,
        "text": "Born at sea",
        "subject": { "kind": "person", "id": person["id"] },
    });
    post_json_auth(&app, "/api/v1/notes", &token, note).await;

    let response = delete_auth(&app, &format!("/api/v1/trees/{}", tree.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(TreeRepo::find_by_id(&pool, tree.id).await.unwrap().is_none());
    assert_eq!(MembershipRepo::find_role(&pool, reader.id, tree.id).await.unwrap(), None);
    for table in ["people", "notes"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE tree_id = $1"))
            .bind(tree.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} left behind");
    }

    let again = get_auth(&app, &format!("/api/v1/trees/{}", tree.id), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
