//! Membership administration over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_tree, create_user, delete_auth, expect_data, get_auth, grant,
    post_json_auth, put_json_auth, token_for,
};
use figtree_core::roles::TreeRole;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_grants_access_with_default_role(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let guest = create_user(&pool, "guest").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let app = common::build_test_app(pool);

    let body = json!({ "tree_id": tree.id, "user_id": guest.id });
    let membership = expect_data(
        post_json_auth(&app, "/api/v1/memberships", &token_for(&admin), body.clone()).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(membership["role"], "read");
    assert_eq!(membership["user_id"], guest.id);

    let duplicate = post_json_auth(&app, "/api/v1/memberships", &token_for(&admin), body).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // The guest can now see the tree.
    let response = get_auth(&app, &format!("/api/v1/trees/{}", tree.id), &token_for(&guest)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn granting_needs_admin_on_the_tree(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let writer = create_user(&pool, "writer").await;
    let outsider = create_user(&pool, "outsider").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    grant(&pool, tree.id, &writer, TreeRole::Write).await;
    let app = common::build_test_app(pool);

    let body = json!({ "tree_id": tree.id, "user_id": outsider.id, "role": "admin" });
    let by_writer = post_json_auth(&app, "/api/v1/memberships", &token_for(&writer), body.clone()).await;
    assert_eq!(by_writer.status(), StatusCode::NOT_FOUND);

    // Granting yourself access to someone else's tree.
    let mut own = body;
    own["user_id"] = json!(outsider.id);
    let by_outsider = post_json_auth(&app, "/api/v1/memberships", &token_for(&outsider), own).await;
    assert_eq!(by_outsider.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn granting_to_missing_user_is_bad_request(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let app = common::build_test_app(pool);

    let body = json!({ "tree_id": tree.id, "user_id": 999999, "role": "read" });
    let response = post_json_auth(&app, "/api/v1/memberships", &token_for(&admin), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn memberships_are_hidden_from_non_admins(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let writer = create_user(&pool, "writer").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let writer_membership = grant(&pool, tree.id, &writer, TreeRole::Write).await;
    let app = common::build_test_app(pool);

    let listed = expect_data(
        get_auth(&app, "/api/v1/memberships", &token_for(&writer)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed, json!([]));

    // Not even their own membership.
    let uri = format!("/api/v1/memberships/{writer_membership}");
    let own = get_auth(&app, &uri, &token_for(&writer)).await;
    assert_eq!(own.status(), StatusCode::NOT_FOUND);

    let listed = expect_data(
        get_auth(&app, &format!("/api/v1/memberships?tree_id={}", tree.id), &token_for(&admin)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_change_applies_to_the_next_request(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let reader = create_user(&pool, "reader").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let membership = grant(&pool, tree.id, &reader, TreeRole::Read).await;
    let app = common::build_test_app(pool);

    let secret = expect_data(
        post_json_auth(
            &app,
            "/api/v1/sources",
            &token_for(&admin),
            json!({ "tree_id": tree.id, "title": "Parish register" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/v1/sources/{}", secret["id"]);

    // Same token before and after: roles are not baked into it.
    let token = token_for(&reader);
    assert_eq!(get_auth(&app, &uri, &token).await.status(), StatusCode::NOT_FOUND);

    let promote = put_json_auth(
        &app,
        &format!("/api/v1/memberships/{membership}"),
        &token_for(&admin),
        json!({ "role": "read_private" }),
    )
    .await;
    assert_eq!(promote.status(), StatusCode::OK);
    assert_eq!(get_auth(&app, &uri, &token).await.status(), StatusCode::OK);

    let revoke = delete_auth(&app, &format!("/api/v1/memberships/{membership}"), &token_for(&admin)).await;
    assert_eq!(revoke.status(), StatusCode::NO_CONTENT);
    assert_eq!(get_auth(&app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_admin_is_protected(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let app = common::build_test_app(pool);
    let token = token_for(&admin);

    let listed = expect_data(
        get_auth(&app, &format!("/api/v1/memberships?tree_id={}", tree.id), &token).await,
        StatusCode::OK,
    )
    .await;
    let uri = format!("/api/v1/memberships/{}", listed[0]["id"]);

    let demote = put_json_auth(&app, &uri, &token, json!({ "role": "write" })).await;
    assert_eq!(demote.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(demote).await["code"], "CONFLICT");

    let remove = delete_auth(&app, &uri, &token).await;
    assert_eq!(remove.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_role_name_is_rejected(pool: PgPool) {
    let admin = create_user(&pool, "admin").await;
    let guest = create_user(&pool, "guest").await;
    let tree = create_tree(&pool, &admin, "Tree").await;
    let app = common::build_test_app(pool);

    let body = json!({ "tree_id": tree.id, "user_id": guest.id, "role": "owner" });
    let response = post_json_auth(&app, "/api/v1/memberships", &token_for(&admin), body).await;
    assert!(response.status().is_client_error());
}
