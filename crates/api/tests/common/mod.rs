#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use figtree_api::auth::jwt::{generate_access_token, JwtConfig};
use figtree_api::auth::password::hash_password;
use figtree_api::config::ServerConfig;
use figtree_api::mail::{MailError, Mailer, OutgoingMail};
use figtree_api::router::build_app_router;
use figtree_api::state::AppState;
use figtree_core::access::AccessConfig;
use figtree_core::roles::{account_role, TreeRole};
use figtree_core::types::DbId;
use figtree_db::models::membership::CreateMembership;
use figtree_db::models::tree::{CreateTree, FamilyTree};
use figtree_db::models::user::{CreateUser, UpdateUser, User};
use figtree_db::repositories::{MembershipRepo, TreeRepo, UserRepo};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        password_min_length: 12,
        activation_token_ttl_hours: 72,
        password_reset_token_ttl_mins: 60,
        public_base_url: "http://figtree.test".to_string(),
        jwt: JwtConfig {
            secret: "figtree-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        email: None,
        access: AccessConfig::default(),
    }
}

/// Captures every email instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// The `token=` query value of the last email sent to `to`.
    pub fn last_token_for(&self, to: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|mail| mail.to == to)
            .and_then(|mail| mail.body.split("token=").nth(1))
            .map(|rest| rest.split_whitespace().next().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Rejects every email, as an unreachable SMTP relay would.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::Build("relay unavailable".to_string()))
    }
}

/// The router used in production, over `pool`, delivering through `mailer`.
pub fn build_test_app_using(pool: PgPool, mailer: Arc<dyn Mailer>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), mailer);
    build_app_router(state, &config).expect("test CORS origins are valid")
}

pub fn build_test_app_with_mailer(pool: PgPool) -> (Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    (build_test_app_using(pool, mailer.clone()), mailer)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool).0
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the `data` payload.
pub async fn expect_data(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An active member account with password [`PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@figtree.test"),
            password_hash: hash_password(PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    UserRepo::activate(pool, user.id).await.unwrap();
    UserRepo::find_by_id(pool, user.id).await.unwrap().unwrap()
}

pub async fn create_staff(pool: &PgPool, username: &str) -> User {
    let user = create_user(pool, username).await;
    let flags = UpdateUser {
        is_active: None,
        is_staff: Some(true),
    };
    UserRepo::update(pool, user.id, &flags).await.unwrap().unwrap()
}

/// An access token for `user`, as login would issue it.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, account_role(user.is_staff), &test_config().jwt).unwrap()
}

/// A tree created by `owner`, who becomes its admin.
pub async fn create_tree(pool: &PgPool, owner: &User, name: &str) -> FamilyTree {
    let input = CreateTree {
        name: name.to_string(),
    };
    TreeRepo::create_with_admin(pool, &input, owner.id).await.unwrap().0
}

pub async fn grant(pool: &PgPool, tree_id: DbId, user: &User, role: TreeRole) -> DbId {
    let input = CreateMembership {
        tree_id,
        user_id: user.id,
        role: Some(role),
    };
    MembershipRepo::create(pool, &input).await.unwrap().id
}
