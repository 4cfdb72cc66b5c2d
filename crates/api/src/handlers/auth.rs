//! Handlers for the `/auth` resource: signup and activation, login, token
//! refresh, logout, the current profile and password reset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use figtree_core::error::CoreError;
use figtree_core::roles::account_role;
use figtree_core::validation;
use figtree_db::models::session::NewRefreshSession;
use figtree_db::models::user::{CreateUser, User, UserResponse};
use figtree_db::models::user_token::TokenPurpose;
use figtree_db::repositories::{SessionRepo, UserRepo, UserTokenRepo};
use serde::{Deserialize, Serialize};

use crate::auth::email_token;
use crate::auth::hash_token;
use crate::auth::jwt::{generate_access_token, generate_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::mail::OutgoingMail;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins that lock an account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an inactive account and email it an activation token.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let username = input.username.trim();
    let email = input.email.trim();
    validation::username(username)?;
    validation::email(email)?;
    validate_password_strength(&input.password, state.config.password_min_length)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    let ttl = Duration::hours(state.config.activation_token_ttl_hours);
    let token = email_token::issue(user.id, TokenPurpose::Activation, ttl);
    UserTokenRepo::create(&state.pool, &token.record).await?;

    let mail = OutgoingMail::activation(
        &user.email,
        &user.username,
        &state.config.public_base_url,
        &token.plaintext,
    );
    if let Err(err) = state.mailer.send(mail).await {
        // Nobody could activate the account, so free its username and email.
        UserRepo::delete_inactive(&state.pool, user.id).await?;
        tracing::warn!(user_id = user.id, error = %err, "Activation mail failed");
        return Err(err.into());
    }

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// POST /api/v1/auth/activate
pub async fn activate(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let token = UserTokenRepo::consume(&state.pool, TokenPurpose::Activation, &hash_token(&input.token))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired activation token".into()))?;

    UserRepo::activate(&state.pool, token.user_id).await?;
    let user = find_user(&state, token.user_id).await?;

    tracing::info!(user_id = user.id, "Account activated");
    Ok(Json(DataResponse { data: user.into() }))
}

/// POST /api/v1/auth/login
///
/// Unknown users and wrong passwords get the same 401. Inactive and locked
/// accounts get 403.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not active".into(),
        )));
    }

    if user.is_locked(Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(invalid());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let (response, session) = issue_tokens(&state, user)?;
    SessionRepo::open(&state.pool, &session).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new pair. The old session is revoked, so
/// each refresh token works once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let session = SessionRepo::find_live(&state.pool, &hash_token(&input.refresh_token))
        .await?
        .ok_or_else(invalid)?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not active".into(),
        )));
    }

    let (response, next) = issue_tokens(&state, user)?;
    // A concurrent refresh with the same token already won.
    if SessionRepo::rotate(&state.pool, session.id, &next).await?.is_none() {
        return Err(invalid());
    }
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session of the caller.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// POST /api/v1/auth/password-reset
///
/// Always 202, whether or not the address belongs to an account. Active
/// accounts get an email with a single-use token; older reset tokens stop
/// working.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> AppResult<StatusCode> {
    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        return Ok(StatusCode::ACCEPTED);
    };
    if !user.is_active {
        return Ok(StatusCode::ACCEPTED);
    }

    UserTokenRepo::invalidate_for_user(&state.pool, user.id, TokenPurpose::PasswordReset).await?;
    let ttl = Duration::minutes(state.config.password_reset_token_ttl_mins);
    let token = email_token::issue(user.id, TokenPurpose::PasswordReset, ttl);
    UserTokenRepo::create(&state.pool, &token.record).await?;

    let mail = OutgoingMail::password_reset(
        &user.email,
        &user.username,
        &state.config.public_base_url,
        &token.plaintext,
    );
    // The response must not depend on delivery.
    if let Err(e) = state.mailer.send(mail).await {
        tracing::error!(user_id = user.id, error = %e, "Password reset email failed");
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/password-reset/confirm
///
/// Set a new password with a reset token. Every session of the account is
/// revoked.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> AppResult<StatusCode> {
    // Checked first so a weak password does not burn the token.
    validate_password_strength(&input.new_password, state.config.password_min_length)?;

    let token = UserTokenRepo::consume(&state.pool, TokenPurpose::PasswordReset, &hash_token(&input.token))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired password reset token".into()))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, token.user_id, &password_hash).await?;
    SessionRepo::revoke_all(&state.pool, token.user_id).await?;

    tracing::info!(user_id = token.user_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: figtree_core::types::DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))
}

/// Issue an access token and a refresh token. The returned session must be
/// stored before the response is sent.
fn issue_tokens(state: &AppState, user: User) -> AppResult<(AuthResponse, NewRefreshSession)> {
    let role = account_role(user.is_staff);
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, token_hash) = generate_refresh_token();
    let session = NewRefreshSession {
        user_id: user.id,
        token_hash,
        expires_at: Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days),
    };

    let response = AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.into(),
    };
    Ok((response, session))
}
