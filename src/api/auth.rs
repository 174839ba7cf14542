use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, AuthResponse, LoginRequest, RegisterRequest, UserDto};
use crate::domain::Caller;
use crate::services::Registration;

/// Session key holding the signed-in user's id.
const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login/register)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <token>` header
///
/// On success the caller's [`Caller`] is inserted as a request extension.
/// The account is reloaded on every request so role changes apply at once.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let mut user = None;

    if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await {
        user = state.auth().get_user(user_id).await.ok();
    }

    if user.is_none()
        && let Some(token) = extract_token(&headers)
    {
        user = state.auth().authenticate_token(&token).await?;
    }

    let Some(user) = user else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(user.caller());
    Ok(next.run(request).await)
}

/// Extract the session token from the request headers
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create a `User` account and sign it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let Json(payload) = payload?;

    let user = state
        .auth()
        .register(Registration {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            phone_number: payload.phone_number,
            address: payload.address,
        })
        .await?;

    start_session(&session, user.id).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

/// POST /auth/login
/// Authenticate with email and password, returns the profile and token
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let Json(payload) = payload?;

    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state.auth().login(&payload.email, &payload.password).await?;

    start_session(&session, user.id).await?;
    tracing::debug!(user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::success(user.into())))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> Json<ApiResponse<()>> {
    let _ = session.flush().await;
    Json(ApiResponse {
        success: true,
        data: None,
        error: None,
    })
}

/// GET /auth/me
/// Profile of the authenticated caller
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth().get_user(caller.user_id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

// ============================================================================
// Helpers
// ============================================================================

async fn start_session(session: &Session, user_id: i32) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    session
        .insert(SESSION_USER_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}
