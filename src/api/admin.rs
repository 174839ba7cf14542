use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{parse_role, parse_status, validate_id};
use super::{
    ApiError, ApiResponse, AppState, LoanDto, RoleUpdateRequest, StatusUpdateRequest, UserDto,
};
use crate::domain::{Caller, Capability, authorize};
use crate::models::{LoanLimits, LoanSettings, PaymentNumbers};

// ============================================================================
// Users
// ============================================================================

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.users().list(&caller).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// PUT /admin/users/{id}/role
/// The role gate runs before the body is parsed, so a non-`SuperAdmin` is
/// refused whatever it sends
pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    payload: Result<Json<RoleUpdateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    authorize(&caller, Capability::ChangeUserRole)?;
    let Json(payload) = payload?;
    let id = validate_id("user", id)?;
    let role = parse_role(&payload.role)?;

    let user = state.users().change_role(&caller, id, role).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

// ============================================================================
// Loans
// ============================================================================

/// PUT /admin/loans/{id}/status
/// Last write wins; Approved and Rejected stamp `status_changed_at`
pub async fn update_loan_status(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoanDto>>, ApiError> {
    authorize(&caller, Capability::ChangeLoanStatus)?;
    let Json(payload) = payload?;
    let id = validate_id("loan", id)?;
    let status = parse_status(&payload.status)?;

    let loan = state.loans().set_status(&caller, id, status).await?;
    Ok(Json(ApiResponse::success(loan.into())))
}

// ============================================================================
// Settings
// ============================================================================

/// PUT /admin/settings/loan-limits
pub async fn update_loan_limits(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<LoanLimits>, JsonRejection>,
) -> Result<Json<ApiResponse<LoanSettings>>, ApiError> {
    authorize(&caller, Capability::UpdateSettings)?;
    let Json(limits) = payload?;
    let settings = state.settings().set_limits(&caller, limits).await?;
    Ok(Json(ApiResponse::success(settings)))
}

/// PUT /admin/settings/payment-numbers
pub async fn update_payment_numbers(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<PaymentNumbers>, JsonRejection>,
) -> Result<Json<ApiResponse<LoanSettings>>, ApiError> {
    authorize(&caller, Capability::UpdateSettings)?;
    let Json(numbers) = payload?;
    let settings = state.settings().set_payment_numbers(&caller, numbers).await?;
    Ok(Json(ApiResponse::success(settings)))
}
