use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{
    amount_from_query, months_from_query, parse_duration, parse_optional_status,
    parse_payment_method, validate_id,
};
use super::{
    ApiError, ApiResponse, AppState, ApplyLoanRequest, CalculateQuery, LoanDto, LoanListQuery,
};
use crate::domain::Caller;
use crate::models::{BorrowerDetails, LoanLimits, LoanRequest, PaymentNumbers};
use crate::services::{LoanQuery, LoanQuote, LoanSubmission};

/// POST /loans/apply
/// Submit an application; repayment figures are computed server-side
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<ApplyLoanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LoanDto>>), ApiError> {
    let Json(payload) = payload?;

    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let submission = LoanSubmission {
        request: LoanRequest {
            loan_amount: payload.loan_amount,
            loan_duration: parse_duration(&payload.loan_duration)?,
            downpayment_method: parse_payment_method(&payload.downpayment_method)?,
            downpayment_screenshot_url: payload.downpayment_screenshot_url,
        },
        borrower: BorrowerDetails {
            full_name: payload.full_name,
            date_of_birth: payload.date_of_birth,
            phone_number: payload.phone_number,
            address: payload.address,
            national_id_number: payload.national_id_number,
            nid_front_url: payload.nid_front_url,
            nid_back_url: payload.nid_back_url,
            salary_amount: payload.salary_amount,
            job_type: payload.job_type,
            bank_account_number: payload.bank_account_number,
            emergency_contact_name: payload.emergency_contact_name,
            emergency_contact_phone: payload.emergency_contact_phone,
        },
    };

    let loan = state.loans().submit(&caller, submission).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(loan.into()))))
}

/// GET /loans?status=&user_id=
/// Users always get their own applications; staff may filter by owner
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<LoanListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LoanDto>>>, ApiError> {
    let Query(query) = query?;

    let query = LoanQuery {
        status: parse_optional_status(query.status.as_deref())?,
        user_id: query.user_id,
    };

    let loans = state.loans().list(&caller, query).await?;

    Ok(Json(ApiResponse::success(
        loans.into_iter().map(LoanDto::from).collect(),
    )))
}

/// GET /loans/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LoanDto>>, ApiError> {
    let id = validate_id("loan", id)?;
    let loan = state.loans().get(&caller, id).await?;
    Ok(Json(ApiResponse::success(loan.into())))
}

/// GET /loans/settings/limits
pub async fn limits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LoanLimits>>, ApiError> {
    let limits = state.settings().limits().await?;
    Ok(Json(ApiResponse::success(limits)))
}

/// GET /loans/settings/payment-numbers
pub async fn payment_numbers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PaymentNumbers>>, ApiError> {
    let numbers = state.settings().payment_numbers().await?;
    Ok(Json(ApiResponse::success(numbers)))
}

/// GET /loans/calculate?amount=&duration=
/// Repayment preview at the current rate; unparsable or out-of-range
/// numbers quote as zero
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<LoanQuote>>, ApiError> {
    let Query(query) = query?;

    let quote = state
        .loans()
        .quote(
            amount_from_query(query.amount.as_deref()),
            months_from_query(query.duration.as_deref()),
        )
        .await;

    Ok(Json(ApiResponse::success(quote)))
}
