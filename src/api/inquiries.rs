use aakkai_core::models::{CreateInquiryInput, Inquiry, InquiryStatus, UpdateInquiryInput};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct InquiryFilter {
    /// A status name, or `all`.
    pub status: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateInquiryInput>,
) -> ApiResult<(StatusCode, Json<Inquiry>)> {
    if let Err(field) = input.validate() {
        return Err(if field == "email" {
            ApiError::Validation("'email' must be a valid email address".into())
        } else {
            ApiError::missing_field(field)
        });
    }

    let inquiry = state.db.create_inquiry(input)?;
    tracing::info!(inquiry_id = %inquiry.id, "Inquiry received");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Query(filter): Query<InquiryFilter>,
) -> ApiResult<Json<Vec<Inquiry>>> {
    let status = match filter.status.as_deref() {
        None | Some("all") => None,
        Some(name) => Some(
            InquiryStatus::from_str(name)
                .ok_or_else(|| ApiError::Validation(format!("unknown status '{}'", name)))?,
        ),
    };
    Ok(Json(state.db.list_inquiries(status)?))
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateInquiryInput>,
) -> ApiResult<Json<Inquiry>> {
    if !state.db.set_inquiry_status(id, input.status)? {
        return Err(ApiError::NotFound("inquiry"));
    }
    let inquiry = state.db.get_inquiry(id)?.ok_or(ApiError::NotFound("inquiry"))?;
    Ok(Json(inquiry))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_inquiry(id)? {
        return Err(ApiError::NotFound("inquiry"));
    }
    Ok(StatusCode::NO_CONTENT)
}
