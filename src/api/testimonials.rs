use aakkai_core::models::{CreateTestimonialInput, Testimonial};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Testimonial>>> {
    Ok(Json(state.db.list_testimonials()?))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Json(input): Json<CreateTestimonialInput>,
) -> ApiResult<(StatusCode, Json<Testimonial>)> {
    if let Some(field) = input.missing_field() {
        return Err(ApiError::missing_field(field));
    }
    Ok((StatusCode::CREATED, Json(state.db.create_testimonial(input)?)))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_testimonial(id)? {
        return Err(ApiError::NotFound("testimonial"));
    }
    Ok(StatusCode::NO_CONTENT)
}
