//! HTTP API.
//!
//! Public routes serve the marketing site and portfolio; `/api/profile` and
//! `/api/notifications` need a team member; `/api/admin` needs an admin.

mod auth;
mod error;
mod extract;
mod inquiries;
mod notifications;
mod portfolio;
mod profile;
mod projects;
mod team;
mod testimonials;

use std::sync::Arc;

use aakkai_core::Database;
use axum::{
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use extract::{AdminCaller, Caller, MemberCaller};

use crate::auth::{IdentityProvider, SessionResolver};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub provider: Arc<dyn IdentityProvider>,
    pub resolver: SessionResolver,
    /// Default OAuth redirect target.
    pub redirect_to: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/api/auth/login", get(auth::login_url))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/logout", post(auth::logout))
        // Public site
        .route("/api/team", get(team::list_public))
        .route("/api/testimonials", get(testimonials::list))
        .route("/api/projects", get(portfolio::list))
        .route("/api/inquiries", post(inquiries::submit))
        // Team member
        .route("/api/profile", get(profile::get_profile).patch(profile::update_profile))
        .route("/api/profile/availability", post(profile::toggle_availability))
        .route("/api/profile/projects", get(projects::list_mine).post(projects::create))
        .route(
            "/api/profile/projects/{id}",
            get(projects::get_one).patch(projects::update).delete(projects::remove),
        )
        .route("/api/notifications", get(notifications::list_mine))
        .route("/api/notifications/{id}/read", post(notifications::mark_read))
        .route("/api/notifications/{id}", delete(notifications::remove))
        // Admin
        .route("/api/admin/team", get(team::list_all).post(team::provision))
        .route("/api/admin/team/{id}", patch(team::update).delete(team::remove))
        .route("/api/admin/member-projects", get(projects::list_all))
        .route("/api/admin/projects", get(portfolio::list).post(portfolio::create))
        .route(
            "/api/admin/projects/{id}",
            patch(portfolio::update).delete(portfolio::remove),
        )
        .route("/api/admin/inquiries", get(inquiries::list))
        .route(
            "/api/admin/inquiries/{id}",
            patch(inquiries::update_status).delete(inquiries::remove),
        )
        .route("/api/admin/testimonials", post(testimonials::create))
        .route("/api/admin/testimonials/{id}", delete(testimonials::remove))
        .route("/api/admin/notifications", post(notifications::send))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
