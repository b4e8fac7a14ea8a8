use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::schema::{ContactSubmission, PartnerSubmission};
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/intake/contact", post(contact_intake))
        .route("/intake/partner", post(partner_intake))
        .layer(TraceLayer::new_for_http())
        // Forms post from the static marketing site's origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn contact_intake(
    State(state): State<Arc<AppState>>,
    Form(submission): Form<ContactSubmission>,
) -> impl IntoResponse {
    Json(state.contact.receive(submission).await)
}

pub async fn partner_intake(
    State(state): State<Arc<AppState>>,
    Form(submission): Form<PartnerSubmission>,
) -> impl IntoResponse {
    Json(state.partner.receive(submission).await)
}

pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
