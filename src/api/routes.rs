use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::reviews::ReviewSubmission;
use crate::core::{Plan, Review, SiteServices};
use crate::utils::error::{ErrorBody, SiteError};

pub const REVIEW_SUBMITTED: &str = "Review submitted";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub review: Review,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
}

pub async fn plans_handler(
    State(services): State<SiteServices>,
) -> Result<Json<Vec<Plan>>, SiteError> {
    Ok(Json(services.catalog.list_plans().await?))
}

pub async fn reviews_handler(
    State(services): State<SiteServices>,
) -> Result<Json<Vec<Review>>, SiteError> {
    Ok(Json(services.reviews.list_reviews().await?))
}

pub async fn public_reviews_handler(
    State(services): State<SiteServices>,
) -> Result<Json<Vec<Review>>, SiteError> {
    Ok(Json(services.reviews.list_recent_reviews().await?))
}

pub async fn submit_review_handler(
    State(services): State<SiteServices>,
    payload: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, SiteError> {
    let Json(submission) =
        payload.map_err(|rejection| SiteError::validation(rejection.body_text()))?;

    let review = services.reviews.submit_review(submission).await?;
    Ok(Json(SubmitResponse {
        message: REVIEW_SUBMITTED.to_string(),
        review,
    }))
}

pub async fn health_handler(State(services): State<SiteServices>) -> Response {
    match services.reviews.storage_reachable().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                storage: "reachable".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody {
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
