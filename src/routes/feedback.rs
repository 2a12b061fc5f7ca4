use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::{error::ApiError, models::feedback::FeedbackInput, state::AppState};

pub async fn submit_feedback(
    state: web::Data<AppState>,
    body: web::Json<FeedbackInput>,
) -> Result<HttpResponse, ApiError> {
    let feedback = body.into_inner().into_feedback(Utc::now())?;
    let saved = state
        .feedback
        .insert(feedback)
        .await
        .map_err(|e| ApiError::store("Failed to submit feedback", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Feedback submitted successfully",
        "feedback": saved,
    })))
}

pub async fn list_feedback(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let feedbacks = state
        .feedback
        .list()
        .await
        .map_err(|e| ApiError::store("Failed to retrieve feedback", e))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "feedbacks": feedbacks })))
}
