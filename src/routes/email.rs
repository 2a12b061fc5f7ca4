use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, services::email_template::render_trip_email, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEmailRequest {
    pub email: Option<String>,
    pub trip_id: Option<String>,
}

pub async fn send_trip_email(
    state: web::Data<AppState>,
    body: web::Json<TripEmailRequest>,
) -> Result<HttpResponse, ApiError> {
    let TripEmailRequest { email, trip_id } = body.into_inner();

    let email = email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty() && e.contains('@'))
        .ok_or_else(|| ApiError::Validation("A valid email address is required".to_string()))?;
    let trip_id = trip_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("tripId is required".to_string()))?;

    let plan = state
        .trips
        .find_by_id(&trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trip plan not found.".to_string()))?;

    let mailer = state.mailer.as_ref().ok_or_else(|| ApiError::Email {
        message: "Failed to send email.".to_string(),
        cause: "no mail provider configured".to_string(),
    })?;

    let (subject, html) = render_trip_email(&plan);
    mailer
        .send_html(&email, &subject, &html)
        .await
        .map_err(|e| ApiError::Email {
            message: "Failed to send email.".to_string(),
            cause: e.to_string(),
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Trip plan emailed successfully.",
    })))
}
