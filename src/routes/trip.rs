use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthenticatedUser,
    models::trip::{TripRequest, TripRequestInput},
    state::AppState,
};

pub async fn create_trip(
    state: web::Data<AppState>,
    body: web::Json<TripRequestInput>,
) -> Result<HttpResponse, ApiError> {
    let request = TripRequest::try_from(body.into_inner())?;
    let plan = state.planner.generate(&request).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Trip plan generated and stored successfully",
        "tripPlan": plan,
    })))
}

pub async fn get_trip_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = path.into_inner();
    let plan = state
        .trips
        .find_by_id(&trip_id)
        .await
        .map_err(|e| ApiError::store("Error retrieving trip plan", e))?
        .ok_or_else(|| ApiError::NotFound("Trip plan not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "tripPlan": plan })))
}

pub async fn get_my_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let plan = state
        .trips
        .find_by_owner(&user.user_id)
        .await
        .map_err(|e| ApiError::store("Error retrieving trip plan", e))?
        .ok_or_else(|| ApiError::NotFound("No trip plan found for this user.".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "tripPlan": plan })))
}

pub async fn delete_my_trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let deleted = state
        .trips
        .delete_by_owner(&user.user_id)
        .await
        .map_err(|e| ApiError::store("Error deleting trip plan", e))?;

    if !deleted {
        return Err(ApiError::NotFound(
            "No trip plan found to delete".to_string(),
        ));
    }

    info!("Deleted trip plan of user {}", user.user_id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Trip plan deleted successfully",
    })))
}
