use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthenticatedUser,
    models::invitation::{
        Invitation, InvitedTrip, InviteInput, InviteResponseInput, InviteStatus, PendingInvite,
        TripSummary,
    },
    state::AppState,
};

async fn inviter_name(state: &AppState, inviter_id: &str) -> Result<Option<String>, ApiError> {
    Ok(state.users.find_by_id(inviter_id).await?.map(|u| u.name))
}

pub async fn send_invite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<InviteInput>,
) -> Result<HttpResponse, ApiError> {
    let InviteInput {
        trip_id,
        invited_user_email,
    } = body.into_inner();

    let trip = state
        .trips
        .find_by_id(&trip_id)
        .await?
        .filter(|trip| trip.user_id.as_deref() == Some(user.user_id.as_str()))
        .ok_or_else(|| {
            ApiError::NotFound("Trip not found or you are not the trip owner".to_string())
        })?;

    let invitee = state
        .users
        .find_by_email(invited_user_email.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if invitee.id == user.user_id {
        return Err(ApiError::BadRequest(
            "You cannot invite yourself".to_string(),
        ));
    }

    if state
        .invitations
        .find_pending(&trip_id, &user.user_id, &invitee.id)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Invite already sent".to_string()));
    }

    let invite = state
        .invitations
        .insert(Invitation::pending(
            trip_id,
            user.user_id.clone(),
            invitee.id,
            Utc::now(),
        ))
        .await?;

    info!("User {} invited {} to trip to {}", user.user_id, invitee.email, trip.destination);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Invite sent successfully",
        "invite": invite,
    })))
}

pub async fn pending_invites(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let invites = state
        .invitations
        .list_for_invitee(&user.user_id, InviteStatus::Pending)
        .await?;

    let mut pending = Vec::with_capacity(invites.len());
    for invite in invites {
        let trip = state
            .trips
            .find_by_id(&invite.trip_id)
            .await?
            .map(|plan| TripSummary {
                id: invite.trip_id.clone(),
                destination: plan.destination,
                date: plan.date,
            });
        let inviter_name = inviter_name(&state, &invite.inviter_id).await?;
        pending.push(PendingInvite {
            invite,
            trip,
            inviter_name,
        });
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true, "invites": pending })))
}

pub async fn respond_to_invite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<InviteResponseInput>,
) -> Result<HttpResponse, ApiError> {
    let status = match body.status.trim() {
        "accepted" => InviteStatus::Accepted,
        "rejected" => InviteStatus::Rejected,
        other => {
            return Err(ApiError::BadRequest(format!(
                "status must be 'accepted' or 'rejected', got '{}'",
                other
            )))
        }
    };

    let invite = state
        .invitations
        .respond(&path.into_inner(), &user.user_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    if status == InviteStatus::Accepted {
        state
            .trips
            .add_invited_user(&invite.trip_id, &user.user_id)
            .await?;
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true, "invite": invite })))
}

pub async fn invited_trips(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let accepted = state
        .invitations
        .list_for_invitee(&user.user_id, InviteStatus::Accepted)
        .await?;

    let mut trips = Vec::with_capacity(accepted.len());
    for invite in accepted {
        // The trip may have expired or been deleted since the invite was accepted.
        let Some(plan) = state.trips.find_by_id(&invite.trip_id).await? else {
            continue;
        };
        trips.push(InvitedTrip {
            id: invite.trip_id.clone(),
            destination: plan.destination,
            date: plan.date,
            inviter_name: inviter_name(&state, &invite.inviter_id)
                .await?
                .unwrap_or_default(),
            itinerary: plan.itinerary,
        });
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true, "invitedTrips": trips })))
}
