pub mod email;
pub mod feedback;
pub mod health;
pub mod invitation;
pub mod trip;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use log::debug;

use crate::{error::ApiError, middleware::auth::AuthMiddleware};

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected JSON body for {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Mounts every API route under `prefix`; the `/trip` scope requires a token.
pub fn configure(cfg: &mut web::ServiceConfig, prefix: &str, jwt_secret: &str) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope(prefix)
                .app_data(json_config())
                .route("/createtrip", web::post().to(trip::create_trip))
                .route("/trips/{trip_id}", web::get().to(trip::get_trip_by_id))
                .route("/feedback", web::post().to(feedback::submit_feedback))
                .route("/feedback", web::get().to(feedback::list_feedback))
                .route("/sendTripEmail", web::post().to(email::send_trip_email))
                .service(
                    web::scope("/trip")
                        .wrap(AuthMiddleware::new(jwt_secret))
                        .route("/my", web::get().to(trip::get_my_trip))
                        .route("/my", web::delete().to(trip::delete_my_trip))
                        .route("/invite", web::post().to(invitation::send_invite))
                        .route("/invites", web::get().to(invitation::pending_invites))
                        .route(
                            "/invite/{invite_id}",
                            web::put().to(invitation::respond_to_invite),
                        )
                        .route("/invited", web::get().to(invitation::invited_trips)),
                ),
        );
}
