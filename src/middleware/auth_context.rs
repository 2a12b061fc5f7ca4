use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::{error::ApiError, middleware::auth::Claims};

/// The caller identified by [`super::auth::AuthMiddleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) if !claims.user_id.is_empty() => ready(Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
            })),
            _ => ready(Err(ApiError::Unauthorized(
                "Unauthorized access. Please log in.".to_string(),
            ))),
        }
    }
}
