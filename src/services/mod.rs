pub mod distance_service;
pub mod email_service;
pub mod email_template;
pub mod events_service;
pub mod generation_service;
pub mod geocoding_service;
pub mod prompt_service;
pub mod response_parser;
pub mod trip_generation_service;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure talking to an external HTTP collaborator.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Response(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

const BODY_PREVIEW: usize = 300;

/// Rejects non-2xx responses and decodes the body, keeping a short excerpt of
/// the payload in the error when it does not match `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: preview(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        ServiceError::Response(format!("{}. Response: {}", e, preview(&body)))
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW).collect()
}
