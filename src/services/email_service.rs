use async_trait::async_trait;
use log::info;
use serde::Serialize;

use super::ServiceError;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError>;
}

#[derive(Debug, Serialize)]
struct SendGridEmail {
    email: String,
}

#[derive(Debug, Serialize)]
struct SendGridPersonalization {
    to: Vec<SendGridEmail>,
}

#[derive(Debug, Serialize)]
struct SendGridContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct SendGridRequest {
    personalizations: Vec<SendGridPersonalization>,
    from: SendGridEmail,
    subject: String,
    content: Vec<SendGridContent>,
}

pub struct SendGridMailer {
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(api_key: &str, from: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            from: from.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError> {
        let request = SendGridRequest {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridEmail {
                    email: to.to_string(),
                }],
            }],
            from: SendGridEmail {
                email: self.from.clone(),
            },
            subject: subject.to_string(),
            content: vec![SendGridContent {
                content_type: "text/html".to_string(),
                value: html.to_string(),
            }],
        };

        let response = self
            .client
            .post(SENDGRID_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Sent '{}' to {}", subject, to);
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
