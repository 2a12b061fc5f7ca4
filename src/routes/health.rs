use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: &str) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.to_string()),
        }
    }

    fn error(details: String) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details),
        }
    }
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let store = match state.trips.ping().await {
        Ok(()) => ServiceStatus::ok("Connected successfully to MongoDB"),
        Err(e) => {
            error!("MongoDB health check failed: {}", e);
            ServiceStatus::error(format!("Failed to connect: {}", e))
        }
    };
    let generation = if state.generation_configured {
        ServiceStatus::ok("Generation API key configured")
    } else {
        ServiceStatus::error("GEMINI_API_KEY not configured".to_string())
    };
    let email = match state.mailer {
        Some(_) => ServiceStatus::ok("Mail provider configured"),
        None => ServiceStatus::error("SENDGRID_API_KEY not configured".to_string()),
    };

    if [&store, &generation, &email].iter().any(|s| s.status != "ok") {
        health.status = "degraded".to_string();
    }
    health.services.insert("mongodb".to_string(), store);
    health.services.insert("generation".to_string(), generation);
    health.services.insert("email".to_string(), email);

    HttpResponse::Ok().json(health)
}
