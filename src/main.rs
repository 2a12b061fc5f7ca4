use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use trip_planner_api::{
    config::AppConfig,
    db::{
        mongo::create_mongo_client, MongoFeedbackStore, MongoInvitationStore, MongoTripStore,
        MongoUserDirectory, TripStore,
    },
    routes,
    services::{
        email_service::{Mailer, SendGridMailer},
        events_service::{EventSource, OpenMeteoEvents, SerpApiEvents},
        generation_service::GeminiClient,
        geocoding_service::NominatimGeocoder,
        trip_generation_service::TripPlanner,
    },
    AppState,
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let client = create_mongo_client(&config.mongodb_uri)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;

    let trips = Arc::new(MongoTripStore::new(&client, &config.database));
    let invitations = Arc::new(MongoInvitationStore::new(&client, &config.database));
    if let Err(e) = trips.ensure_indexes().await {
        warn!("Could not ensure trip indexes: {}", e);
    }
    if let Err(e) = invitations.ensure_indexes().await {
        warn!("Could not ensure invitation indexes: {}", e);
    }

    let geocoder = NominatimGeocoder::new(
        &config.geocoding.provider_url,
        &config.geocoding.user_agent,
        config.lookup_timeout,
    )
    .map_err(|e| startup_error("Failed to build geocoder", e))?;
    let primary_events = SerpApiEvents::new(
        &config.events.serpapi_url,
        config.events.serpapi_key.clone(),
        config.lookup_timeout,
    )
    .map_err(|e| startup_error("Failed to build events client", e))?;
    let secondary_events = OpenMeteoEvents::new(&config.events.open_meteo_url, config.lookup_timeout)
        .map_err(|e| startup_error("Failed to build events client", e))?;
    let generator = GeminiClient::new(&config.generation)
        .map_err(|e| startup_error("Failed to build generation client", e))?;

    let event_sources: Vec<Arc<dyn EventSource>> =
        vec![Arc::new(primary_events), Arc::new(secondary_events)];
    let trip_store: Arc<dyn TripStore> = trips;
    let planner = TripPlanner::new(
        Arc::new(geocoder),
        event_sources,
        Arc::new(generator),
        trip_store.clone(),
        config.planner,
    );

    let mailer: Option<Arc<dyn Mailer>> = match &config.email.sendgrid_api_key {
        Some(key) => Some(Arc::new(SendGridMailer::new(key, &config.email.from))),
        None => {
            warn!("SENDGRID_API_KEY not set, trip emails are disabled");
            None
        }
    };

    let state = web::Data::new(AppState {
        planner: Arc::new(planner),
        trips: trip_store,
        feedback: Arc::new(MongoFeedbackStore::new(&client, &config.database)),
        invitations,
        users: Arc::new(MongoUserDirectory::new(&client, &config.database)),
        mailer,
        generation_configured: !config.generation.api_key.is_empty(),
    });

    let config = Arc::new(config);
    let bind = (config.host.clone(), config.port);
    info!("Starting HTTP server on {}:{}{}", bind.0, bind.1, config.api_prefix);

    HttpServer::new(move || {
        let config = config.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(move |cfg| routes::configure(cfg, &config.api_prefix, &config.jwt_secret))
    })
    .bind(bind)?
    .run()
    .await
}
