// Patient service entry point
//
// Producer side of the event distribution: registration/login, patient
// CRUD, and the schedules endpoint that persists a record then broadcasts
// a ScheduleEvent to the fanout exchange.

use std::sync::Arc;

use scheduling_api::auth::TokenService;
use scheduling_api::config::AppConfig;
use scheduling_api::events::{self, topology, SchedulePublisher};
use scheduling_api::patients::{self, PatientRepository, PatientState};
use scheduling_api::db;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env("PATIENT_SERVICE_PORT", 8081)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let connection = events::connect_broker(&config.amqp_url).await?;
    let channel = connection.create_channel().await?;
    // Producer-side bootstrap: the exchange must exist before the first
    // publish; consumer queues belong to the services that own them
    topology::declare_exchange(&channel).await?;

    let state = PatientState {
        repo: PatientRepository::new(pool),
        tokens: Arc::new(TokenService::new(config.token_secret.clone())),
        publisher: SchedulePublisher::new(channel),
    };
    let app = patients::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Patient service listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
