// Doctor service entry point
//
// Consumer side of the event distribution: declares its own durable queue
// bound to the fanout exchange, then observes schedule-created events on a
// dedicated task while serving the doctor REST surface.

use std::sync::Arc;

use scheduling_api::auth::TokenService;
use scheduling_api::config::AppConfig;
use scheduling_api::db;
use scheduling_api::doctors::{self, listener, DoctorRepository, DoctorState};
use scheduling_api::events::{run_consumer_with_recovery, DOCTOR_QUEUE};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env("DOCTOR_SERVICE_PORT", 8082)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let state = DoctorState {
        repo: DoctorRepository::new(pool),
        tokens: Arc::new(TokenService::new(config.token_secret.clone())),
    };
    let app = doctors::router(state);

    // The recovery loop owns the broker connection: it declares the
    // idempotent topology before each consumer attach and reconnects with
    // backoff when the connection drops, so an outage never leaves the
    // service serving HTTP without a consumer.
    let amqp_url = config.amqp_url.clone();
    tokio::spawn(async move {
        run_consumer_with_recovery(
            &amqp_url,
            DOCTOR_QUEUE,
            "service-doctor",
            listener::on_patient_scheduled,
        )
        .await;
    });

    let tcp = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Doctor service listening on {}", tcp.local_addr()?);
    axum::serve(tcp, app).await?;

    Ok(())
}
