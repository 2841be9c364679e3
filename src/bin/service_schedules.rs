// Schedules service entry point
//
// Consumer side of the event distribution: declares its own durable queue
// bound to the fanout exchange, persists every schedule-created event into
// its local projection table, and serves the projections read-only.

use scheduling_api::config::AppConfig;
use scheduling_api::db;
use scheduling_api::events::{run_consumer_with_recovery, SCHEDULES_QUEUE};
use scheduling_api::schedules::{self, listener, ScheduleRepository, ScheduleState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env("SCHEDULES_SERVICE_PORT", 8083)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let repo = ScheduleRepository::new(pool);
    let app = schedules::router(ScheduleState { repo: repo.clone() });

    // The recovery loop owns the broker connection: it declares the
    // idempotent topology before each consumer attach and reconnects with
    // backoff when the connection drops, so an outage never leaves the
    // service serving HTTP without a consumer.
    let amqp_url = config.amqp_url.clone();
    tokio::spawn(async move {
        let handler = |event| {
            let repo = repo.clone();
            async move { listener::on_patient_scheduled(&repo, event).await }
        };
        run_consumer_with_recovery(&amqp_url, SCHEDULES_QUEUE, "service-schedules", handler).await;
    });

    let tcp = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Schedules service listening on {}", tcp.local_addr()?);
    axum::serve(tcp, app).await?;

    Ok(())
}
