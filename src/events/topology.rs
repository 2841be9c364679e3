// Broker topology bootstrap
//
// Each service declares the shared fanout exchange, its own durable queue
// and the binding between them once per process lifetime, after the broker
// connection is established and before any consumer starts. All three
// declarations are idempotent: re-declaring on every restart is a no-op.

use lapin::{
    options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::FieldTable,
    Channel, ExchangeKind,
};
use tracing::info;

use crate::events::EventError;

/// Fanout exchange every schedule-created event is published to
pub const SCHEDULES_CREATED_EXCHANGE: &str = "schedules.v1.patients-schedules-created";

/// Durable queue consumed by the doctor service
pub const DOCTOR_QUEUE: &str = "schedules.v1.patients-schedules-created-queue-doctor";

/// Durable queue consumed by the schedules service
pub const SCHEDULES_QUEUE: &str = "schedules.v1.patients-schedules-created-queue-schedules";

/// Declare the fanout exchange, the given durable queue and its binding.
///
/// Fanout routing ignores the key, so the binding uses an empty one. A queue
/// declared here outlives its consumers: messages published while no
/// consumer is attached are retained until one connects.
pub async fn declare_topology(channel: &Channel, queue: &str) -> Result<(), EventError> {
    channel
        .exchange_declare(
            SCHEDULES_CREATED_EXCHANGE,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .queue_bind(
            queue,
            SCHEDULES_CREATED_EXCHANGE,
            "",
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    info!(
        "Declared broker topology: exchange {} bound to queue {}",
        SCHEDULES_CREATED_EXCHANGE, queue
    );
    Ok(())
}

/// Publisher-side bootstrap: only the exchange is needed, queues belong to
/// the consumer services that own them.
pub async fn declare_exchange(channel: &Channel) -> Result<(), EventError> {
    channel
        .exchange_declare(
            SCHEDULES_CREATED_EXCHANGE,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    info!("Declared broker exchange {}", SCHEDULES_CREATED_EXCHANGE);
    Ok(())
}
