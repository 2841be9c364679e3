// Event publisher
//
// Publishing is fire-and-forget relative to the triggering HTTP request:
// success means the broker accepted the message, not that any consumer has
// processed it. No ordering is guaranteed between the HTTP response and
// consumer side effects.

use lapin::{options::BasicPublishOptions, BasicProperties, Channel};
use tracing::{debug, warn};

use crate::events::{EventError, ScheduleEvent, SCHEDULES_CREATED_EXCHANGE};

/// Persistent delivery mode per AMQP 0.9.1 (survives broker restarts
/// together with the durable queues)
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Publishes schedule-created events to the fanout exchange
#[derive(Clone)]
pub struct SchedulePublisher {
    channel: Channel,
}

impl SchedulePublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Serialize the event and hand it to the broker.
    ///
    /// The routing key is empty: a fanout exchange routes by membership,
    /// not key. Failure here never rolls back the caller's already
    /// committed local write; the caller decides how loudly to surface it.
    pub async fn publish(&self, event: &ScheduleEvent) -> Result<(), EventError> {
        let payload = serde_json::to_vec(event)?;

        let confirm = self
            .channel
            .basic_publish(
                SCHEDULES_CREATED_EXCHANGE,
                "",
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(DELIVERY_MODE_PERSISTENT),
            )
            .await
            .map_err(|e| {
                warn!("Broker rejected publish handoff: {}", e);
                EventError::Broker(e)
            })?;

        // Without publisher confirms enabled this resolves immediately once
        // the frame is on the wire
        confirm.await.map_err(EventError::Broker)?;

        debug!(
            "Published schedule event for {} to {}",
            event.email, SCHEDULES_CREATED_EXCHANGE
        );
        Ok(())
    }
}
