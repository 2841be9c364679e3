// Cross-service event distribution
//
// A schedule creation in the patient service is broadcast through a fanout
// exchange to one durable queue per consumer service. Delivery is
// at-least-once: consumers must tolerate redelivered events, and nothing on
// the producer side records whether a message was ever consumed.

pub mod consumer;
pub mod publisher;
pub mod topology;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use consumer::{run_consumer, run_consumer_with_recovery};
pub use publisher::SchedulePublisher;
pub use topology::{
    declare_topology, DOCTOR_QUEUE, SCHEDULES_CREATED_EXCHANGE, SCHEDULES_QUEUE,
};

/// The event published once per successful patient schedule action.
///
/// Immutable value; the email doubles as a loose natural key for consumers.
/// Wire form is a JSON object with exactly these field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}

/// Errors raised by the event distribution layer
#[derive(Debug, Error)]
pub enum EventError {
    #[error("broker error: {0}")]
    Broker(#[from] lapin::Error),

    #[error("event serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("consumer side effect failed: {0}")]
    Processing(String),
}

/// Open a broker connection for a service process
pub async fn connect_broker(amqp_url: &str) -> Result<lapin::Connection, EventError> {
    let connection =
        lapin::Connection::connect(amqp_url, lapin::ConnectionProperties::default()).await?;
    tracing::info!("Connected to broker at {}", amqp_url);
    Ok(connection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_wire_form_uses_flat_field_names() {
        let event = ScheduleEvent {
            name: "Jane".to_string(),
            phone: "555-1111".to_string(),
            address: "1 Main St".to_string(),
            email: "jane@example.com".to_string(),
        };

        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "name": "Jane",
                "phone": "555-1111",
                "address": "1 Main St",
                "email": "jane@example.com",
            })
        );
    }

    #[test]
    fn event_decodes_from_foreign_producer_json() {
        // Field order and unknown producers must not matter
        let wire = r#"{"email":"jane@example.com","address":"1 Main St","name":"Jane","phone":"555-1111"}"#;
        let event: ScheduleEvent = serde_json::from_str(wire).unwrap();
        assert_eq!(event.name, "Jane");
        assert_eq!(event.email, "jane@example.com");
    }

    #[test]
    fn malformed_payload_is_a_serialization_error() {
        let result = serde_json::from_str::<ScheduleEvent>("{\"name\":42}");
        assert!(result.is_err());
    }
}
