// Doctor-side consumer of schedule-created events
//
// The doctor service only observes the broadcast: it logs each scheduled
// patient and applies no persistent side effect. Redelivery of the same
// event just logs it again, which is harmless.

use tracing::info;

use crate::events::{EventError, ScheduleEvent};

/// Side effect applied to every event delivered on the doctor queue
pub async fn on_patient_scheduled(event: ScheduleEvent) -> Result<(), EventError> {
    info!(
        "Patient scheduled: {} <{}>, phone {}, address {}",
        event.name, event.email, event.phone, event.address
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn observing_an_event_always_succeeds() {
        let event = ScheduleEvent {
            name: "Jane".to_string(),
            phone: "555-1111".to_string(),
            address: "1 Main St".to_string(),
            email: "jane@example.com".to_string(),
        };
        assert!(on_patient_scheduled(event.clone()).await.is_ok());
        // At-least-once: a redelivered event observes again without error
        assert!(on_patient_scheduled(event).await.is_ok());
    }
}
