// Schedules-side consumer of schedule-created events
//
// Maps each event onto the service's own schema and stores it. A database
// failure propagates so the delivery is nacked and redelivered; a duplicate
// delivery stores a duplicate row (at-least-once, no dedup).

use tracing::info;

use crate::events::{EventError, ScheduleEvent};
use crate::schedules::repository::ScheduleRepository;

/// Side effect applied to every event delivered on the schedules queue
pub async fn on_patient_scheduled(
    repo: &ScheduleRepository,
    event: ScheduleEvent,
) -> Result<(), EventError> {
    let schedule = repo
        .insert_from_event(&event)
        .await
        .map_err(|e| EventError::Processing(e.to_string()))?;

    info!(
        "Patient scheduled: {} <{}> stored as schedule {}",
        schedule.name, schedule.email, schedule.id
    );
    Ok(())
}
