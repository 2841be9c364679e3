// Schedules service: consumes the schedule-created broadcast into its own
// projection table and serves it read-only.

pub mod handlers;
pub mod listener;
pub mod models;
pub mod repository;

pub use handlers::{router, ScheduleState};
pub use models::Schedule;
pub use repository::ScheduleRepository;
