// Doctor service: registration, login, doctor lookup, and an observe-only
// consumer of the schedule-created broadcast.

pub mod handlers;
pub mod listener;
pub mod models;
pub mod repository;

pub use handlers::{router, DoctorState};
pub use models::{Doctor, DoctorResponse};
pub use repository::DoctorRepository;
