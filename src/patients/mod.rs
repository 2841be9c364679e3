// Patient service: registration, login, patient CRUD and the schedules
// endpoint that triggers the cross-service event broadcast.

pub mod handlers;
pub mod models;
pub mod repository;

pub use handlers::{router, PatientState};
pub use models::{Patient, PatientResponse, SchedulingRequest};
pub use repository::PatientRepository;
