// Patient scheduling backend
// Three services (patient, doctor, schedules) built from one shared library:
// stateless JWT authentication, REST handlers, and RabbitMQ fanout event
// distribution for schedule-created notifications.

pub mod auth;
pub mod config;
pub mod db;
pub mod doctors;
pub mod error;
pub mod events;
pub mod patients;
pub mod schedules;

#[cfg(test)]
mod tests;
