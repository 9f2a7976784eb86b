pub mod person_service;
pub mod state_machine;
pub mod ticket_service;
pub mod validation;

pub use state_machine::*;
