pub mod error;

pub use error::*;

use crate::database::Database;
use crate::events::EventBus;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub event_bus: EventBus,
}
