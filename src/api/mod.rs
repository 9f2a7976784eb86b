pub mod middleware;

pub mod clients;
pub mod router;
pub mod technicians;
pub mod tickets;

pub use middleware::*;
