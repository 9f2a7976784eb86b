pub mod person;
pub mod ticket;

pub use person::*;
pub use ticket::*;

/// Current UTC time as an RFC3339 string, the storage format for all timestamps.
pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap()
}
