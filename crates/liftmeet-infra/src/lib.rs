//! Infrastructure layer for liftmeet
//!
//! Persistence implementations of the domain repository trait and the CSV
//! roster importer.

pub mod persistence;
pub mod roster_import;

pub use persistence::{FileMeetRepository, InMemoryMeetRepository};
pub use roster_import::{load_roster, parse_roster, ParsedRoster, RosterImportError};
