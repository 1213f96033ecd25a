//! Repository trait definitions for data persistence

use liftmeet_types::Error;

use crate::model::MeetSnapshot;

/// Persistence service for the whole meet state.
///
/// The snapshot is read once and overwritten wholesale on every change.
pub trait MeetRepository {
    /// Load the stored snapshot, or an empty one if nothing was saved yet
    fn load(&self) -> Result<MeetSnapshot, Error>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &MeetSnapshot) -> Result<(), Error>;
}
