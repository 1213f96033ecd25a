//! Domain model types

pub mod athlete;
pub mod attempt;
pub mod competition;
pub mod snapshot;

pub use athlete::{Athlete, AthleteChanges, AthleteId, Gender, NewAthlete};
pub use attempt::{Attempt, AttemptSet, AttemptSlot, AttemptStatus, LiftSummary};
pub use competition::{Competition, CompetitionRef, NewCompetition};
pub use snapshot::MeetSnapshot;
