//! Persistence implementations
//!
//! File-backed and in-memory implementations of [`MeetRepository`].
//!
//! [`MeetRepository`]: liftmeet_domain::MeetRepository

mod file_meet_repo;
mod memory_meet_repo;

pub use file_meet_repo::FileMeetRepository;
pub use memory_meet_repo::InMemoryMeetRepository;
