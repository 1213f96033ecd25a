//! Use cases over an injected [`MeetRepository`](liftmeet_domain::MeetRepository)

mod meet_service;

pub use meet_service::{ImportSummary, MeetService, ResultsReport};
