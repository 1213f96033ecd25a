//! Domain layer for liftmeet
//!
//! Athlete, attempt and competition models, the pure results services
//! (classification, ranking, standings) and the persistence trait the
//! application layer is handed.

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::MeetRepository;
