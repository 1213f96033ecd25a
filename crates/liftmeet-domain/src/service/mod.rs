//! Domain services
//!
//! Pure functions over athletes and attempt sets: classification,
//! ranking, standings and roster ordering.

pub mod classification;
pub mod ranking;
pub mod roster;
pub mod standings;

pub use classification::{age_groups_for, weight_category, AgeGroup};
pub use ranking::{calculate_ranks, Metric, Rankable};
pub use roster::{assign_lot_numbers, sort_for_listing, weigh_in_list};
pub use standings::{
    compute_standings, flatten_standings, sort_for_display, AgeGroupStandings, SessionStandings,
    Standing, StandingsFilter,
};
