//! Bodyweight category and age group assignment
//!
//! Both are derived data: categories from bodyweight and gender through a
//! fixed ascending threshold table, age groups from date of birth at a
//! reference date.

use chrono::{Datelike, NaiveDate};

use crate::model::Gender;

/// Male bodyweight categories, ascending
pub const MALE_CATEGORIES: [&str; 10] = [
    "49kg", "54kg", "59kg", "65kg", "72kg", "80kg", "88kg", "97kg", "107kg", "+107kg",
];

/// Female bodyweight categories, ascending
pub const FEMALE_CATEGORIES: [&str; 10] = [
    "41kg", "45kg", "50kg", "55kg", "61kg", "67kg", "73kg", "79kg", "86kg", "+86kg",
];

/// Age groups are computed as of this date unless configured otherwise
pub const DEFAULT_REFERENCE_DATE: &str = "2025-12-31";

pub fn categories_for(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => &MALE_CATEGORIES,
        Gender::Female => &FEMALE_CATEGORIES,
    }
}

fn category_limit(label: &str) -> Option<f64> {
    label
        .trim_start_matches('+')
        .trim_end_matches("kg")
        .parse()
        .ok()
}

/// Find the bodyweight category for a weight in kg
///
/// # Returns
/// The first category whose limit is >= `body_weight`, the open `+` class
/// above the last limit, or `None` for a non-positive weight.
pub fn weight_category(body_weight: f64, gender: Gender) -> Option<&'static str> {
    if !body_weight.is_finite() || body_weight <= 0.0 {
        return None;
    }
    for &label in categories_for(gender) {
        if label.starts_with('+') {
            return Some(label);
        }
        if category_limit(label).is_some_and(|limit| body_weight <= limit) {
            return Some(label);
        }
    }
    None
}

/// Position in the presentation order: female table, then male table.
/// Unrecognized categories sort last.
pub fn category_order(category: Option<&str>) -> usize {
    category
        .and_then(|c| {
            FEMALE_CATEGORIES
                .iter()
                .chain(MALE_CATEGORIES.iter())
                .position(|known| *known == c)
        })
        .unwrap_or(usize::MAX)
}

/// Numeric sort key for roster listings: the limit, with `+` classes just
/// after their base limit and missing categories at the end
pub fn category_value(category: Option<&str>) -> f64 {
    match category {
        Some(c) => match category_limit(c) {
            Some(limit) if c.starts_with('+') => limit + 1000.0,
            Some(limit) => limit,
            None => 1e6,
        },
        None => 1e6,
    }
}

/// Competitive age bracket. An athlete can sit in several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    /// 14-17
    Rookie,
    /// 18-20
    NextGen,
    /// 15 and over
    Elite,
    /// 45 and over
    Legend,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Rookie,
        AgeGroup::NextGen,
        AgeGroup::Elite,
        AgeGroup::Legend,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Rookie => "Rookie",
            AgeGroup::NextGen => "Next Gen",
            AgeGroup::Elite => "Elite",
            AgeGroup::Legend => "Legend",
        }
    }

    /// Short form stored on athlete records
    pub fn initials(&self) -> &'static str {
        match self {
            AgeGroup::Rookie => "R",
            AgeGroup::NextGen => "NG",
            AgeGroup::Elite => "E",
            AgeGroup::Legend => "L",
        }
    }

    /// Accepts initials or the full label, case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|g| {
            g.initials().eq_ignore_ascii_case(token)
                || g.label().eq_ignore_ascii_case(token)
                || g.label().replace(' ', "").eq_ignore_ascii_case(token)
        })
    }

    fn contains(&self, age: i32) -> bool {
        match self {
            AgeGroup::Rookie => (14..=17).contains(&age),
            AgeGroup::NextGen => (18..=20).contains(&age),
            AgeGroup::Elite => age >= 15,
            AgeGroup::Legend => age >= 45,
        }
    }
}

/// Display label for an age group token; unknown tokens pass through
pub fn age_group_label(token: &str) -> &str {
    AgeGroup::from_token(token).map(|g| g.label()).unwrap_or(token)
}

pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default()
}

/// Age in whole years on `reference`
pub fn age_on(dob: NaiveDate, reference: NaiveDate) -> i32 {
    let before_birthday = (reference.month(), reference.day()) < (dob.month(), dob.day());
    reference.year() - dob.year() - i32::from(before_birthday)
}

pub fn age_groups_for(dob: NaiveDate, reference: NaiveDate) -> Vec<AgeGroup> {
    let age = age_on(dob, reference);
    AgeGroup::ALL
        .into_iter()
        .filter(|g| g.contains(age))
        .collect()
}

pub fn join_initials(groups: &[AgeGroup]) -> String {
    groups
        .iter()
        .map(AgeGroup::initials)
        .collect::<Vec<_>>()
        .join(" ")
}
