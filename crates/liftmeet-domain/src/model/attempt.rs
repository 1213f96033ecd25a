//! Lift attempts and per-athlete aggregation

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use liftmeet_types::ValidationError;

/// Longest accepted attempt entry, in characters
const MAX_VALUE_LEN: usize = 5;
const MAX_VALUE: f64 = 99999.0;

/// Outcome tag of an attempt slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptStatus {
    /// Entered weight, not yet judged
    #[default]
    #[serde(rename = "number")]
    Number,
    /// Good lift
    #[serde(rename = "G")]
    Good,
    /// No lift
    #[serde(rename = "X")]
    NoLift,
    #[serde(rename = "DNS")]
    DidNotStart,
    #[serde(rename = "DNF")]
    DidNotFinish,
}

impl AttemptStatus {
    /// Only `number` and `G` contribute to best and total lift
    pub fn is_scoring(&self) -> bool {
        matches!(self, AttemptStatus::Number | AttemptStatus::Good)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AttemptStatus::Number => "number",
            AttemptStatus::Good => "G",
            AttemptStatus::NoLift => "X",
            AttemptStatus::DidNotStart => "DNS",
            AttemptStatus::DidNotFinish => "DNF",
        }
    }
}

impl FromStr for AttemptStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NUMBER" | "N" => Ok(AttemptStatus::Number),
            "G" | "GOOD" => Ok(AttemptStatus::Good),
            "X" => Ok(AttemptStatus::NoLift),
            "DNS" => Ok(AttemptStatus::DidNotStart),
            "DNF" => Ok(AttemptStatus::DidNotFinish),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// One of the four attempt slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptSlot {
    First,
    Second,
    Third,
    /// Auxiliary slot; counts toward best lift, never toward total
    Pl,
}

impl AttemptSlot {
    pub const ALL: [AttemptSlot; 4] = [
        AttemptSlot::First,
        AttemptSlot::Second,
        AttemptSlot::Third,
        AttemptSlot::Pl,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AttemptSlot::First => "attempt1",
            AttemptSlot::Second => "attempt2",
            AttemptSlot::Third => "attempt3",
            AttemptSlot::Pl => "pl",
        }
    }

    pub fn is_numbered(&self) -> bool {
        !matches!(self, AttemptSlot::Pl)
    }
}

impl FromStr for AttemptSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "attempt1" => Ok(AttemptSlot::First),
            "2" | "attempt2" => Ok(AttemptSlot::Second),
            "3" | "attempt3" => Ok(AttemptSlot::Third),
            "pl" | "4" => Ok(AttemptSlot::Pl),
            _ => Err(ValidationError::UnknownSlot(s.to_string())),
        }
    }
}

/// A single attempt slot: entered value plus status tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub status: AttemptStatus,
}

impl Attempt {
    pub const EMPTY: Attempt = Attempt {
        value: String::new(),
        status: AttemptStatus::Number,
    };

    /// Numeric value if the slot scores and holds a positive number
    pub fn scoring_value(&self) -> Option<f64> {
        if !self.status.is_scoring() {
            return None;
        }
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    /// Text shown for the slot; DNS/DNF hide whatever value was stored
    pub fn display(&self) -> String {
        match self.status {
            AttemptStatus::Number | AttemptStatus::Good => self.value.clone(),
            AttemptStatus::NoLift if self.value.is_empty() => "-".to_string(),
            AttemptStatus::NoLift => self.value.clone(),
            AttemptStatus::DidNotStart | AttemptStatus::DidNotFinish => {
                self.status.tag().to_string()
            }
        }
    }
}

/// Best and total lift of one athlete
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LiftSummary {
    pub best_lift: f64,
    pub total_lift: f64,
}

/// The four attempt slots of one athlete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptSet {
    #[serde(default)]
    pub attempt1: Attempt,
    #[serde(default)]
    pub attempt2: Attempt,
    #[serde(default)]
    pub attempt3: Attempt,
    #[serde(default)]
    pub pl: Attempt,
}

impl AttemptSet {
    /// Empty set with slot 1 seeded from the declared opener
    pub fn seeded(opener: Option<&str>) -> Self {
        Self {
            attempt1: Attempt {
                value: opener.unwrap_or_default().to_string(),
                status: AttemptStatus::Number,
            },
            ..Default::default()
        }
    }

    pub fn get(&self, slot: AttemptSlot) -> &Attempt {
        match slot {
            AttemptSlot::First => &self.attempt1,
            AttemptSlot::Second => &self.attempt2,
            AttemptSlot::Third => &self.attempt3,
            AttemptSlot::Pl => &self.pl,
        }
    }

    fn get_mut(&mut self, slot: AttemptSlot) -> &mut Attempt {
        match slot {
            AttemptSlot::First => &mut self.attempt1,
            AttemptSlot::Second => &mut self.attempt2,
            AttemptSlot::Third => &mut self.attempt3,
            AttemptSlot::Pl => &mut self.pl,
        }
    }

    /// Maximum scoring value over all four slots, 0 if none
    pub fn best_lift(&self) -> f64 {
        AttemptSlot::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).scoring_value())
            .fold(0.0, f64::max)
    }

    /// Sum of scoring values over the three numbered slots
    pub fn total_lift(&self) -> f64 {
        AttemptSlot::ALL
            .iter()
            .filter(|slot| slot.is_numbered())
            .filter_map(|slot| self.get(*slot).scoring_value())
            .sum()
    }

    pub fn summary(&self) -> LiftSummary {
        LiftSummary {
            best_lift: self.best_lift(),
            total_lift: self.total_lift(),
        }
    }

    /// Update one slot.
    ///
    /// A scoring status stores `value`; a non-scoring status keeps the
    /// previously stored value and only changes the tag.
    pub fn record(
        &mut self,
        slot: AttemptSlot,
        value: &str,
        status: AttemptStatus,
    ) -> Result<(), ValidationError> {
        let value = value.trim();
        if status.is_scoring() && !value.is_empty() {
            validate_value(value)?;
        }
        let attempt = self.get_mut(slot);
        if status.is_scoring() {
            attempt.value = value.to_string();
        }
        attempt.status = status;
        Ok(())
    }

    /// Slots ordered lightest first: scoring slots by value, then
    /// non-scoring slots. Scoring slots without a value are left out.
    pub fn ordered_by_weight(&self) -> Vec<(AttemptSlot, &Attempt)> {
        let mut scored: Vec<(AttemptSlot, &Attempt, f64)> = Vec::new();
        let mut unscored: Vec<(AttemptSlot, &Attempt)> = Vec::new();
        for slot in AttemptSlot::ALL {
            let attempt = self.get(slot);
            if let Some(v) = attempt.scoring_value() {
                scored.push((slot, attempt, v));
            } else if !attempt.status.is_scoring() {
                unscored.push((slot, attempt));
            }
        }
        scored.sort_by(|a, b| a.2.total_cmp(&b.2));
        scored
            .into_iter()
            .map(|(slot, attempt, _)| (slot, attempt))
            .chain(unscored)
            .collect()
    }
}

fn validate_value(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_VALUE_LEN {
        return Err(ValidationError::AttemptValue(value.to_string()));
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v <= MAX_VALUE => Ok(()),
        _ => Err(ValidationError::AttemptValue(value.to_string())),
    }
}
