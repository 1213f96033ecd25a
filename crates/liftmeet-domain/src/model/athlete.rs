//! Athlete record

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use liftmeet_types::ValidationError;

use crate::model::CompetitionRef;
use crate::service::classification::{age_groups_for, join_initials, weight_category};

pub type AthleteId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "men" => Ok(Gender::Male),
            "female" | "f" | "women" => Ok(Gender::Female),
            _ => Err(ValidationError::UnknownGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Athlete entered in a meet.
///
/// `category` and `age_group` are derived from bodyweight, gender and date
/// of birth; only [`Athlete::register`] and the `update_*` methods write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: AthleteId,
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Bodyweight category label (e.g. "72kg", "+86kg")
    #[serde(default)]
    category: Option<String>,
    /// Space-joined age group initials (e.g. "NG E")
    #[serde(default)]
    age_group: Option<String>,
    pub dob: NaiveDate,
    pub team: String,
    #[serde(default)]
    body_weight: Option<f64>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub lot_number: Option<u32>,
    /// Declared opening attempt
    #[serde(default)]
    pub attempt1: Option<String>,
    #[serde(default)]
    pub competition: Option<CompetitionRef>,
}

/// Fields to change on an existing athlete. `None` leaves a field as is;
/// a blank session, rack or opener clears it.
#[derive(Debug, Clone, Default)]
pub struct AthleteChanges {
    pub name: Option<String>,
    pub team: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub body_weight: Option<f64>,
    pub session: Option<String>,
    pub rack: Option<String>,
    pub attempt1: Option<String>,
}

impl AthleteChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.team.is_none()
            && self.gender.is_none()
            && self.dob.is_none()
            && self.body_weight.is_none()
            && self.session.is_none()
            && self.rack.is_none()
            && self.attempt1.is_none()
    }
}

/// Input for registering an athlete
#[derive(Debug, Clone, Default)]
pub struct NewAthlete {
    pub name: String,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub team: String,
    pub body_weight: Option<f64>,
    pub session: Option<String>,
    pub rack: Option<String>,
    pub lot_number: Option<u32>,
    pub attempt1: Option<String>,
    pub competition: Option<CompetitionRef>,
}

impl Athlete {
    /// Validate the required fields and derive category and age groups.
    ///
    /// A date of birth that yields no age group at `reference_date` is
    /// rejected, same as a missing one.
    pub fn register(
        id: AthleteId,
        input: NewAthlete,
        reference_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let team = input.team.trim().to_string();
        if team.is_empty() {
            return Err(ValidationError::MissingField("team"));
        }
        let dob = input.dob.ok_or(ValidationError::MissingField("date of birth"))?;

        let groups = age_groups_for(dob, reference_date);
        if groups.is_empty() {
            return Err(ValidationError::InvalidDateOfBirth(dob.to_string()));
        }

        let mut athlete = Self {
            id,
            name,
            gender: input.gender,
            category: None,
            age_group: Some(join_initials(&groups)),
            dob,
            team,
            body_weight: None,
            session: non_blank(input.session),
            rack: non_blank(input.rack),
            lot_number: input.lot_number,
            attempt1: non_blank(input.attempt1),
            competition: input.competition,
        };
        athlete.update_body_weight(input.body_weight)?;
        Ok(athlete)
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Raw age group string as stored
    pub fn age_group(&self) -> Option<&str> {
        self.age_group.as_deref()
    }

    /// Age group tokens, split on whitespace
    pub fn age_group_labels(&self) -> Vec<&str> {
        self.age_group
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn body_weight(&self) -> Option<f64> {
        self.body_weight
    }

    /// Record a (re)weighed bodyweight and re-derive the category.
    ///
    /// `None` clears the bodyweight. A weight that is not a positive finite
    /// number is rejected and leaves the athlete unchanged.
    pub fn update_body_weight(
        &mut self,
        body_weight: Option<f64>,
    ) -> Result<(), ValidationError> {
        if let Some(w) = body_weight {
            if !w.is_finite() || w <= 0.0 {
                return Err(ValidationError::InvalidBodyWeight(w));
            }
        }
        self.body_weight = body_weight;
        self.derive_category();
        Ok(())
    }

    pub fn update_gender(&mut self, gender: Option<Gender>) {
        self.gender = gender;
        self.derive_category();
    }

    fn derive_category(&mut self) {
        self.category = match (self.body_weight, self.gender) {
            (Some(w), Some(g)) => weight_category(w, g).map(String::from),
            _ => None,
        };
    }

    /// Change the date of birth; rejected if it yields no age group
    pub fn update_dob(
        &mut self,
        dob: NaiveDate,
        reference_date: NaiveDate,
    ) -> Result<(), ValidationError> {
        let groups = age_groups_for(dob, reference_date);
        if groups.is_empty() {
            return Err(ValidationError::InvalidDateOfBirth(dob.to_string()));
        }
        self.dob = dob;
        self.age_group = Some(join_initials(&groups));
        Ok(())
    }

    /// Apply an edit, re-deriving category and age groups.
    ///
    /// Either every change is applied or, on error, none is.
    pub fn apply_changes(
        &mut self,
        changes: AthleteChanges,
        reference_date: NaiveDate,
    ) -> Result<(), ValidationError> {
        let mut edited = self.clone();
        if let Some(name) = changes.name {
            edited.name = non_blank(Some(name)).ok_or(ValidationError::MissingField("name"))?;
        }
        if let Some(team) = changes.team {
            edited.team = non_blank(Some(team)).ok_or(ValidationError::MissingField("team"))?;
        }
        if let Some(dob) = changes.dob {
            edited.update_dob(dob, reference_date)?;
        }
        if changes.gender.is_some() {
            edited.update_gender(changes.gender);
        }
        if changes.body_weight.is_some() {
            edited.update_body_weight(changes.body_weight)?;
        }
        if let Some(session) = changes.session {
            edited.session = non_blank(Some(session));
        }
        if let Some(rack) = changes.rack {
            edited.rack = non_blank(Some(rack));
        }
        if let Some(opener) = changes.attempt1 {
            edited.attempt1 = non_blank(Some(opener));
        }
        *self = edited;
        Ok(())
    }

    /// Overwrite the stored age group string, bypassing derivation
    #[cfg(test)]
    pub(crate) fn with_age_group(mut self, age_group: &str) -> Self {
        self.age_group = non_blank(Some(age_group.to_string()));
        self
    }

    pub fn belongs_to(&self, competition: &CompetitionRef) -> bool {
        self.competition.as_ref() == Some(competition)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
