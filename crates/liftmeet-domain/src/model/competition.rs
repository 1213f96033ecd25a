use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use liftmeet_types::ValidationError;

/// Registered competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: u64,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    /// Competition type (e.g. "Nationals", "Open")
    #[serde(rename = "type")]
    pub kind: String,
}

/// Input for registering a competition
#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub kind: String,
}

/// The name/date/location/type tuple that scopes an athlete to one competition.
///
/// Matching is exact on all four fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRef {
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Competition {
    pub fn register(id: u64, input: NewCompetition) -> Result<Self, ValidationError> {
        let name = required(input.name, "name")?;
        let location = required(input.location, "location")?;
        let kind = required(input.kind, "type")?;
        Ok(Self {
            id,
            name,
            date: input.date,
            location,
            kind,
        })
    }

    pub fn reference(&self) -> CompetitionRef {
        CompetitionRef {
            name: self.name.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            location: self.location.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl CompetitionRef {
    /// Build a tuple only when every field is present and non-blank
    pub fn from_parts(
        name: Option<&str>,
        date: Option<&str>,
        location: Option<&str>,
        kind: Option<&str>,
    ) -> Option<Self> {
        let pick = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        Some(Self {
            name: pick(name)?,
            date: pick(date)?,
            location: pick(location)?,
            kind: pick(kind)?,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
