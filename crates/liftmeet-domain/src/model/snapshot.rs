//! Whole-meet state as persisted by a [`crate::MeetRepository`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Athlete, AthleteId, AttemptSet, Competition};

/// Everything the meet desk tracks, saved and loaded as one unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetSnapshot {
    #[serde(default)]
    pub competitions: Vec<Competition>,

    #[serde(default)]
    pub athletes: Vec<Athlete>,

    /// Attempt sets keyed by athlete id
    #[serde(default)]
    pub attempts: BTreeMap<AthleteId, AttemptSet>,

    /// Session names registered per competition name
    #[serde(default)]
    pub sessions: BTreeMap<String, Vec<String>>,
}

impl MeetSnapshot {
    pub fn next_athlete_id(&self) -> AthleteId {
        self.athletes.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    pub fn next_competition_id(&self) -> u64 {
        self.competitions.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    pub fn competition(&self, id: u64) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    pub fn athlete(&self, id: AthleteId) -> Option<&Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    pub fn athlete_mut(&mut self, id: AthleteId) -> Option<&mut Athlete> {
        self.athletes.iter_mut().find(|a| a.id == id)
    }

    /// Create a seeded attempt set for every athlete that has none yet.
    ///
    /// Returns the number of sets created.
    pub fn ensure_attempts(&mut self) -> usize {
        let mut created = 0;
        for athlete in &self.athletes {
            if !self.attempts.contains_key(&athlete.id) {
                self.attempts
                    .insert(athlete.id, AttemptSet::seeded(athlete.attempt1.as_deref()));
                created += 1;
            }
        }
        created
    }

    /// Reset every athlete to a set seeded from their declared opener and
    /// forget the registered sessions
    pub fn clear_attempts(&mut self) {
        self.attempts = self
            .athletes
            .iter()
            .map(|a| (a.id, AttemptSet::seeded(a.attempt1.as_deref())))
            .collect();
        self.sessions.clear();
    }

    /// Remove an athlete together with their attempt set
    pub fn remove_athlete(&mut self, id: AthleteId) -> Option<Athlete> {
        let pos = self.athletes.iter().position(|a| a.id == id)?;
        self.attempts.remove(&id);
        Some(self.athletes.remove(pos))
    }

    /// Swap in an edited competition.
    ///
    /// Athletes entered under the old tuple follow the new one, and the
    /// session registry moves with a renamed competition. Returns the
    /// previous record.
    pub fn replace_competition(&mut self, updated: Competition) -> Option<Competition> {
        let pos = self.competitions.iter().position(|c| c.id == updated.id)?;
        let old_ref = self.competitions[pos].reference();
        let new_ref = updated.reference();

        for athlete in &mut self.athletes {
            if athlete.belongs_to(&old_ref) {
                athlete.competition = Some(new_ref.clone());
            }
        }
        if old_ref.name != new_ref.name {
            if let Some(sessions) = self.sessions.remove(&old_ref.name) {
                for session in sessions {
                    self.add_session(&new_ref.name, &session);
                }
            }
        }
        Some(std::mem::replace(&mut self.competitions[pos], updated))
    }

    /// Remove a competition and its session registry. Athletes keep their
    /// competition tuple.
    pub fn remove_competition(&mut self, id: u64) -> Option<Competition> {
        let pos = self.competitions.iter().position(|c| c.id == id)?;
        let removed = self.competitions.remove(pos);
        if !self.competitions.iter().any(|c| c.name == removed.name) {
            self.sessions.remove(&removed.name);
        }
        Some(removed)
    }

    /// Register a session name under a competition; false if already present
    pub fn add_session(&mut self, competition_name: &str, session: &str) -> bool {
        let sessions = self.sessions.entry(competition_name.to_string()).or_default();
        if sessions.iter().any(|s| s == session) {
            return false;
        }
        sessions.push(session.to_string());
        true
    }

    pub fn sessions_for(&self, competition_name: &str) -> &[String] {
        self.sessions
            .get(competition_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
