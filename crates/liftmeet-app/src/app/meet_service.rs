//! Meet Service - use cases for running a meet desk
//!
//! Every mutating call loads the snapshot from the repository, applies one
//! change and saves the whole snapshot back before returning.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use liftmeet_domain::model::{
    Athlete, AthleteChanges, AthleteId, AttemptSet, AttemptSlot, AttemptStatus, Competition,
    Gender, MeetSnapshot, NewAthlete, NewCompetition,
};
use liftmeet_domain::repository::MeetRepository;
use liftmeet_domain::service::{
    assign_lot_numbers, compute_standings, flatten_standings, sort_for_display, sort_for_listing,
    weigh_in_list, SessionStandings, Standing, StandingsFilter,
};
use liftmeet_infra::ParsedRoster;
use liftmeet_types::{Error, Result, ValidationError};

/// Outcome of a roster import
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub imported: Vec<Athlete>,
    /// Rows dropped while parsing plus rows rejected at registration
    pub skipped: usize,
}

/// Snapshot of one competition, ready to be turned into standings.
///
/// Standings borrow from the report, so it must outlive them.
pub struct ResultsReport {
    pub competition: Competition,
    snapshot: MeetSnapshot,
}

impl ResultsReport {
    /// Session and age-group buckets, each sorted by best lift
    pub fn sessions(&self) -> Vec<SessionStandings<'_>> {
        compute_standings(
            &self.snapshot.athletes,
            &self.snapshot.attempts,
            &self.competition.reference(),
        )
    }

    /// Filtered standings in presentation order
    pub fn standings(&self, filter: &StandingsFilter) -> Vec<Standing<'_>> {
        let mut rows = flatten_standings(self.sessions(), filter);
        sort_for_display(&mut rows);
        rows
    }
}

pub struct MeetService<R> {
    repo: R,
    reference_date: NaiveDate,
}

impl<R: MeetRepository> MeetService<R> {
    pub fn new(repo: R, reference_date: NaiveDate) -> Self {
        Self {
            repo,
            reference_date,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn snapshot(&self) -> Result<MeetSnapshot> {
        self.repo.load()
    }

    fn competition_in(snapshot: &MeetSnapshot, id: u64) -> Result<Competition> {
        snapshot
            .competition(id)
            .cloned()
            .ok_or_else(|| Error::CompetitionNotFound(id.to_string()))
    }

    // ==========================================
    // Competitions and sessions
    // ==========================================

    pub fn add_competition(&self, input: NewCompetition) -> Result<Competition> {
        let mut snapshot = self.repo.load()?;
        let competition = Competition::register(snapshot.next_competition_id(), input)?;
        snapshot.competitions.push(competition.clone());
        self.repo.save(&snapshot)?;
        info!(id = competition.id, name = %competition.name, "competition added");
        Ok(competition)
    }

    pub fn competitions(&self) -> Result<Vec<Competition>> {
        Ok(self.repo.load()?.competitions)
    }

    /// Edit a competition; fields left `None` keep their value.
    ///
    /// Athletes entered in it follow the new name/date/location/type.
    pub fn update_competition(
        &self,
        id: u64,
        name: Option<String>,
        date: Option<NaiveDate>,
        location: Option<String>,
        kind: Option<String>,
    ) -> Result<Competition> {
        let mut snapshot = self.repo.load()?;
        let current = Self::competition_in(&snapshot, id)?;
        let updated = Competition::register(
            id,
            NewCompetition {
                name: name.unwrap_or(current.name),
                date: date.unwrap_or(current.date),
                location: location.unwrap_or(current.location),
                kind: kind.unwrap_or(current.kind),
            },
        )?;
        snapshot.replace_competition(updated.clone());
        self.repo.save(&snapshot)?;
        info!(id, name = %updated.name, "competition updated");
        Ok(updated)
    }

    pub fn delete_competition(&self, id: u64) -> Result<Competition> {
        let mut snapshot = self.repo.load()?;
        let removed = snapshot
            .remove_competition(id)
            .ok_or_else(|| Error::CompetitionNotFound(id.to_string()))?;
        self.repo.save(&snapshot)?;
        info!(id, name = %removed.name, "competition deleted");
        Ok(removed)
    }

    /// Enter every athlete in the competition. Returns the athlete count.
    pub fn apply_competition(&self, competition_id: u64) -> Result<usize> {
        let mut snapshot = self.repo.load()?;
        let reference = Self::competition_in(&snapshot, competition_id)?.reference();
        for athlete in &mut snapshot.athletes {
            athlete.competition = Some(reference.clone());
        }
        let count = snapshot.athletes.len();
        self.repo.save(&snapshot)?;
        info!(competition = %reference.name, athletes = count, "competition applied");
        Ok(count)
    }

    /// Register a session name; false if it already existed
    pub fn add_session(&self, competition_id: u64, session: &str) -> Result<bool> {
        let session = session.trim();
        if session.is_empty() {
            return Err(ValidationError::MissingField("session").into());
        }
        let mut snapshot = self.repo.load()?;
        let competition = Self::competition_in(&snapshot, competition_id)?;
        let added = snapshot.add_session(&competition.name, session);
        if added {
            self.repo.save(&snapshot)?;
            info!(competition = %competition.name, session, "session added");
        }
        Ok(added)
    }

    pub fn sessions(&self, competition_id: u64) -> Result<Vec<String>> {
        let snapshot = self.repo.load()?;
        let competition = Self::competition_in(&snapshot, competition_id)?;
        Ok(snapshot.sessions_for(&competition.name).to_vec())
    }

    // ==========================================
    // Athletes
    // ==========================================

    pub fn register_athlete(&self, input: NewAthlete) -> Result<Athlete> {
        let mut snapshot = self.repo.load()?;
        let athlete = Athlete::register(snapshot.next_athlete_id(), input, self.reference_date)?;
        register_session(&mut snapshot, &athlete);
        snapshot.athletes.push(athlete.clone());
        snapshot.ensure_attempts();
        self.repo.save(&snapshot)?;
        info!(id = athlete.id, name = %athlete.name, "athlete registered");
        Ok(athlete)
    }

    /// Register parsed roster rows in one save.
    ///
    /// Rows that fail registration are skipped with a warning; if none
    /// survive, nothing is saved and the import fails.
    pub fn import_roster(&self, roster: ParsedRoster) -> Result<ImportSummary> {
        let mut snapshot = self.repo.load()?;
        let mut imported = Vec::new();
        let mut skipped = roster.dropped;

        for row in roster.rows {
            let name = row.name.clone();
            match Athlete::register(snapshot.next_athlete_id(), row, self.reference_date) {
                Ok(athlete) => {
                    register_session(&mut snapshot, &athlete);
                    snapshot.athletes.push(athlete.clone());
                    imported.push(athlete);
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "roster row rejected");
                    skipped += 1;
                }
            }
        }

        if imported.is_empty() {
            return Err(ValidationError::EmptyRoster.into());
        }
        snapshot.ensure_attempts();
        self.repo.save(&snapshot)?;
        info!(imported = imported.len(), skipped, "roster imported");
        Ok(ImportSummary { imported, skipped })
    }

    /// All athletes in listing order
    pub fn list_athletes(&self) -> Result<Vec<Athlete>> {
        let snapshot = self.repo.load()?;
        let mut listed: Vec<&Athlete> = snapshot.athletes.iter().collect();
        sort_for_listing(&mut listed);
        Ok(listed.into_iter().cloned().collect())
    }

    /// Edit an athlete and re-derive category and age groups.
    ///
    /// A new session is registered under the athlete's competition.
    pub fn update_athlete(&self, id: AthleteId, changes: AthleteChanges) -> Result<Athlete> {
        let mut snapshot = self.repo.load()?;
        let athlete = snapshot.athlete_mut(id).ok_or(Error::AthleteNotFound(id))?;
        athlete.apply_changes(changes, self.reference_date)?;
        let athlete = athlete.clone();
        register_session(&mut snapshot, &athlete);
        self.repo.save(&snapshot)?;
        info!(id, name = %athlete.name, "athlete updated");
        Ok(athlete)
    }

    /// Remove an athlete and their attempts
    pub fn delete_athlete(&self, id: AthleteId) -> Result<Athlete> {
        let mut snapshot = self.repo.load()?;
        let removed = snapshot
            .remove_athlete(id)
            .ok_or(Error::AthleteNotFound(id))?;
        self.repo.save(&snapshot)?;
        info!(id, name = %removed.name, "athlete deleted");
        Ok(removed)
    }

    /// Record a bodyweight and re-derive the category
    pub fn weigh_athlete(&self, id: AthleteId, body_weight: f64) -> Result<Athlete> {
        let mut snapshot = self.repo.load()?;
        let athlete = snapshot.athlete_mut(id).ok_or(Error::AthleteNotFound(id))?;
        athlete.update_body_weight(Some(body_weight))?;
        let athlete = athlete.clone();
        self.repo.save(&snapshot)?;
        info!(
            id,
            body_weight,
            category = athlete.category().unwrap_or("-"),
            "athlete weighed"
        );
        Ok(athlete)
    }

    pub fn weigh_in(
        &self,
        competition_id: u64,
        gender: Option<Gender>,
        category: Option<&str>,
    ) -> Result<Vec<Athlete>> {
        let snapshot = self.repo.load()?;
        let reference = Self::competition_in(&snapshot, competition_id)?.reference();
        let mut listed = weigh_in_list(&snapshot.athletes, &reference, gender, category);
        sort_for_listing(&mut listed);
        Ok(listed.into_iter().cloned().collect())
    }

    /// Assign lot numbers per session; limited to one competition if given
    pub fn assign_lots(&self, competition_id: Option<u64>) -> Result<Vec<Athlete>> {
        let mut snapshot = self.repo.load()?;
        let reference = competition_id
            .map(|id| Self::competition_in(&snapshot, id).map(|c| c.reference()))
            .transpose()?;

        let mut members: Vec<Athlete> = snapshot
            .athletes
            .iter()
            .filter(|a| reference.as_ref().map_or(true, |r| a.belongs_to(r)))
            .cloned()
            .collect();
        assign_lot_numbers(&mut members);

        for member in &members {
            if let Some(athlete) = snapshot.athlete_mut(member.id) {
                athlete.lot_number = member.lot_number;
            }
        }
        self.repo.save(&snapshot)?;
        info!(athletes = members.len(), "lot numbers assigned");
        Ok(members)
    }

    // ==========================================
    // Attempts
    // ==========================================

    pub fn attempts(&self, id: AthleteId) -> Result<AttemptSet> {
        let snapshot = self.repo.load()?;
        let athlete = snapshot.athlete(id).ok_or(Error::AthleteNotFound(id))?;
        Ok(snapshot
            .attempts
            .get(&id)
            .cloned()
            .unwrap_or_else(|| AttemptSet::seeded(athlete.attempt1.as_deref())))
    }

    /// Record one attempt slot and save.
    ///
    /// A scoring entry in the first slot also becomes the athlete's declared
    /// opener.
    pub fn record_attempt(
        &self,
        id: AthleteId,
        slot: AttemptSlot,
        value: &str,
        status: AttemptStatus,
    ) -> Result<AttemptSet> {
        let mut snapshot = self.repo.load()?;
        let opener = snapshot
            .athlete(id)
            .ok_or(Error::AthleteNotFound(id))?
            .attempt1
            .clone();

        let set = snapshot
            .attempts
            .entry(id)
            .or_insert_with(|| AttemptSet::seeded(opener.as_deref()));
        set.record(slot, value, status)?;
        let updated = set.clone();

        let value = value.trim();
        if slot == AttemptSlot::First && status.is_scoring() && !value.is_empty() {
            if let Some(athlete) = snapshot.athlete_mut(id) {
                athlete.attempt1 = Some(value.to_string());
            }
        }

        self.repo.save(&snapshot)?;
        info!(id, slot = slot.key(), value, status = status.tag(), "attempt recorded");
        Ok(updated)
    }

    /// Reset every athlete's attempts to their declared opener and clear the
    /// session registry
    pub fn clear_attempts(&self) -> Result<usize> {
        let mut snapshot = self.repo.load()?;
        snapshot.clear_attempts();
        let count = snapshot.attempts.len();
        self.repo.save(&snapshot)?;
        info!(athletes = count, "attempts cleared");
        Ok(count)
    }

    // ==========================================
    // Results
    // ==========================================

    pub fn results(&self, competition_id: u64) -> Result<ResultsReport> {
        let snapshot = self.repo.load()?;
        let competition = Self::competition_in(&snapshot, competition_id)?;
        debug!(
            competition = %competition.name,
            athletes = snapshot.athletes.len(),
            "building results"
        );
        Ok(ResultsReport {
            competition,
            snapshot,
        })
    }
}

fn register_session(snapshot: &mut MeetSnapshot, athlete: &Athlete) {
    if let (Some(competition), Some(session)) = (&athlete.competition, &athlete.session) {
        snapshot.add_session(&competition.name, session);
    }
}
