//! Results aggregation: session and age-group partitioning
//!
//! Athletes of one competition are grouped by session, then fanned out into
//! one [`Standing`] per age group they belong to. Ranks are computed inside
//! each (session, age group) bucket, per bodyweight category.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Athlete, AthleteId, AttemptSet, CompetitionRef};
use crate::service::classification::{age_group_label, category_order};
use crate::service::ranking::{rank_population, Metric, Rankable};

/// Bucket for athletes without a session
pub const NO_SESSION: &str = "No Session";

/// Bucket for athletes without any age group label
pub const UNKNOWN_AGE_GROUP: &str = "Unknown";

/// One athlete's entry in one age group.
///
/// An athlete in two age groups yields two standings that borrow the same
/// athlete record and attempt set.
#[derive(Debug, Clone, Serialize)]
pub struct Standing<'a> {
    pub athlete: &'a Athlete,
    pub attempts: Cow<'a, AttemptSet>,
    pub session: &'a str,
    pub active_age_group: &'a str,
    pub best_lift: f64,
    pub total_lift: f64,
    pub best_lift_rank: u32,
    pub total_lift_rank: u32,
}

impl Standing<'_> {
    /// Session label used on score sheets, e.g. `A_Elite`
    pub fn display_session(&self) -> String {
        format!("{}_{}", self.session, self.active_age_group)
    }
}

impl Rankable for Standing<'_> {
    fn category(&self) -> Option<&str> {
        self.athlete.category()
    }

    fn active_age_group(&self) -> &str {
        self.active_age_group
    }

    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BestLift => self.best_lift,
            Metric::TotalLift => self.total_lift,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeGroupStandings<'a> {
    pub age_group: &'a str,
    pub standings: Vec<Standing<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStandings<'a> {
    pub session: &'a str,
    pub age_groups: Vec<AgeGroupStandings<'a>>,
}

/// Optional equality filters applied to flattened standings
#[derive(Debug, Clone, Default)]
pub struct StandingsFilter {
    pub session: Option<String>,
    pub category: Option<String>,
    pub age_group: Option<String>,
}

impl StandingsFilter {
    fn matches(&self, standing: &Standing<'_>) -> bool {
        let session_ok = self.session.as_deref().map_or(true, |s| s == standing.session);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| standing.athlete.category() == Some(c));
        let age_group_ok = self
            .age_group
            .as_deref()
            .map_or(true, |g| age_group_label(g) == standing.active_age_group);
        session_ok && category_ok && age_group_ok
    }
}

/// Group entries by key, keeping first-seen key order
fn group_ordered<'a, T>(items: impl IntoIterator<Item = (&'a str, T)>) -> Vec<(&'a str, Vec<T>)> {
    let mut groups: Vec<(&'a str, Vec<T>)> = Vec::new();
    for (key, item) in items {
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    groups
}

fn session_key(athlete: &Athlete) -> &str {
    athlete.session.as_deref().unwrap_or(NO_SESSION)
}

fn age_group_keys(athlete: &Athlete) -> Vec<&str> {
    let labels: Vec<&str> = athlete
        .age_group_labels()
        .into_iter()
        .map(age_group_label)
        .collect();
    if labels.is_empty() {
        vec![UNKNOWN_AGE_GROUP]
    } else {
        labels
    }
}

/// Compute the standings of one competition.
///
/// Athletes without a stored attempt set are scored on a fresh set seeded
/// from their declared opener. Each bucket is returned sorted by best lift,
/// highest first.
pub fn compute_standings<'a>(
    athletes: &'a [Athlete],
    attempts: &'a BTreeMap<AthleteId, AttemptSet>,
    competition: &CompetitionRef,
) -> Vec<SessionStandings<'a>> {
    let entered = athletes
        .iter()
        .filter(|a| a.belongs_to(competition))
        .map(|a| (session_key(a), a));

    group_ordered(entered)
        .into_iter()
        .map(|(session, members)| {
            let fanned = members.into_iter().flat_map(|athlete| {
                let set = match attempts.get(&athlete.id) {
                    Some(set) => Cow::Borrowed(set),
                    None => Cow::Owned(AttemptSet::seeded(athlete.attempt1.as_deref())),
                };
                let summary = set.summary();
                age_group_keys(athlete).into_iter().map(move |age_group| {
                    (
                        age_group,
                        Standing {
                            athlete,
                            attempts: set.clone(),
                            session,
                            active_age_group: age_group,
                            best_lift: summary.best_lift,
                            total_lift: summary.total_lift,
                            best_lift_rank: 0,
                            total_lift_rank: 0,
                        },
                    )
                })
            });

            let age_groups = group_ordered(fanned)
                .into_iter()
                .map(|(age_group, mut standings)| {
                    let ranks = rank_population(&standings);
                    for (standing, (best, total)) in standings.iter_mut().zip(ranks) {
                        standing.best_lift_rank = best;
                        standing.total_lift_rank = total;
                    }
                    standings.sort_by(|a, b| b.best_lift.total_cmp(&a.best_lift));
                    AgeGroupStandings {
                        age_group,
                        standings,
                    }
                })
                .collect();

            SessionStandings {
                session,
                age_groups,
            }
        })
        .collect()
}

/// Flatten session/age-group buckets and apply the filters
pub fn flatten_standings<'a>(
    sessions: Vec<SessionStandings<'a>>,
    filter: &StandingsFilter,
) -> Vec<Standing<'a>> {
    sessions
        .into_iter()
        .flat_map(|s| s.age_groups)
        .flat_map(|g| g.standings)
        .filter(|s| filter.matches(s))
        .collect()
}

/// Presentation order: category table order, then best lift descending
pub fn sort_for_display(standings: &mut [Standing<'_>]) {
    standings.sort_by(|a, b| {
        category_order(a.athlete.category())
            .cmp(&category_order(b.athlete.category()))
            .then_with(|| b.best_lift.total_cmp(&a.best_lift))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attempt, AttemptStatus, Gender, NewAthlete};
    use chrono::NaiveDate;

    fn competition() -> CompetitionRef {
        CompetitionRef {
            name: "Nationals".to_string(),
            date: "2025-06-14".to_string(),
            location: "Lagos".to_string(),
            kind: "Open".to_string(),
        }
    }

    fn athlete(id: AthleteId, gender: Gender, weight: f64, session: Option<&str>) -> Athlete {
        Athlete::register(
            id,
            NewAthlete {
                name: format!("Lifter {id}"),
                gender: Some(gender),
                dob: NaiveDate::from_ymd_opt(1990, 1, 1),
                team: "Club".to_string(),
                body_weight: Some(weight),
                session: session.map(String::from),
                competition: Some(competition()),
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap()
    }

    fn good(value: &str) -> Attempt {
        Attempt {
            value: value.to_string(),
            status: AttemptStatus::Good,
        }
    }

    fn set(a1: &str, a2: &str, a3: &str) -> AttemptSet {
        AttemptSet {
            attempt1: good(a1),
            attempt2: good(a2),
            attempt3: good(a3),
            pl: Attempt::default(),
        }
    }

    #[test]
    fn test_athlete_in_two_age_groups_appears_twice() {
        let athletes = vec![
            athlete(1, Gender::Male, 70.0, Some("A")).with_age_group("Elite Legend"),
            athlete(2, Gender::Male, 71.0, Some("A")).with_age_group("Elite"),
        ];
        let mut attempts = BTreeMap::new();
        attempts.insert(1, set("100", "110", "120"));
        attempts.insert(2, set("130", "", ""));

        let flat = flatten_standings(
            compute_standings(&athletes, &attempts, &competition()),
            &StandingsFilter::default(),
        );
        let mine: Vec<&Standing> = flat.iter().filter(|s| s.athlete.id == 1).collect();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].active_age_group, "Elite");
        assert_eq!(mine[1].active_age_group, "Legend");
        assert_eq!(mine[0].best_lift, mine[1].best_lift);
        assert_eq!(mine[0].attempts, mine[1].attempts);
        // Elite: beaten by athlete 2 on best, ahead on total
        assert_eq!((mine[0].best_lift_rank, mine[0].total_lift_rank), (2, 1));
        // Legend: alone
        assert_eq!((mine[1].best_lift_rank, mine[1].total_lift_rank), (1, 1));
    }

    #[test]
    fn test_sessions_rank_independently() {
        let athletes = vec![
            athlete(1, Gender::Female, 60.0, Some("A")),
            athlete(2, Gender::Female, 60.0, Some("B")),
            athlete(3, Gender::Female, 60.0, None),
        ];
        let mut attempts = BTreeMap::new();
        attempts.insert(1, set("80", "", ""));
        attempts.insert(2, set("90", "", ""));
        attempts.insert(3, set("70", "", ""));

        let sessions = compute_standings(&athletes, &attempts, &competition());
        let names: Vec<&str> = sessions.iter().map(|s| s.session).collect();
        assert_eq!(names, vec!["A", "B", NO_SESSION]);
        for s in &sessions {
            assert_eq!(s.age_groups[0].standings[0].best_lift_rank, 1);
        }
    }

    #[test]
    fn test_other_competition_is_excluded() {
        let mut outsider = athlete(2, Gender::Male, 80.0, Some("A"));
        outsider.competition = Some(CompetitionRef {
            location: "Abuja".to_string(),
            ..competition()
        });
        let athletes = vec![athlete(1, Gender::Male, 80.0, Some("A")), outsider];
        let attempts = BTreeMap::new();
        let sessions = compute_standings(&athletes, &attempts, &competition());
        let flat = flatten_standings(sessions, &StandingsFilter::default());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].athlete.id, 1);
    }

    #[test]
    fn test_missing_attempts_seeded_from_opener() {
        let mut a = athlete(1, Gender::Male, 80.0, Some("A"));
        a.attempt1 = Some("140".to_string());
        let athletes = vec![a];
        let attempts = BTreeMap::new();
        let flat = flatten_standings(
            compute_standings(&athletes, &attempts, &competition()),
            &StandingsFilter::default(),
        );
        assert_eq!(flat[0].best_lift, 140.0);
        assert!(matches!(flat[0].attempts, Cow::Owned(_)));
    }

    #[test]
    fn test_no_age_group_goes_to_unknown() {
        let athletes = vec![athlete(1, Gender::Male, 80.0, Some("A")).with_age_group("")];
        let attempts = BTreeMap::new();
        let flat = flatten_standings(
            compute_standings(&athletes, &attempts, &competition()),
            &StandingsFilter::default(),
        );
        assert_eq!(flat[0].active_age_group, UNKNOWN_AGE_GROUP);
        assert_eq!(flat[0].best_lift_rank, 0);
    }

    #[test]
    fn test_bucket_sorted_by_best_lift() {
        let athletes = vec![
            athlete(1, Gender::Male, 60.0, Some("A")),
            athlete(2, Gender::Male, 90.0, Some("A")),
            athlete(3, Gender::Male, 60.0, Some("A")),
        ];
        let mut attempts = BTreeMap::new();
        attempts.insert(1, set("100", "", ""));
        attempts.insert(2, set("200", "", ""));
        attempts.insert(3, set("150", "", ""));
        let sessions = compute_standings(&athletes, &attempts, &competition());
        let ids: Vec<AthleteId> = sessions[0].age_groups[0]
            .standings
            .iter()
            .map(|s| s.athlete.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        // 2 is alone in 97kg
        assert_eq!(sessions[0].age_groups[0].standings[0].best_lift_rank, 1);
    }

    #[test]
    fn test_filters_and_display_order() {
        let athletes = vec![
            athlete(1, Gender::Male, 70.0, Some("A")),
            athlete(2, Gender::Female, 60.0, Some("A")),
            athlete(3, Gender::Male, 70.0, Some("B")),
            athlete(4, Gender::Male, 70.0, Some("A")),
        ];
        let mut attempts = BTreeMap::new();
        attempts.insert(1, set("100", "", ""));
        attempts.insert(2, set("80", "", ""));
        attempts.insert(3, set("120", "", ""));
        attempts.insert(4, set("110", "", ""));

        let mut all = flatten_standings(
            compute_standings(&athletes, &attempts, &competition()),
            &StandingsFilter::default(),
        );
        sort_for_display(&mut all);
        let ids: Vec<AthleteId> = all.iter().map(|s| s.athlete.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);

        let filter = StandingsFilter {
            session: Some("A".to_string()),
            category: Some("72kg".to_string()),
            age_group: Some("E".to_string()),
        };
        let only_a =
            flatten_standings(compute_standings(&athletes, &attempts, &competition()), &filter);
        let ids: Vec<AthleteId> = only_a.iter().map(|s| s.athlete.id).collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(only_a[0].display_session(), "A_Elite");
    }

    #[test]
    fn test_uncategorized_sorts_after_every_category() {
        let mut unweighed = athlete(1, Gender::Male, 70.0, Some("A"));
        unweighed.update_body_weight(None).unwrap();
        let athletes = vec![
            unweighed,
            athlete(2, Gender::Male, 120.0, Some("A")),
            athlete(3, Gender::Female, 40.0, Some("A")),
        ];
        let mut attempts = BTreeMap::new();
        attempts.insert(1, set("300", "", ""));
        attempts.insert(2, set("100", "", ""));
        attempts.insert(3, set("50", "", ""));

        let mut all = flatten_standings(
            compute_standings(&athletes, &attempts, &competition()),
            &StandingsFilter::default(),
        );
        sort_for_display(&mut all);
        let ids: Vec<AthleteId> = all.iter().map(|s| s.athlete.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(all[2].athlete.category(), None);
    }

    #[test]
    fn test_session_filter_matches_no_session_bucket() {
        let athletes = vec![
            athlete(1, Gender::Male, 70.0, Some("A")),
            athlete(2, Gender::Male, 70.0, None),
        ];
        let attempts = BTreeMap::new();
        let filter = StandingsFilter {
            session: Some(NO_SESSION.to_string()),
            ..Default::default()
        };
        let flat =
            flatten_standings(compute_standings(&athletes, &attempts, &competition()), &filter);
        let ids: Vec<AthleteId> = flat.iter().map(|s| s.athlete.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(flat[0].display_session(), "No Session_Elite");
    }
}
