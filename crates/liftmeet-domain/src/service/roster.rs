//! Roster ordering: lot numbers, athlete listing and weigh-in list

use crate::model::{Athlete, CompetitionRef, Gender};
use crate::service::classification::category_value;
use crate::service::standings::NO_SESSION;

fn opener(athlete: &Athlete) -> Option<f64> {
    athlete
        .attempt1
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Number athletes 1..n inside each session, heaviest declared opener first.
///
/// Blank or unparseable openers count as 0. Athletes keep their position in
/// the slice; only `lot_number` changes.
pub fn assign_lot_numbers(athletes: &mut [Athlete]) {
    let mut sessions: Vec<&str> = Vec::new();
    for a in athletes.iter() {
        let session = a.session.as_deref().unwrap_or(NO_SESSION);
        if !sessions.contains(&session) {
            sessions.push(session);
        }
    }
    let sessions: Vec<String> = sessions.into_iter().map(String::from).collect();

    for session in &sessions {
        let mut members: Vec<usize> = athletes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.session.as_deref().unwrap_or(NO_SESSION) == session)
            .map(|(i, _)| i)
            .collect();
        members.sort_by(|&a, &b| {
            let a1 = opener(&athletes[a]).unwrap_or(0.0);
            let b1 = opener(&athletes[b]).unwrap_or(0.0);
            b1.total_cmp(&a1)
        });
        for (lot, index) in members.into_iter().enumerate() {
            athletes[index].lot_number = Some(lot as u32 + 1);
        }
    }
}

/// Roster listing order: women first, then category, then declared opener
/// ascending (athletes without an opener first)
pub fn sort_for_listing(athletes: &mut [&Athlete]) {
    athletes.sort_by(|a, b| {
        let gender_rank = |x: &Athlete| match x.gender {
            Some(Gender::Female) => 0,
            _ => 1,
        };
        gender_rank(a)
            .cmp(&gender_rank(b))
            .then_with(|| category_value(a.category()).total_cmp(&category_value(b.category())))
            .then_with(|| {
                let a1 = opener(a).unwrap_or(f64::NEG_INFINITY);
                let b1 = opener(b).unwrap_or(f64::NEG_INFINITY);
                a1.total_cmp(&b1)
            })
    });
}

/// Athletes due at the weigh-in: entered in `competition` (or not yet
/// assigned to any), optionally narrowed to one gender and category
pub fn weigh_in_list<'a>(
    athletes: &'a [Athlete],
    competition: &CompetitionRef,
    gender: Option<Gender>,
    category: Option<&str>,
) -> Vec<&'a Athlete> {
    athletes
        .iter()
        .filter(|a| a.competition.is_none() || a.belongs_to(competition))
        .filter(|a| gender.map_or(true, |g| a.gender == Some(g)))
        .filter(|a| category.map_or(true, |c| a.category() == Some(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAthlete;
    use chrono::NaiveDate;

    fn athlete(
        id: u64,
        gender: Gender,
        weight: f64,
        session: Option<&str>,
        opener: Option<&str>,
    ) -> Athlete {
        Athlete::register(
            id,
            NewAthlete {
                name: format!("Lifter {id}"),
                gender: Some(gender),
                dob: NaiveDate::from_ymd_opt(1995, 4, 4),
                team: "Club".to_string(),
                body_weight: Some(weight),
                session: session.map(String::from),
                attempt1: opener.map(String::from),
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_lot_numbers_per_session_heaviest_first() {
        let mut athletes = vec![
            athlete(1, Gender::Male, 80.0, Some("A"), Some("120")),
            athlete(2, Gender::Male, 80.0, Some("B"), Some("100")),
            athlete(3, Gender::Male, 80.0, Some("A"), Some("150")),
            athlete(4, Gender::Male, 80.0, Some("A"), None),
            athlete(5, Gender::Male, 80.0, None, Some("90")),
        ];
        assign_lot_numbers(&mut athletes);
        let lots: Vec<Option<u32>> = athletes.iter().map(|a| a.lot_number).collect();
        assert_eq!(lots, vec![Some(2), Some(1), Some(1), Some(3), Some(1)]);
    }

    #[test]
    fn test_listing_order() {
        let athletes = vec![
            athlete(1, Gender::Male, 120.0, None, Some("200")),
            athlete(2, Gender::Male, 70.0, None, Some("150")),
            athlete(3, Gender::Female, 60.0, None, Some("90")),
            athlete(4, Gender::Male, 70.0, None, Some("140")),
            athlete(5, Gender::Male, 106.0, None, None),
        ];
        let mut listed: Vec<&Athlete> = athletes.iter().collect();
        sort_for_listing(&mut listed);
        let ids: Vec<u64> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4, 2, 5, 1]);
    }

    #[test]
    fn test_weigh_in_list_filters() {
        let comp = CompetitionRef {
            name: "Nationals".to_string(),
            date: "2025-06-14".to_string(),
            location: "Lagos".to_string(),
            kind: "Open".to_string(),
        };
        let mut entered = athlete(1, Gender::Male, 70.0, None, None);
        entered.competition = Some(comp.clone());
        let unassigned = athlete(2, Gender::Female, 60.0, None, None);
        let mut elsewhere = athlete(3, Gender::Male, 70.0, None, None);
        elsewhere.competition = Some(CompetitionRef {
            name: "Regionals".to_string(),
            ..comp.clone()
        });
        let athletes = vec![entered, unassigned, elsewhere];

        let all: Vec<u64> = weigh_in_list(&athletes, &comp, None, None)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(all, vec![1, 2]);
        let men = weigh_in_list(&athletes, &comp, Some(Gender::Male), Some("72kg"));
        assert_eq!(men.len(), 1);
        assert!(weigh_in_list(&athletes, &comp, None, Some("80kg")).is_empty());
    }
}
