//! End-to-end meet desk workflow against an on-disk store

use chrono::NaiveDate;
use tempfile::TempDir;

use liftmeet_app::repository::open_meet_repo_at;
use liftmeet_app::MeetService;
use liftmeet_domain::model::{AthleteChanges, AttemptSlot, AttemptStatus, Gender, NewCompetition};
use liftmeet_domain::service::StandingsFilter;
use liftmeet_infra::{parse_roster, FileMeetRepository};

const ROSTER: &str = "\
Name,Gender,Date of Birth,Team/Club,Body Weight,Session,1 Attempt,Rack,Lotn
Chidi Eze,Male,1978-02-10,Lagos PC,70.5,A,150,12,
Musa Bello,Male,12/05/1999,Kano BC,71.0,A,150,11,
Bad Row,Male,32/13/2000,Kano BC,71.0,A,150,11,
Ada Obi,Female,2006-03-02,Lagos PC,60.2,B,95,8,
Kemi Ade,Female,38000,Ibadan BC,59.0,B,100,9,
";

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
}

fn open(dir: &TempDir) -> MeetService<FileMeetRepository> {
    let repo = open_meet_repo_at(dir.path().to_path_buf()).unwrap();
    MeetService::new(repo, reference_date())
}

/// Competition 1 with the roster imported into it
fn seeded_meet(dir: &TempDir) -> MeetService<FileMeetRepository> {
    let svc = open(dir);
    let competition = svc
        .add_competition(NewCompetition {
            name: "Nationals".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            location: "Lagos".to_string(),
            kind: "Open".to_string(),
        })
        .unwrap();
    let roster = parse_roster(ROSTER.as_bytes(), Some(&competition.reference())).unwrap();
    let summary = svc.import_roster(roster).unwrap();
    assert_eq!(summary.imported.len(), 4);
    // "Bad Row" has an impossible date of birth
    assert_eq!(summary.skipped, 1);
    svc
}

fn record(
    svc: &MeetService<FileMeetRepository>,
    id: u64,
    slot: AttemptSlot,
    value: &str,
    status: AttemptStatus,
) {
    svc.record_attempt(id, slot, value, status).unwrap();
}

#[test]
fn test_import_drops_bad_dob_and_registers_sessions() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);

    let names: Vec<String> = svc
        .snapshot()
        .unwrap()
        .athletes
        .iter()
        .map(|a| a.name.clone())
        .collect();
    assert_eq!(names, vec!["Chidi Eze", "Musa Bello", "Ada Obi", "Kemi Ade"]);
    assert_eq!(svc.sessions(1).unwrap(), vec!["A", "B"]);

    // Excel serial 38000 = 2004-01-14
    let kemi = svc.snapshot().unwrap().athletes[3].clone();
    assert_eq!(kemi.dob, NaiveDate::from_ymd_opt(2004, 1, 14).unwrap());
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let svc = seeded_meet(&dir);
        record(&svc, 1, AttemptSlot::Second, "160", AttemptStatus::Good);
    }
    let svc = open(&dir);
    assert_eq!(svc.snapshot().unwrap().athletes.len(), 4);
    assert_eq!(svc.attempts(1).unwrap().attempt2.value, "160");
}

#[test]
fn test_results_scoring_and_fan_out() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);

    // Chidi: 47 at the reference date, Elite and Legend
    record(&svc, 1, AttemptSlot::First, "100", AttemptStatus::Number);
    record(&svc, 1, AttemptSlot::Second, "", AttemptStatus::NoLift);
    record(&svc, 1, AttemptSlot::Third, "110", AttemptStatus::Number);
    record(&svc, 1, AttemptSlot::Pl, "90", AttemptStatus::Good);

    let report = svc.results(1).unwrap();
    let all = report.standings(&StandingsFilter::default());

    let chidi: Vec<_> = all.iter().filter(|s| s.athlete.id == 1).collect();
    assert_eq!(chidi.len(), 2);
    assert_eq!(chidi[0].active_age_group, "Elite");
    assert_eq!(chidi[1].active_age_group, "Legend");
    for s in &chidi {
        assert_eq!(s.best_lift, 110.0);
        assert_eq!(s.total_lift, 210.0);
        assert_eq!(s.attempts.attempt3.value, "110");
    }
    assert_eq!(chidi[1].display_session(), "A_Legend");

    // Women's categories come first
    assert_eq!(all[0].athlete.gender, Some(Gender::Female));
}

#[test]
fn test_tied_openers_rank_in_input_order() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);

    // Chidi and Musa both 72kg Elite in session A, opening at 150
    let report = svc.results(1).unwrap();
    let filter = StandingsFilter {
        session: Some("A".to_string()),
        category: Some("72kg".to_string()),
        age_group: Some("E".to_string()),
    };
    let ranked: Vec<(u64, u32)> = report
        .standings(&filter)
        .iter()
        .map(|s| (s.athlete.id, s.best_lift_rank))
        .collect();
    assert_eq!(ranked, vec![(1, 1), (2, 2)]);
}

#[test]
fn test_lots_and_weigh_in() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);

    let lots: Vec<(u64, Option<u32>)> = svc
        .assign_lots(Some(1))
        .unwrap()
        .iter()
        .map(|a| (a.id, a.lot_number))
        .collect();
    assert_eq!(lots, vec![(1, Some(1)), (2, Some(2)), (3, Some(2)), (4, Some(1))]);

    let women: Vec<u64> = svc
        .weigh_in(1, Some(Gender::Female), None)
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(women, vec![3, 4]);

    let weighed = svc.weigh_athlete(2, 73.4).unwrap();
    assert_eq!(weighed.category(), Some("80kg"));
}

#[test]
fn test_competition_scoping() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);
    svc.add_competition(NewCompetition {
        name: "Open Cup".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        location: "Abuja".to_string(),
        kind: "Open".to_string(),
    })
    .unwrap();

    assert!(svc.results(2).unwrap().standings(&StandingsFilter::default()).is_empty());
    assert_eq!(svc.apply_competition(2).unwrap(), 4);
    assert!(svc.results(1).unwrap().standings(&StandingsFilter::default()).is_empty());
    assert!(!svc.results(2).unwrap().standings(&StandingsFilter::default()).is_empty());
}

#[test]
fn test_edit_and_delete_persist() {
    let dir = TempDir::new().unwrap();
    {
        let svc = seeded_meet(&dir);
        let changes = AthleteChanges {
            session: Some("C".to_string()),
            ..Default::default()
        };
        svc.update_athlete(2, changes).unwrap();
        svc.delete_athlete(4).unwrap();
    }
    let svc = open(&dir);
    let snapshot = svc.snapshot().unwrap();
    assert_eq!(snapshot.athlete(2).unwrap().session.as_deref(), Some("C"));
    assert!(snapshot.athlete(4).is_none());
    assert!(!snapshot.attempts.contains_key(&4));
    assert_eq!(svc.sessions(1).unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn test_clear_attempts_keeps_openers() {
    let dir = TempDir::new().unwrap();
    let svc = seeded_meet(&dir);
    record(&svc, 3, AttemptSlot::Second, "100", AttemptStatus::Good);
    svc.clear_attempts().unwrap();

    let reopened = open(&dir);
    let attempts = reopened.attempts(3).unwrap();
    assert_eq!(attempts.attempt1.value, "95");
    assert!(attempts.attempt2.value.is_empty());
    assert!(reopened.sessions(1).unwrap().is_empty());
}
