//! Command handlers

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::{AthleteAction, Cli, Commands, CompetitionAction, SessionAction};
use crate::output::{output_athletes, output_attempts, output_competitions, output_standings};
use liftmeet_app::config::Config;
use liftmeet_app::repository::open_meet_repo;
use liftmeet_app::MeetService;
use liftmeet_domain::model::{
    AthleteChanges, AttemptSlot, AttemptStatus, CompetitionRef, Gender, NewAthlete,
    NewCompetition,
};
use liftmeet_domain::service::StandingsFilter;
use liftmeet_infra::{load_roster, FileMeetRepository};
use liftmeet_types::{Error, OutputFormat, Result};

type Service = MeetService<FileMeetRepository>;

fn open_service(config: &Config) -> Result<Service> {
    Ok(MeetService::new(open_meet_repo(config)?, config.reference_date))
}

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Config {
            show,
            set_data_dir,
            set_reference_date,
            set_output,
            reset,
        } => cmd_config(show, set_data_dir, set_reference_date, set_output, reset),

        Commands::Competition { action } => {
            let svc = open_service(&config)?;
            match action {
                CompetitionAction::Add {
                    name,
                    date,
                    location,
                    kind,
                } => cmd_competition_add(&svc, name, date, location, kind),
                CompetitionAction::List => output_competitions(format, &svc.competitions()?),
                CompetitionAction::Apply { id } => {
                    let count = svc.apply_competition(id)?;
                    println!("Entered {} athletes in competition {}", count, id);
                    Ok(())
                }
                CompetitionAction::Edit {
                    id,
                    name,
                    date,
                    location,
                    kind,
                } => {
                    let competition = svc.update_competition(id, name, date, location, kind)?;
                    output_competitions(format, std::slice::from_ref(&competition))
                }
                CompetitionAction::Delete { id, yes } => {
                    if !yes {
                        println!(
                            "This deletes competition {}. Re-run with --yes to confirm.",
                            id
                        );
                        return Ok(());
                    }
                    let removed = svc.delete_competition(id)?;
                    println!("Competition deleted: #{} {}", removed.id, removed.name);
                    Ok(())
                }
            }
        }

        Commands::Session { action } => {
            let svc = open_service(&config)?;
            match action {
                SessionAction::Add { competition, name } => {
                    if svc.add_session(competition, &name)? {
                        println!("Session added: {}", name.trim());
                    } else {
                        println!("Session already exists: {}", name.trim());
                    }
                    Ok(())
                }
                SessionAction::List { competition } => cmd_session_list(&svc, format, competition),
            }
        }

        Commands::Athlete { action } => {
            let svc = open_service(&config)?;
            match action {
                AthleteAction::Add {
                    name,
                    team,
                    dob,
                    gender,
                    body_weight,
                    session,
                    rack,
                    opener,
                    competition,
                } => {
                    let competition = competition
                        .map(|id| find_competition_ref(&svc, id))
                        .transpose()?;
                    let athlete = svc.register_athlete(NewAthlete {
                        name,
                        gender,
                        dob: Some(dob),
                        team,
                        body_weight,
                        session,
                        rack,
                        lot_number: None,
                        attempt1: opener,
                        competition,
                    })?;
                    output_athletes(format, std::slice::from_ref(&athlete))
                }
                AthleteAction::List => output_athletes(format, &svc.list_athletes()?),
                AthleteAction::Weigh { id, body_weight } => {
                    let athlete = svc.weigh_athlete(id, body_weight)?;
                    output_athletes(format, std::slice::from_ref(&athlete))
                }
                AthleteAction::Edit {
                    id,
                    name,
                    team,
                    dob,
                    gender,
                    body_weight,
                    session,
                    rack,
                    opener,
                } => {
                    let changes = AthleteChanges {
                        name,
                        team,
                        gender,
                        dob,
                        body_weight,
                        session,
                        rack,
                        attempt1: opener,
                    };
                    if changes.is_empty() {
                        println!("Nothing to change.");
                        return Ok(());
                    }
                    let athlete = svc.update_athlete(id, changes)?;
                    output_athletes(format, std::slice::from_ref(&athlete))
                }
                AthleteAction::Delete { id, yes } => {
                    if !yes {
                        println!(
                            "This deletes athlete {} and their attempts. Re-run with --yes.",
                            id
                        );
                        return Ok(());
                    }
                    let removed = svc.delete_athlete(id)?;
                    println!("Athlete deleted: #{} {}", removed.id, removed.name);
                    Ok(())
                }
            }
        }

        Commands::Import { file, competition } => {
            cmd_import(&open_service(&config)?, file, competition)
        }

        Commands::Attempt {
            athlete,
            slot,
            value,
            status,
        } => cmd_attempt(&open_service(&config)?, format, athlete, slot, value, status),

        Commands::Attempts { athlete, by_weight } => {
            let svc = open_service(&config)?;
            let snapshot = svc.snapshot()?;
            let record = snapshot
                .athlete(athlete)
                .ok_or(Error::AthleteNotFound(athlete))?;
            output_attempts(format, record, &svc.attempts(athlete)?, by_weight)
        }

        Commands::ClearAttempts { yes } => {
            if !yes {
                println!("This resets every athlete's attempts. Re-run with --yes to confirm.");
                return Ok(());
            }
            let count = open_service(&config)?.clear_attempts()?;
            println!("Cleared attempts for {} athletes", count);
            Ok(())
        }

        Commands::Lots { competition } => {
            let svc = open_service(&config)?;
            svc.assign_lots(competition)?;
            output_athletes(format, &svc.list_athletes()?)
        }

        Commands::Results {
            competition,
            session,
            category,
            age_group,
        } => {
            let svc = open_service(&config)?;
            let report = svc.results(competition)?;
            let filter = StandingsFilter {
                session,
                category,
                age_group,
            };
            output_standings(format, &report.competition, &report.standings(&filter))
        }

        Commands::WeighIn {
            competition,
            gender,
            category,
        } => cmd_weigh_in(&open_service(&config)?, format, competition, gender, category),
    }
}

fn find_competition_ref(svc: &Service, id: u64) -> Result<CompetitionRef> {
    svc.competitions()?
        .into_iter()
        .find(|c| c.id == id)
        .map(|c| c.reference())
        .ok_or_else(|| Error::CompetitionNotFound(id.to_string()))
}

fn cmd_competition_add(
    svc: &Service,
    name: String,
    date: NaiveDate,
    location: String,
    kind: String,
) -> Result<()> {
    let competition = svc.add_competition(NewCompetition {
        name,
        date,
        location,
        kind,
    })?;
    println!(
        "Competition registered: #{} {} ({})",
        competition.id,
        competition.name,
        competition.date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cmd_session_list(svc: &Service, format: OutputFormat, competition: u64) -> Result<()> {
    let sessions = svc.sessions(competition)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }
    if sessions.is_empty() {
        println!("No sessions registered.");
    }
    for session in sessions {
        println!("{}", session);
    }
    Ok(())
}

fn cmd_import(svc: &Service, file: PathBuf, competition: Option<u64>) -> Result<()> {
    let competition = competition
        .map(|id| find_competition_ref(svc, id))
        .transpose()?;
    let roster = load_roster(&file, competition.as_ref())?;
    let summary = svc.import_roster(roster)?;

    println!("Import complete:");
    println!("  File:     {}", file.display());
    println!("  Imported: {}", summary.imported.len());
    if summary.skipped > 0 {
        println!("  Skipped:  {} (see warnings for the reasons)", summary.skipped);
    }
    Ok(())
}

fn cmd_attempt(
    svc: &Service,
    format: OutputFormat,
    athlete: u64,
    slot: AttemptSlot,
    value: Option<String>,
    status: AttemptStatus,
) -> Result<()> {
    let value = value.unwrap_or_default();
    let attempts = svc.record_attempt(athlete, slot, &value, status)?;
    let snapshot = svc.snapshot()?;
    let record = snapshot
        .athlete(athlete)
        .ok_or(Error::AthleteNotFound(athlete))?;
    output_attempts(format, record, &attempts, false)
}

fn cmd_weigh_in(
    svc: &Service,
    format: OutputFormat,
    competition: u64,
    gender: Option<Gender>,
    category: Option<String>,
) -> Result<()> {
    let athletes = svc.weigh_in(competition, gender, category.as_deref())?;
    output_athletes(format, &athletes)
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_reference_date: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(date) = set_reference_date {
        config.set_reference_date(&date)?;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
