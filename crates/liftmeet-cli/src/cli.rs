//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use liftmeet_domain::model::{AttemptSlot, AttemptStatus, Gender};
use liftmeet_types::OutputFormat;

#[derive(Parser)]
#[command(name = "liftmeet")]
#[command(version)]
#[command(about = "Powerlifting meet desk: rosters, attempts and session results")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Meet data directory (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage competitions
    Competition {
        #[command(subcommand)]
        action: CompetitionAction,
    },

    /// Manage sessions of a competition
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage athletes
    Athlete {
        #[command(subcommand)]
        action: AthleteAction,
    },

    /// Import athletes from a roster CSV
    Import {
        /// Path to CSV file
        file: PathBuf,

        /// Enter every imported athlete in this competition, ignoring the
        /// per-row competition columns
        #[arg(long, short = 'c')]
        competition: Option<u64>,
    },

    /// Record one attempt
    Attempt {
        /// Athlete id
        athlete: u64,

        /// Slot: 1, 2, 3 or pl
        slot: AttemptSlot,

        /// Weight in kg (kept from before when omitted with a non-scoring status)
        value: Option<String>,

        /// Status: number, G, X, DNS, DNF
        #[arg(long, short = 's', default_value = "number")]
        status: AttemptStatus,
    },

    /// Show the attempts of one athlete
    Attempts {
        /// Athlete id
        athlete: u64,

        /// Order by weight instead of by slot
        #[arg(long)]
        by_weight: bool,
    },

    /// Reset every athlete's attempts
    ClearAttempts {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Assign lot numbers per session, heaviest opener first
    Lots {
        /// Only athletes of this competition
        #[arg(long, short = 'c')]
        competition: Option<u64>,
    },

    /// Show competition results
    Results {
        /// Competition id
        competition: u64,

        /// Only this session
        #[arg(long)]
        session: Option<String>,

        /// Only this bodyweight category (e.g. 72kg)
        #[arg(long)]
        category: Option<String>,

        /// Only this age group (e.g. Elite, NG)
        #[arg(long)]
        age_group: Option<String>,
    },

    /// Show the weigh-in list
    WeighIn {
        /// Competition id
        competition: u64,

        #[arg(long, short = 'g')]
        gender: Option<Gender>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set meet data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set age group reference date (YYYY-MM-DD)
        #[arg(long)]
        set_reference_date: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum CompetitionAction {
    /// Register a competition
    Add {
        name: String,

        /// Date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: NaiveDate,

        #[arg(long, short = 'l')]
        location: String,

        /// Competition type (e.g. Open, Nationals)
        #[arg(long = "type", short = 't')]
        kind: String,
    },

    /// List competitions
    List,

    /// Enter every athlete in a competition
    Apply {
        /// Competition id
        id: u64,
    },

    /// Edit a competition; entered athletes follow the change
    Edit {
        /// Competition id
        id: u64,

        #[arg(long)]
        name: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,

        #[arg(long, short = 'l')]
        location: Option<String>,

        #[arg(long = "type", short = 't')]
        kind: Option<String>,
    },

    /// Delete a competition
    Delete {
        /// Competition id
        id: u64,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Register a session name
    Add {
        /// Competition id
        competition: u64,

        name: String,
    },

    /// List session names
    List {
        /// Competition id
        competition: u64,
    },
}

#[derive(Subcommand)]
pub enum AthleteAction {
    /// Register an athlete
    Add {
        name: String,

        #[arg(long)]
        team: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: NaiveDate,

        #[arg(long, short = 'g')]
        gender: Option<Gender>,

        /// Bodyweight in kg
        #[arg(long, short = 'w')]
        body_weight: Option<f64>,

        #[arg(long)]
        session: Option<String>,

        #[arg(long)]
        rack: Option<String>,

        /// Declared first attempt in kg
        #[arg(long)]
        opener: Option<String>,

        /// Competition id
        #[arg(long, short = 'c')]
        competition: Option<u64>,
    },

    /// List athletes (women first, then category and opener)
    List,

    /// Record a bodyweight at the weigh-in
    Weigh {
        /// Athlete id
        id: u64,

        /// Bodyweight in kg
        body_weight: f64,
    },

    /// Edit an athlete (an empty value clears session, rack or opener)
    Edit {
        /// Athlete id
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        team: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,

        #[arg(long, short = 'g')]
        gender: Option<Gender>,

        /// Bodyweight in kg
        #[arg(long, short = 'w')]
        body_weight: Option<f64>,

        #[arg(long)]
        session: Option<String>,

        #[arg(long)]
        rack: Option<String>,

        /// Declared first attempt in kg
        #[arg(long)]
        opener: Option<String>,
    },

    /// Delete an athlete and their attempts
    Delete {
        /// Athlete id
        id: u64,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_attempt_with_status() {
        let cli = Cli::try_parse_from(["liftmeet", "attempt", "7", "pl", "90", "--status", "G"])
            .unwrap();
        match cli.command {
            Commands::Attempt {
                athlete,
                slot,
                value,
                status,
            } => {
                assert_eq!(athlete, 7);
                assert_eq!(slot, AttemptSlot::Pl);
                assert_eq!(value.as_deref(), Some("90"));
                assert_eq!(status, AttemptStatus::Good);
            }
            _ => panic!("expected attempt command"),
        }
    }

    #[test]
    fn test_parse_results_filters_and_global_format() {
        let cli = Cli::try_parse_from([
            "liftmeet", "results", "1", "--session", "A", "--age-group", "NG", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Results { competition: 1, ref session, ref age_group, category: None }
                if session.as_deref() == Some("A") && age_group.as_deref() == Some("NG")
        ));
    }

    #[test]
    fn test_bad_slot_is_rejected() {
        assert!(Cli::try_parse_from(["liftmeet", "attempt", "7", "5", "100"]).is_err());
    }

    #[test]
    fn test_parse_athlete_edit() {
        let cli = Cli::try_parse_from([
            "liftmeet", "athlete", "edit", "3", "--session", "", "-w", "66.4",
        ])
        .unwrap();
        match cli.command {
            Commands::Athlete {
                action:
                    AthleteAction::Edit {
                        id,
                        session,
                        body_weight,
                        dob,
                        ..
                    },
            } => {
                assert_eq!(id, 3);
                assert_eq!(session.as_deref(), Some(""));
                assert_eq!(body_weight, Some(66.4));
                assert_eq!(dob, None);
            }
            _ => panic!("expected athlete edit command"),
        }
    }

    #[test]
    fn test_parse_competition_delete() {
        let cli = Cli::try_parse_from(["liftmeet", "competition", "delete", "2", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Competition {
                action: CompetitionAction::Delete { id: 2, yes: true }
            }
        ));
    }
}
