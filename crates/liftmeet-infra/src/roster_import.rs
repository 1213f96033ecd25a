//! CSV roster import
//!
//! Reads the registration sheet exported by meet organizers. Files come out
//! of spreadsheet tools in UTF-8 (with or without BOM) or Windows-1252, and
//! dates of birth may be ISO dates, day-first or year-first slashed dates, or
//! raw Excel serial numbers.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Days, NaiveDate};
use encoding_rs::{Encoding, WINDOWS_1252};
use thiserror::Error;
use tracing::{debug, warn};

use liftmeet_domain::model::{CompetitionRef, Gender, NewAthlete};
use liftmeet_types::Error;

#[derive(Error, Debug)]
pub enum RosterImportError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl From<RosterImportError> for Error {
    fn from(err: RosterImportError) -> Self {
        Error::Import(err.to_string())
    }
}

const COL_NAME: &str = "Name";
const COL_GENDER: &str = "Gender";
const COL_DOB: &str = "Date of Birth";
const COL_TEAM: &str = "Team/Club";
const COL_BODY_WEIGHT: &str = "Body Weight";
const COL_SESSION: &str = "Session";
const COL_OPENER: &str = "1 Attempt";
const COL_RACK: &str = "Rack";
const COL_LOT: &str = "Lotn";
const COL_COMPETITION: &str = "Competition name";
const COL_DATE: &str = "Date";
const COL_LOCATION: &str = "Location";
const COL_COMPETITION_TYPE: &str = "Competition Type";

const REQUIRED_COLUMNS: [&str; 3] = [COL_NAME, COL_DOB, COL_TEAM];

/// Rows read from a roster sheet
#[derive(Debug, Clone, Default)]
pub struct ParsedRoster {
    pub rows: Vec<NewAthlete>,
    /// Non-blank rows skipped for a missing name or team or a bad date of birth
    pub dropped: usize,
}

/// Load roster rows from a CSV file.
///
/// Rows without a name, a team or a parseable date of birth are skipped
/// with a warning. When `competition` is given it replaces the per-row
/// competition columns on every row.
pub fn load_roster<P: AsRef<Path>>(
    path: P,
    competition: Option<&CompetitionRef>,
) -> Result<ParsedRoster, RosterImportError> {
    let mut file = File::open(path.as_ref())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    debug!(path = %path.as_ref().display(), bytes = bytes.len(), "read roster file");
    parse_roster(&bytes, competition)
}

/// Parse roster rows from raw CSV bytes. See [`load_roster`].
pub fn parse_roster(
    bytes: &[u8],
    competition: Option<&CompetitionRef>,
) -> Result<ParsedRoster, RosterImportError> {
    let text = decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut roster = ParsedRoster::default();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // +2: 0-based index plus the header row
        let row_num = row_idx + 2;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match parse_record(&record, &columns, competition) {
            Ok(row) => roster.rows.push(row),
            Err(reason) => {
                warn!(row = row_num, %reason, "skipping roster row");
                roster.dropped += 1;
            }
        }
    }
    Ok(roster)
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("some roster characters could not be decoded from Windows-1252");
            }
            text
        }
    }
}

/// Header name to column index, matched case-insensitively
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, RosterImportError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        for col in REQUIRED_COLUMNS {
            if !index.contains_key(&col.to_lowercase()) {
                return Err(RosterImportError::MissingColumn(col.to_string()));
            }
        }
        Ok(Self { index })
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(&column.to_lowercase())
            .and_then(|&i| record.get(i))
            .filter(|s| !s.is_empty())
    }
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &Columns,
    competition: Option<&CompetitionRef>,
) -> Result<NewAthlete, String> {
    let name = columns
        .get(record, COL_NAME)
        .ok_or_else(|| "missing name".to_string())?;
    let team = columns
        .get(record, COL_TEAM)
        .ok_or_else(|| format!("missing team for {name}"))?;
    let dob_raw = columns
        .get(record, COL_DOB)
        .ok_or_else(|| format!("missing date of birth for {name}"))?;
    let dob = parse_date(dob_raw)
        .ok_or_else(|| format!("invalid date of birth for {name}: {dob_raw}"))?;

    let gender = columns
        .get(record, COL_GENDER)
        .and_then(|g| g.parse::<Gender>().ok());
    let body_weight = columns.get(record, COL_BODY_WEIGHT).and_then(parse_f64);
    let lot_number = columns
        .get(record, COL_LOT)
        .and_then(|s| s.parse::<u32>().ok());

    let competition = match competition {
        Some(c) => Some(c.clone()),
        None => CompetitionRef::from_parts(
            columns.get(record, COL_COMPETITION),
            columns.get(record, COL_DATE),
            columns.get(record, COL_LOCATION),
            columns.get(record, COL_COMPETITION_TYPE),
        ),
    };

    Ok(NewAthlete {
        name: name.to_string(),
        gender,
        dob: Some(dob),
        team: team.to_string(),
        body_weight,
        session: columns.get(record, COL_SESSION).map(String::from),
        rack: columns.get(record, COL_RACK).map(String::from),
        lot_number,
        attempt1: columns.get(record, COL_OPENER).map(String::from),
        competition,
    })
}

/// Parse a date of birth cell.
///
/// Tries ISO, day-first and year-first slashed dates, then an Excel serial
/// day number (days since 1899-12-30).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let formats = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    excel_serial_date(s)
}

fn excel_serial_date(s: &str) -> Option<NaiveDate> {
    let serial: f64 = s.parse().ok()?;
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.trunc() as u64))
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
