//! File-based implementation of MeetRepository

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use liftmeet_domain::model::MeetSnapshot;
use liftmeet_domain::repository::MeetRepository;
use liftmeet_types::{Error, Result};

const STORE_FILE: &str = "meet.json";
const STAGING_FILE: &str = "meet.json.tmp";

/// Meet snapshot stored as a single pretty-printed JSON file.
///
/// The snapshot is read once on [`FileMeetRepository::open`] and cached.
/// Every save writes the whole snapshot to a staging file and renames it over
/// the store, so a failed write leaves the previous file intact.
pub struct FileMeetRepository {
    store_path: PathBuf,
    snapshot: RefCell<MeetSnapshot>,
}

impl FileMeetRepository {
    /// Create the store directory if needed and load any existing snapshot
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(STORE_FILE);

        let snapshot = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            let snapshot: MeetSnapshot = serde_json::from_reader(reader)?;
            debug!(
                path = %store_path.display(),
                athletes = snapshot.athletes.len(),
                competitions = snapshot.competitions.len(),
                "loaded meet snapshot"
            );
            snapshot
        } else {
            debug!(path = %store_path.display(), "no meet snapshot yet, starting empty");
            MeetSnapshot::default()
        };

        Ok(Self {
            store_path,
            snapshot: RefCell::new(snapshot),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn persist(&self, snapshot: &MeetSnapshot) -> Result<()> {
        let staging = self.store_path.with_file_name(STAGING_FILE);
        let file = File::create(&staging)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&staging, &self.store_path)?;
        Ok(())
    }
}

impl MeetRepository for FileMeetRepository {
    fn load(&self) -> std::result::Result<MeetSnapshot, Error> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &MeetSnapshot) -> std::result::Result<(), Error> {
        self.persist(snapshot)?;
        *self.snapshot.borrow_mut() = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use liftmeet_domain::model::{Competition, NewCompetition};
    use tempfile::tempdir;

    fn competition() -> Competition {
        Competition::register(
            1,
            NewCompetition {
                name: "Nationals".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
                location: "Lagos".to_string(),
                kind: "Open".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_open_empty_dir_gives_empty_snapshot() {
        let dir = tempdir().unwrap();
        let repo = FileMeetRepository::open(dir.path().join("store")).unwrap();
        assert_eq!(repo.load().unwrap(), MeetSnapshot::default());
        assert!(!repo.store_path().exists());
    }

    #[test]
    fn test_save_survives_reopen() {
        let dir = tempdir().unwrap();
        let repo = FileMeetRepository::open(dir.path().to_path_buf()).unwrap();
        let mut snapshot = repo.load().unwrap();
        snapshot.competitions.push(competition());
        snapshot.add_session("Nationals", "A");
        repo.save(&snapshot).unwrap();

        let reopened = FileMeetRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load().unwrap(), snapshot);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE), "{not json").unwrap();
        let result = FileMeetRepository::open(dir.path().to_path_buf());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_failed_save_keeps_cache_and_file() {
        let dir = tempdir().unwrap();
        let repo = FileMeetRepository::open(dir.path().to_path_buf()).unwrap();
        let mut first = repo.load().unwrap();
        first.competitions.push(competition());
        repo.save(&first).unwrap();

        // A directory in the staging file's place makes the write fail
        fs::create_dir(dir.path().join(STAGING_FILE)).unwrap();
        let mut second = first.clone();
        second.add_session("Nationals", "A");
        assert!(matches!(repo.save(&second), Err(Error::Io(_))));

        assert_eq!(repo.load().unwrap(), first);
        let reopened = FileMeetRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load().unwrap(), first);
    }

    #[test]
    fn test_save_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let repo = FileMeetRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&MeetSnapshot::default()).unwrap();
        assert!(repo.store_path().exists());
        assert!(!dir.path().join(STAGING_FILE).exists());
    }
}
