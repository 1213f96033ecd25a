//! Repository adapters for persistence layer

use std::path::PathBuf;

use liftmeet_infra::FileMeetRepository;
use liftmeet_types::Result;

use crate::config::Config;

/// Open the file-based meet repository in the configured data directory
pub fn open_meet_repo(config: &Config) -> Result<FileMeetRepository> {
    let store_dir = config.store_dir()?;
    FileMeetRepository::open(store_dir)
}

/// Open the file-based meet repository at a custom directory
pub fn open_meet_repo_at(store_dir: PathBuf) -> Result<FileMeetRepository> {
    FileMeetRepository::open(store_dir)
}
