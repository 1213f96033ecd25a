//! In-memory implementation of MeetRepository

use std::cell::{Cell, RefCell};

use liftmeet_domain::model::MeetSnapshot;
use liftmeet_domain::repository::MeetRepository;
use liftmeet_types::Error;

/// Keeps the snapshot in memory only. Used for dry runs and tests.
#[derive(Default)]
pub struct InMemoryMeetRepository {
    snapshot: RefCell<MeetSnapshot>,
    saves: Cell<usize>,
}

impl InMemoryMeetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl MeetRepository for InMemoryMeetRepository {
    fn load(&self) -> Result<MeetSnapshot, Error> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &MeetSnapshot) -> Result<(), Error> {
        *self.snapshot.borrow_mut() = snapshot.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
