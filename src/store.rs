//! In-memory user store.

use std::sync::{Mutex, PoisonError};

use crate::users::User;

/// The authoritative ordered sequence of users for the process lifetime.
///
/// Append-only: records are never mutated or removed once stored. A plain
/// mutex around a `Vec` is enough — neither operation suspends while the
/// lock is held, and `list_all` hands out a snapshot, so readers can never
/// observe a half-written record.
pub struct UserStore {
    users: Mutex<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self { users: Mutex::new(Vec::new()) }
    }

    /// Appends `user` to the end of the sequence. Insertion order is the
    /// iteration order for [`list_all`](Self::list_all).
    pub fn append(&self, user: User) {
        self.lock().push(user);
    }

    /// Snapshot of every stored user, insertion order. Appends racing with
    /// this call are either fully visible or not visible at all.
    pub fn list_all(&self) -> Vec<User> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        // A poisoned lock is recoverable here: push is the only mutation
        // and it cannot leave the Vec in an inconsistent state.
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
