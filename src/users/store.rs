//! In-memory user store.
//!
//! One `Vec` behind one mutex. Every lookup is a linear scan by id, records
//! stay in insertion order, and nothing survives a restart. The mutex
//! serialises all access, so two concurrent creates can never compute the
//! same id.

use std::sync::{Mutex, MutexGuard};

use super::model::{User, UserFields, seed};

/// Why a store operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(i32),

    /// A thread panicked while holding the lock; the list may be half-written.
    #[error("user store lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub struct UserStore {
    users: Mutex<Vec<User>>,
}

impl UserStore {
    /// A store holding the two seed records.
    pub fn seeded() -> Self {
        Self::with_users(seed())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self { users: Mutex::new(users) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, StoreError> {
        self.users.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Snapshot of every record, in insertion order.
    pub fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: i32) -> Result<User, StoreError> {
        self.lock()?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Append a record with id `max + 1`, or `1` when the store is empty.
    pub fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
        let mut users = self.lock()?;
        let id = users.iter().map(|u| u.id).max().map_or(1, |max| max + 1);
        let user = fields.into_user(id);
        users.push(user.clone());
        Ok(user)
    }

    /// Overwrite the three fields of record `id`. The id itself never changes.
    pub fn replace(&self, id: i32, fields: UserFields) -> Result<User, StoreError> {
        let mut users = self.lock()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *user = fields.into_user(id);
        Ok(user.clone())
    }

    pub fn delete(&self, id: i32) -> Result<User, StoreError> {
        let mut users = self.lock()?;
        let pos = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(users.remove(pos))
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.users.lock();
            panic!("poisoning user store");
        }));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn fields(first: &str) -> UserFields {
        UserFields {
            first_name: first.to_owned(),
            last_name: "Lee".to_owned(),
            email: "ann@x.com".to_owned(),
        }
    }

    #[test]
    fn ids_continue_after_seed_and_stay_increasing() {
        let store = UserStore::seeded();
        let ids: Vec<i32> = ["a", "b", "c"]
            .into_iter()
            .map(|n| store.insert(fields(n)).expect("insert").id)
            .collect();
        assert_eq!(ids, [3, 4, 5]);
    }

    #[test]
    fn empty_store_starts_at_one() {
        let store = UserStore::with_users(Vec::new());
        assert_eq!(store.insert(fields("a")).expect("insert").id, 1);
    }

    #[test]
    fn id_is_max_plus_one_not_len_plus_one() {
        let store = UserStore::seeded();
        store.delete(1).expect("delete seed");
        assert_eq!(store.insert(fields("a")).expect("insert").id, 3);
    }

    #[test]
    fn replace_keeps_id_and_position() {
        let store = UserStore::seeded();
        let updated = store.replace(1, fields("Ann")).expect("replace");
        assert_eq!(updated.id, 1);
        let list = store.list().expect("list");
        assert_eq!(list[0].first_name, "Ann");
        assert_eq!(list[1].first_name, "Jane");
    }

    #[test]
    fn missing_ids_leave_the_store_untouched() {
        let store = UserStore::seeded();
        assert_eq!(store.get(9), Err(StoreError::NotFound(9)));
        assert_eq!(store.replace(9, fields("x")), Err(StoreError::NotFound(9)));
        assert_eq!(store.delete(9), Err(StoreError::NotFound(9)));
        assert_eq!(store.list().expect("list"), seed());
    }

    #[test]
    fn delete_is_permanent() {
        let store = UserStore::seeded();
        assert_eq!(store.delete(2).expect("delete").first_name, "Jane");
        assert_eq!(store.get(2), Err(StoreError::NotFound(2)));
        assert_eq!(store.delete(2), Err(StoreError::NotFound(2)));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = UserStore::seeded();
        store.poison();
        assert_eq!(store.get(1), Err(StoreError::Poisoned));
        assert_eq!(store.list(), Err(StoreError::Poisoned));
    }

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(UserStore::seeded());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| store.insert(fields("t")).expect("insert").id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<i32> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread"))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (3..203).collect::<Vec<_>>());
    }
}
