//! Mock staff directory for testing.

use gatekit_core::{EventId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{RedemptionError, Result};
use crate::providers::{AssignmentUpdate, StaffDirectory};
use crate::types::{Role, StaffUser};

/// In-memory staff directory.
///
/// Enforces username uniqueness on insert, matching what the trait assumes
/// of production directories.
#[derive(Debug, Clone, Default)]
pub struct MockStaffDirectory {
    users: Arc<Mutex<HashMap<UserId, StaffUser>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockStaffDirectory {
    /// Create a new mock directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a user, replacing any record with the same id.
    ///
    /// # Panics
    ///
    /// Panics if a *different* user already holds the username, or if the
    /// internal lock is poisoned; both are test-setup bugs.
    pub fn add_user(&self, user: StaffUser) {
        #[allow(clippy::unwrap_used, clippy::panic)]
        {
            let mut users = self.users.lock().unwrap();
            if users
                .values()
                .any(|u| u.username == user.username && u.user_id != user.user_id)
            {
                panic!("duplicate username in test setup: {}", user.username);
            }
            users.insert(user.user_id, user);
        }
    }

    /// Fetch a user by id (for assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<StaffUser> {
        #[allow(clippy::unwrap_used)]
        let user = self.users.lock().unwrap().get(&user_id).cloned();
        user
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RedemptionError::StoreUnavailable(
                "simulated directory outage".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, StaffUser>>> {
        self.users
            .lock()
            .map_err(|_| RedemptionError::StoreUnavailable("lock poisoned".to_string()))
    }
}

impl StaffDirectory for MockStaffDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<StaffUser>> {
        self.check_available()?;
        Ok(self
            .lock()?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn assign_event(&self, user_id: UserId, event_id: EventId) -> Result<AssignmentUpdate> {
        self.check_available()?;
        let mut users = self.lock()?;

        let user = users
            .get_mut(&user_id)
            .ok_or(RedemptionError::UserNotFound)?;

        // One write: monotonic role floor plus event-set insert
        let previous_role = user.role;
        user.role = user.role.at_least(Role::Verifier);
        let newly_assigned = user.assigned_events.insert(event_id);

        Ok(AssignmentUpdate {
            user: user.clone(),
            previous_role,
            role_elevated: user.role != previous_role,
            newly_assigned,
        })
    }

    async fn verifiers_for_event(&self, event_id: EventId) -> Result<Vec<StaffUser>> {
        self.check_available()?;
        Ok(self
            .lock()?
            .values()
            .filter(|u| u.assigned_events.contains(&event_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assign_upgrades_attendee_and_adds_event() {
        let directory = MockStaffDirectory::new();
        let user = StaffUser::attendee("door-crew-1", "crew1@example.com");
        let user_id = user.user_id;
        directory.add_user(user);

        let event = EventId::new();
        let update = directory.assign_event(user_id, event).await.unwrap();

        assert_eq!(update.previous_role, Role::Attendee);
        assert_eq!(update.user.role, Role::Verifier);
        assert!(update.role_elevated);
        assert!(update.newly_assigned);
        assert!(update.user.assigned_events.contains(&event));
    }

    #[tokio::test]
    async fn reassign_is_idempotent() {
        let directory = MockStaffDirectory::new();
        let user = StaffUser::attendee("door-crew-1", "crew1@example.com");
        let user_id = user.user_id;
        directory.add_user(user);

        let event = EventId::new();
        directory.assign_event(user_id, event).await.unwrap();
        let second = directory.assign_event(user_id, event).await.unwrap();

        assert!(!second.role_elevated);
        assert!(!second.newly_assigned);
        assert_eq!(second.user.assigned_events.len(), 1);
    }

    #[tokio::test]
    async fn elevated_roles_are_never_downgraded() {
        let directory = MockStaffDirectory::new();
        let mut user = StaffUser::attendee("organizer-1", "org@example.com");
        user.role = Role::Organizer;
        let user_id = user.user_id;
        directory.add_user(user);

        let update = directory
            .assign_event(user_id, EventId::new())
            .await
            .unwrap();
        assert_eq!(update.user.role, Role::Organizer);
        assert!(!update.role_elevated);
    }

    #[tokio::test]
    async fn assign_unknown_user_fails() {
        let directory = MockStaffDirectory::new();
        let result = directory.assign_event(UserId::new(), EventId::new()).await;
        assert_eq!(result, Err(RedemptionError::UserNotFound));
    }
}
