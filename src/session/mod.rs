//! Session storage for in-progress forms.
//!
//! The engine never holds session state itself. A [`SessionStore`] maps a
//! [`SessionKey`] to the latest [`FormState`] so a bot or service can pick a
//! conversation up where it left off.

use crate::core::FormState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one user's run through one form in one chat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: i64,
    pub chat_id: i64,
    pub form_id: String,
}

impl SessionKey {
    pub fn new(user_id: i64, chat_id: i64, form_id: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            form_id: form_id.into(),
        }
    }

    /// Key for the session a state belongs to.
    pub fn for_state(state: &FormState) -> Self {
        Self::new(state.user_id, state.chat_id, state.form_id.clone())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.form_id, self.user_id, self.chat_id)
    }
}

/// Storage for form sessions.
///
/// Implementations hand out copies; mutating a returned state never changes
/// the stored one.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &SessionKey) -> Option<FormState>;

    fn set(&self, key: SessionKey, state: FormState);

    /// Remove a session, returning it if present.
    fn delete(&self, key: &SessionKey) -> Option<FormState>;

    /// Drop every session of a user. Returns how many were removed.
    fn clear_user(&self, user_id: i64) -> usize;

    /// Incomplete sessions of a user.
    fn active_for_user(&self, user_id: i64) -> Vec<(SessionKey, FormState)>;

    /// Store a state under its own key.
    fn save(&self, state: &FormState) {
        self.set(SessionKey::for_state(state), state.clone());
    }
}

/// Process-local [`SessionStore`] backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionKey, FormState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &SessionKey) -> Option<FormState> {
        self.sessions.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: SessionKey, state: FormState) {
        tracing::debug!(session = %key, step = state.current_step_index, "session stored");
        self.sessions.insert(key, state);
    }

    fn delete(&self, key: &SessionKey) -> Option<FormState> {
        self.sessions.remove(key).map(|(_, state)| state)
    }

    fn clear_user(&self, user_id: i64) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|key, _| key.user_id != user_id);
        let removed = before.saturating_sub(self.sessions.len());
        tracing::debug!(user_id, removed, "user sessions cleared");
        removed
    }

    fn active_for_user(&self, user_id: i64) -> Vec<(SessionKey, FormState)> {
        let mut active: Vec<_> = self
            .sessions
            .iter()
            .filter(|entry| entry.key().user_id == user_id && !entry.value().is_complete)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FormBuilder, StepBuilder};
    use crate::form::MultiStepForm;
    use std::sync::Arc;
    use std::thread;

    fn form(id: &str) -> MultiStepForm {
        FormBuilder::new(id, "Form")
            .step(StepBuilder::new("only", "Only step"))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn stored_states_are_independent_copies() {
        let store = InMemorySessionStore::new();
        let state = form("a").create_initial_state(1, 10);
        store.save(&state);

        let key = SessionKey::for_state(&state);
        let mut copy = store.get(&key).unwrap();
        copy.current_step_index = 99;

        assert_eq!(store.get(&key).unwrap().current_step_index, 0);
    }

    #[test]
    fn delete_removes_session() {
        let store = InMemorySessionStore::new();
        let state = form("a").create_initial_state(1, 10);
        store.save(&state);

        let key = SessionKey::for_state(&state);
        assert!(store.delete(&key).is_some());
        assert!(store.get(&key).is_none());
        assert!(store.delete(&key).is_none());
    }

    #[test]
    fn clear_user_only_touches_that_user() {
        let store = InMemorySessionStore::new();
        store.save(&form("a").create_initial_state(1, 10));
        store.save(&form("b").create_initial_state(1, 11));
        store.save(&form("a").create_initial_state(2, 20));

        assert_eq!(store.clear_user(1), 2);
        assert_eq!(store.len(), 1);
        assert!(store.get(&SessionKey::new(2, 20, "a")).is_some());
    }

    #[test]
    fn active_for_user_skips_completed() {
        let store = InMemorySessionStore::new();
        let a = form("a").create_initial_state(1, 10);
        let b = form("b").create_initial_state(1, 10);
        store.save(&a);
        store.save(&b.mark_complete());

        let active = store.active_for_user(1);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].0, SessionKey::new(1, 10, "a"));
        assert!(store.active_for_user(3).is_empty());
    }

    #[test]
    fn concurrent_writers_do_not_lose_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        let form = Arc::new(form("a"));

        let handles: Vec<_> = (0..8)
            .map(|user| {
                let store = Arc::clone(&store);
                let form = Arc::clone(&form);
                thread::spawn(move || store.save(&form.create_initial_state(user, user)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
    }

    #[test]
    fn key_display() {
        assert_eq!(SessionKey::new(4, 5, "signup").to_string(), "signup:4:5");
    }
}
