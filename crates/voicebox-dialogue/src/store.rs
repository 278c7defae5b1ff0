//! Per-user conversation state, guarded by one lock.
//!
//! Every operation takes the lock for a single map access and releases it
//! before returning, so callers never hold it across storage or network I/O.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use voicebox_core::types::UserId;

use crate::types::{ConversationState, Phase};

/// In-memory map from user to conversation state.
///
/// Entries are created lazily and live for the lifetime of the store;
/// finishing a dialogue resets the entry to idle instead of removing it.
#[derive(Debug, Default)]
pub struct StateStore {
    states: Mutex<HashMap<UserId, ConversationState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writes are whole-field assignments; a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, ConversationState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of `user`, creating a fresh idle entry if needed.
    pub fn state(&self, user: UserId) -> ConversationState {
        self.lock().entry(user).or_default().clone()
    }

    /// Replace the whole state of `user`.
    pub fn set_state(&self, user: UserId, state: ConversationState) {
        self.lock().insert(user, state);
    }

    /// Phase of `user`; `Idle` when the user has no entry. Never creates one.
    pub fn phase(&self, user: UserId) -> Phase {
        self.lock()
            .get(&user)
            .map(|state| state.phase)
            .unwrap_or_default()
    }

    /// Overwrite only the phase, keeping the draft.
    pub fn set_phase(&self, user: UserId, phase: Phase) {
        self.lock().entry(user).or_default().phase = phase;
    }

    /// Read-modify-write the state of `user` under the lock.
    pub fn update<F, T>(&self, user: UserId, f: F) -> T
    where
        F: FnOnce(&mut ConversationState) -> T,
    {
        let mut states = self.lock();
        f(states.entry(user).or_default())
    }

    /// Back to idle with an empty draft.
    pub fn reset(&self, user: UserId) {
        *self.lock().entry(user).or_default() = ConversationState::default();
    }

    /// Number of users with an entry.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.lock().contains_key(&user)
    }
}
