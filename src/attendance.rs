//! Attendance selection state.
//!
//! Tracks which sessions the user intends to attend. The committed set
//! (`CheckedSet`) survives across runs; while edit mode is active a working
//! copy (`PendingSet`) absorbs toggles and is either committed back or
//! dropped. Both are explicit values passed through pure operations rather
//! than shared mutable state, so every rule here is unit-testable.

use std::collections::BTreeSet;

use crate::models::{Session, SessionId, Timetable};

/// Open-interval overlap test. Back-to-back sessions (`a.end == b.start`)
/// do not conflict.
pub fn conflict(a: &Session, b: &Session) -> bool {
    a.start_minutes() < b.end_minutes() && b.start_minutes() < a.end_minutes()
}

/// Outcome of a toggle attempt in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The id (and its grouped siblings) changed state.
    Applied,
    /// Checking the session would overlap an already-checked one; nothing
    /// changed. Rejection is a no-op, not an error.
    Blocked,
    /// The id does not exist in the schedule; nothing changed.
    Ignored,
}

/// The committed attendance selection, persisted across visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedSet {
    ids: BTreeSet<SessionId>,
}

impl CheckedSet {
    pub fn from_ids(ids: impl IntoIterator<Item = SessionId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids that are not part of the given schedule. Keeps the set a
    /// subset of the loaded document after a schedule revision.
    pub fn retain_valid(&mut self, timetable: &Timetable) {
        let valid: BTreeSet<SessionId> = timetable.session_ids().collect();
        self.ids.retain(|id| valid.contains(id));
    }
}

/// Working copy of the selection, alive only while edit mode is active.
/// Created on enter-edit, committed on save, dropped on cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSet {
    ids: BTreeSet<SessionId>,
}

impl PendingSet {
    /// Snapshot-copy the committed selection on entering edit mode.
    pub fn from_checked(checked: &CheckedSet) -> Self {
        Self {
            ids: checked.ids.clone(),
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True iff `candidate` is not already pending and overlaps a session
    /// that is. Sessions already in the set are never blocked, so they can
    /// always be unchecked.
    pub fn is_blocked(&self, candidate: &Session, timetable: &Timetable) -> bool {
        if self.ids.contains(&candidate.id) {
            return false;
        }
        self.ids
            .iter()
            .filter_map(|id| timetable.session(*id))
            .any(|checked| conflict(candidate, checked))
    }

    /// Add or remove a session. Grouped sessions (same title and start
    /// across tracks) switch in unison even when only one id was toggled.
    /// Checking a blocked session is rejected as a no-op.
    pub fn toggle(&mut self, id: SessionId, on: bool, timetable: &Timetable) -> Toggle {
        let Some(session) = timetable.session(id) else {
            return Toggle::Ignored;
        };
        if on && self.is_blocked(session, timetable) {
            return Toggle::Blocked;
        }
        for sibling in timetable.group_siblings(id) {
            if on {
                self.ids.insert(sibling);
            } else {
                self.ids.remove(&sibling);
            }
        }
        Toggle::Applied
    }

    /// Consume the working copy, producing the new committed selection.
    pub fn commit(self) -> CheckedSet {
        CheckedSet { ids: self.ids }
    }
}
