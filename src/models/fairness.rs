//! Rolling fairness history.
//!
//! Tracks how often each person was placed off their first preference in
//! the two most recent finalized sessions. The engine only reads these
//! maps; deriving them from stored outcomes happens here so persistence
//! collaborators can stay dumb.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Position;

/// Lifecycle status of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    /// Generated but not yet confirmed; excluded from fairness.
    Draft,
    /// Confirmed outcome; counts toward fairness.
    Final,
}

/// One stored per-person assignment row from a past session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Normalized lowercase email.
    pub email: String,
    /// First preference at the time, if stated.
    pub pref1: Option<Position>,
    /// Position actually assigned.
    pub assigned: Position,
}

/// A past session's outcome as stored by the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Session identifier.
    pub session_id: String,
    /// ISO date (`YYYY-MM-DD`); used only for recency ordering.
    pub date: String,
    /// Draft or final.
    pub status: SessionStatus,
    /// Per-person rows.
    pub assignments: Vec<AssignmentRecord>,
}

/// Read-only off-preference lookup over the last two finalized outcomes.
///
/// Unknown emails default to 0 / false. Counts are clamped to 0..=2.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FairnessHistory {
    off_pref_count: HashMap<String, u8>,
    off_pref_any: HashMap<String, bool>,
}

impl FairnessHistory {
    /// Creates an empty history (everyone at 0 / false).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from precomputed maps, clamping counts to 0..=2.
    pub fn from_maps(counts: HashMap<String, u8>, any: HashMap<String, bool>) -> Self {
        let off_pref_count = counts
            .into_iter()
            .map(|(email, n)| (email.to_lowercase(), n.min(2)))
            .collect();
        let off_pref_any = any
            .into_iter()
            .map(|(email, b)| (email.to_lowercase(), b))
            .collect();
        Self {
            off_pref_count,
            off_pref_any,
        }
    }

    /// Derives fairness maps from stored outcomes.
    ///
    /// Only `Final` sessions count; of those, only the two most recent by
    /// date (descending, session id as tie-break). A row is off-pref when
    /// it has a stated first preference and was assigned elsewhere.
    pub fn from_outcomes(outcomes: &[SessionOutcome]) -> Self {
        let mut finals: Vec<&SessionOutcome> = outcomes
            .iter()
            .filter(|o| o.status == SessionStatus::Final)
            .collect();
        finals.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.session_id.cmp(&a.session_id))
        });

        let mut history = Self::new();
        for outcome in finals.into_iter().take(2) {
            for row in &outcome.assignments {
                let email = row.email.to_lowercase();
                let off = matches!(row.pref1, Some(p) if p != row.assigned);
                if off {
                    let count = history.off_pref_count.entry(email.clone()).or_insert(0);
                    *count = (*count + 1).min(2);
                    history.off_pref_any.insert(email, true);
                } else {
                    history.off_pref_any.entry(email).or_insert(false);
                }
            }
        }
        history
    }

    /// Times this person was off-pref across the last two finals (0..=2).
    pub fn off_pref_count(&self, email: &str) -> u8 {
        self.off_pref_count.get(email).copied().unwrap_or(0)
    }

    /// Whether this person was off-pref at least once in the last two finals.
    pub fn has_any_off_pref(&self, email: &str) -> bool {
        self.off_pref_any.get(email).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, pref1: Option<Position>, assigned: Position) -> AssignmentRecord {
        AssignmentRecord {
            email: email.into(),
            pref1,
            assigned,
        }
    }

    fn outcome(id: &str, date: &str, status: SessionStatus, rows: Vec<AssignmentRecord>) -> SessionOutcome {
        SessionOutcome {
            session_id: id.into(),
            date: date.into(),
            status,
            assignments: rows,
        }
    }

    #[test]
    fn test_unknown_email_defaults() {
        let h = FairnessHistory::new();
        assert_eq!(h.off_pref_count("nobody@x"), 0);
        assert!(!h.has_any_off_pref("nobody@x"));
    }

    #[test]
    fn test_counts_clamped() {
        let mut counts = HashMap::new();
        counts.insert("a@x".to_string(), 5u8);
        let h = FairnessHistory::from_maps(counts, HashMap::new());
        assert_eq!(h.off_pref_count("a@x"), 2);
    }

    #[test]
    fn test_only_last_two_finals_count() {
        let outcomes = vec![
            outcome(
                "s1",
                "2026-08-01",
                SessionStatus::Final,
                vec![row("a@x", Some(Position::Setter), Position::Outside)],
            ),
            outcome(
                "s2",
                "2026-08-08",
                SessionStatus::Final,
                vec![row("a@x", Some(Position::Setter), Position::Outside)],
            ),
            outcome(
                "s3",
                "2026-08-15",
                SessionStatus::Final,
                vec![row("a@x", Some(Position::Setter), Position::Setter)],
            ),
            // Draft never counts, even when most recent.
            outcome(
                "s4",
                "2026-08-22",
                SessionStatus::Draft,
                vec![row("a@x", Some(Position::Setter), Position::Outside)],
            ),
        ];
        let h = FairnessHistory::from_outcomes(&outcomes);
        // Window is s3 (on-pref) and s2 (off-pref); s1 aged out.
        assert_eq!(h.off_pref_count("a@x"), 1);
        assert!(h.has_any_off_pref("a@x"));
    }

    #[test]
    fn test_off_pref_both_recent_finals() {
        let outcomes = vec![
            outcome(
                "s1",
                "2026-08-08",
                SessionStatus::Final,
                vec![row("b@x", Some(Position::Middle), Position::Outside)],
            ),
            outcome(
                "s2",
                "2026-08-15",
                SessionStatus::Final,
                vec![row("b@x", Some(Position::Middle), Position::Setter)],
            ),
        ];
        let h = FairnessHistory::from_outcomes(&outcomes);
        assert_eq!(h.off_pref_count("b@x"), 2);
    }

    #[test]
    fn test_missing_pref_never_off() {
        let outcomes = vec![outcome(
            "s1",
            "2026-08-15",
            SessionStatus::Final,
            vec![row("c@x", None, Position::Outside)],
        )];
        let h = FairnessHistory::from_outcomes(&outcomes);
        assert_eq!(h.off_pref_count("c@x"), 0);
        assert!(!h.has_any_off_pref("c@x"));
    }
}
