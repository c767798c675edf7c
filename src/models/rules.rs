//! Per-session soft rules.
//!
//! Session rules are per-email directives supplied for one generation
//! run: forbidden positions, pairing and anti-pairing, forced position,
//! and first-preference protection. They are consumed once — by the
//! ranker (forced / protected status) and by the repair pass.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::Position;

/// A single session rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRule {
    /// Override the person's position regardless of preferences.
    ForcedPosition { email: String, position: Position },

    /// Positions the person must not be assigned.
    ForbiddenPositions {
        email: String,
        positions: Vec<Position>,
    },

    /// The person must end up on the same team as the partner.
    MustPlayWith { email: String, partner: String },

    /// The person must not share a team with the partner.
    CannotPlayWith { email: String, partner: String },

    /// The person may only be placed at their first preference while the
    /// strict pass holds.
    KeepFirstPreference { email: String },
}

impl SessionRule {
    /// Creates a forced-position rule.
    pub fn forced(email: impl Into<String>, position: Position) -> Self {
        Self::ForcedPosition {
            email: email.into(),
            position,
        }
    }

    /// Creates a forbidden-positions rule.
    pub fn forbidden(email: impl Into<String>, positions: Vec<Position>) -> Self {
        Self::ForbiddenPositions {
            email: email.into(),
            positions,
        }
    }

    /// Creates a must-play-with rule.
    pub fn must_play_with(email: impl Into<String>, partner: impl Into<String>) -> Self {
        Self::MustPlayWith {
            email: email.into(),
            partner: partner.into(),
        }
    }

    /// Creates a cannot-play-with rule.
    pub fn cannot_play_with(email: impl Into<String>, partner: impl Into<String>) -> Self {
        Self::CannotPlayWith {
            email: email.into(),
            partner: partner.into(),
        }
    }

    /// Creates a keep-first-preference rule.
    pub fn keep_first_preference(email: impl Into<String>) -> Self {
        Self::KeepFirstPreference {
            email: email.into(),
        }
    }
}

/// Aggregated per-email directives for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBundle {
    /// Positions this person must not occupy.
    pub forbidden: HashSet<Position>,
    /// Emails this person must be teamed with.
    pub must_with: HashSet<String>,
    /// Emails this person must not be teamed with.
    pub cannot_with: HashSet<String>,
    /// Externally forced position, overriding preferences.
    pub forced: Option<Position>,
    /// Whether the person is protected at their first preference.
    pub keep_first: bool,
}

/// Rule lookup for one generation run, keyed by normalized email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    bundles: HashMap<String, RuleBundle>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates a list of rules into per-email bundles.
    ///
    /// Pairing rules are recorded on both sides so either person can
    /// trigger the repair phase. A later forced position replaces an
    /// earlier one for the same email.
    pub fn from_rules(rules: &[SessionRule]) -> Self {
        let mut set = Self::new();
        for rule in rules {
            match rule {
                SessionRule::ForcedPosition { email, position } => {
                    set.bundle_mut(email).forced = Some(*position);
                }
                SessionRule::ForbiddenPositions { email, positions } => {
                    set.bundle_mut(email).forbidden.extend(positions.iter().copied());
                }
                SessionRule::MustPlayWith { email, partner } => {
                    let partner_key = partner.trim().to_lowercase();
                    let email_key = email.trim().to_lowercase();
                    set.bundle_mut(email).must_with.insert(partner_key.clone());
                    set.bundle_mut(partner).must_with.insert(email_key);
                }
                SessionRule::CannotPlayWith { email, partner } => {
                    let partner_key = partner.trim().to_lowercase();
                    let email_key = email.trim().to_lowercase();
                    set.bundle_mut(email).cannot_with.insert(partner_key.clone());
                    set.bundle_mut(partner).cannot_with.insert(email_key);
                }
                SessionRule::KeepFirstPreference { email } => {
                    set.bundle_mut(email).keep_first = true;
                }
            }
        }
        set
    }

    fn bundle_mut(&mut self, email: &str) -> &mut RuleBundle {
        self.bundles
            .entry(email.trim().to_lowercase())
            .or_default()
    }

    /// The bundle for an email, if any rule mentions it.
    pub fn bundle(&self, email: &str) -> Option<&RuleBundle> {
        self.bundles.get(email)
    }

    /// Forced position for an email, if any.
    pub fn forced(&self, email: &str) -> Option<Position> {
        self.bundles.get(email).and_then(|b| b.forced)
    }

    /// Whether an email is protected at its first preference.
    pub fn is_protected(&self, email: &str) -> bool {
        self.bundles.get(email).is_some_and(|b| b.keep_first)
    }

    /// Whether a position is forbidden for an email.
    pub fn is_forbidden(&self, email: &str, pos: Position) -> bool {
        self.bundles
            .get(email)
            .is_some_and(|b| b.forbidden.contains(&pos))
    }

    /// Emails mentioned by any rule, in unspecified order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Whether no rules were supplied.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
