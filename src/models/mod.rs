//! Domain models for team assignment.
//!
//! Provides the core data types the engine consumes and produces:
//! roster persons, team shapes and filled teams, the rolling fairness
//! history, and per-session soft rules. The engine owns no persistent
//! state; everything here is passed in, transformed into a fresh team
//! list, and returned.

mod fairness;
mod person;
mod rules;
mod team;

pub use fairness::{AssignmentRecord, FairnessHistory, SessionOutcome, SessionStatus};
pub use person::{Gender, Person, Position};
pub use rules::{RuleBundle, RuleSet, SessionRule};
pub use team::{PlayerAssignment, PositionCounts, Team, TeamShape};
