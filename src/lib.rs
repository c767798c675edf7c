//! Team assignment engine for recurring sport sessions.
//!
//! Partitions a roster into fixed-shape small teams subject to hard
//! rules (positional gender restriction), ranked position preferences,
//! a rolling fairness constraint over the last two finalized sessions,
//! and per-session social rules applied by a repair pass.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Person`, `Position`, `Team`,
//!   `TeamShape`, `FairnessHistory`, `SessionRule`, `RuleSet`
//! - **`planner`**: Team count and shape planning from the roster size
//! - **`ranking`**: Per-slot candidate eligibility and cost ranking
//! - **`generator`**: Greedy strict/relaxed two-pass team fill
//! - **`repair`**: Post-hoc soft-rule repair via targeted swaps
//! - **`validation`**: Input integrity checks (duplicate emails, rule
//!   references, contradictory bundles)
//!
//! # Architecture
//!
//! The crate is the assignment core only: CSV ingestion, spreadsheet
//! persistence and HTML rendering are external collaborators consuming
//! the `models` boundary contract. One generation run is synchronous,
//! single-threaded, and owns no state across runs; randomness is an
//! explicit seedable generator threaded through the fill.
//!
//! # Usage
//!
//! ```
//! use teamgen::generator::TeamGenerator;
//! use teamgen::models::{FairnessHistory, Person, Position, RuleSet, SessionRule};
//! use teamgen::repair::postprocess_teams;
//!
//! let roster: Vec<Person> = (0..12)
//!     .map(|i| {
//!         Person::new(format!("P{i}"), format!("p{i}@club.org"))
//!             .with_prefs(Some(Position::Outside), None, None)
//!     })
//!     .collect();
//!
//! let rules = RuleSet::from_rules(&[SessionRule::forced("p0@club.org", Position::Setter)]);
//! let fairness = FairnessHistory::new();
//!
//! let mut teams = TeamGenerator::new()
//!     .with_seed(42)
//!     .with_fairness(fairness.clone())
//!     .with_rules(rules.clone())
//!     .generate(&roster);
//! postprocess_teams(&mut teams, &rules, &fairness);
//!
//! assert_eq!(teams.len(), 2);
//! ```

pub mod generator;
pub mod models;
pub mod planner;
pub mod ranking;
pub mod repair;
pub mod validation;
