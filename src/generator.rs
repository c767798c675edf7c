//! Greedy team generation.
//!
//! # Algorithm
//!
//! 1. Plan team shapes from the roster size (`planner::plan`).
//! 2. Shuffle a copy of the roster with the run RNG to avoid
//!    ingestion-order bias.
//! 3. Fill teams in shape order (7 → 6 → 5), slots in template order.
//!    Each slot runs a strict ranking pass over the remaining pool; if
//!    nobody qualifies, a relaxed pass drops the protected lock, the
//!    fatigue cutoff and the female-distribution gate (never the
//!    female-in-middle rule). The minimal-cost candidate wins, ties
//!    broken uniformly at random.
//! 4. A slot with no eligible candidate after both passes stays
//!    unfilled; leftovers are appended as `outside` to whichever team
//!    has the fewest members.
//!
//! # Complexity
//! O(teams × slots × rosterSize) for the fill phase.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{FairnessHistory, Person, PlayerAssignment, Position, RuleSet, Team};
use crate::planner;
use crate::ranking::{rank_for_slot, RankContext};

/// Greedy team generator.
///
/// Owns no state across runs; fairness history and session rules are
/// immutable inputs supplied by collaborators before the call. A seed
/// makes tie-breaking reproducible; without one the RNG is OS-seeded
/// and runs differ.
///
/// # Example
/// ```
/// use teamgen::generator::TeamGenerator;
/// use teamgen::models::{Person, Position};
///
/// let roster: Vec<Person> = (0..12)
///     .map(|i| {
///         Person::new(format!("P{i}"), format!("p{i}@club.org"))
///             .with_prefs(Some(Position::Outside), None, None)
///     })
///     .collect();
///
/// let teams = TeamGenerator::new().with_seed(42).generate(&roster);
/// assert_eq!(teams.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TeamGenerator {
    seed: Option<u64>,
    fairness: FairnessHistory,
    rules: RuleSet,
}

impl TeamGenerator {
    /// Creates a generator with empty fairness history and no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-break seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the fairness history input.
    pub fn with_fairness(mut self, fairness: FairnessHistory) -> Self {
        self.fairness = fairness;
        self
    }

    /// Sets the session rules (forced positions and protection flags are
    /// consulted during ranking; the rest belongs to the repair pass).
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Generates a fresh team list for the roster.
    pub fn generate(&self, roster: &[Person]) -> Vec<Team> {
        if roster.is_empty() {
            return Vec::new();
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut pool: Vec<Person> = roster.to_vec();
        pool.shuffle(&mut rng);

        let shapes = planner::plan(roster.len());
        let mut teams: Vec<Team> = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| Team::from_shape(i + 1, shape.clone()))
            .collect();

        let team_count = teams.len();
        let total_females = roster.iter().filter(|p| p.is_female()).count();

        for t_idx in 0..team_count {
            let slots: Vec<Position> = teams[t_idx].shape.slots().to_vec();
            for pos in slots {
                let teams_with_female = teams.iter().filter(|t| t.has_female()).count();
                let ctx = RankContext {
                    team_has_female: teams[t_idx].has_female(),
                    female_distributed: teams_with_female >= team_count.min(total_females),
                    relaxed: false,
                };

                let mut picked = self.pick_best(&pool, pos, ctx, &mut rng);
                if picked.is_none() {
                    picked = self.pick_best(
                        &pool,
                        pos,
                        RankContext { relaxed: true, ..ctx },
                        &mut rng,
                    );
                }

                // Deliberate best-effort fallback: an unfillable slot is
                // left open rather than aborting the run.
                let Some(pool_idx) = picked else { continue };
                let person = pool.remove(pool_idx);
                teams[t_idx].players.push(PlayerAssignment::new(person, pos));
            }

            if teams[t_idx].size == 7 && !teams[t_idx].players.is_empty() {
                teams[t_idx].extra_player_index = Some(teams[t_idx].players.len() - 1);
            }
        }

        // Exact shape accounting normally consumes the whole pool; any
        // survivor joins the thinnest team as outside.
        while let Some(person) = pool.pop() {
            let Some(t_idx) = (0..team_count)
                .min_by_key(|&i| teams[i].real_player_count())
            else {
                break;
            };
            teams[t_idx]
                .players
                .push(PlayerAssignment::new(person, Position::Outside));
            if teams[t_idx].size == 7 {
                teams[t_idx].extra_player_index = Some(teams[t_idx].players.len() - 1);
            }
        }

        teams
    }

    /// Ranks every pool candidate for the slot and returns the index of
    /// the minimal-cost one, random among equals.
    fn pick_best(
        &self,
        pool: &[Person],
        pos: Position,
        ctx: RankContext,
        rng: &mut SmallRng,
    ) -> Option<usize> {
        pool.iter()
            .enumerate()
            .filter_map(|(i, person)| {
                rank_for_slot(person, pos, ctx, &self.fairness, &self.rules)
                    .map(|cost| (cost, rng.random::<u64>(), i))
            })
            .min()
            .map(|(_, _, i)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, SessionRule};

    fn outside(i: usize) -> Person {
        Person::new(format!("P{i}"), format!("p{i}@club.org"))
            .with_prefs(Some(Position::Outside), None, None)
    }

    fn with_pref(i: usize, pos: Position) -> Person {
        Person::new(format!("P{i}"), format!("p{i}@club.org"))
            .with_prefs(Some(pos), None, None)
    }

    fn position_count(team: &Team, pos: Position) -> usize {
        team.players.iter().filter(|pa| pa.position == pos).count()
    }

    #[test]
    fn test_empty_roster() {
        assert!(TeamGenerator::new().generate(&[]).is_empty());
    }

    #[test]
    fn test_twelve_all_outside() {
        // 2 teams of 6; setter and both middles backfilled from
        // outside-preference people, 3 kept at outside per team.
        let roster: Vec<Person> = (0..12).map(outside).collect();
        let teams = TeamGenerator::new().with_seed(7).generate(&roster);

        assert_eq!(teams.len(), 2);
        for team in &teams {
            assert_eq!(team.real_player_count(), 6);
            assert_eq!(position_count(team, Position::Setter), 1);
            assert_eq!(position_count(team, Position::Middle), 2);
            assert_eq!(position_count(team, Position::Outside), 3);
            assert_eq!(team.missing, None);
        }
    }

    #[test]
    fn test_seventeen_marks_missing_middle() {
        let roster: Vec<Person> = (0..17).map(outside).collect();
        let teams = TeamGenerator::new().with_seed(1).generate(&roster);

        assert_eq!(teams.len(), 3);
        let mut counts: Vec<usize> = teams.iter().map(|t| t.real_player_count()).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![5, 6, 6]);

        let short = teams.iter().find(|t| t.size == 5).unwrap();
        assert_eq!(short.missing, Some(Position::Middle));
        assert_eq!(position_count(short, Position::Middle), 1);
    }

    #[test]
    fn test_thirteen_extra_player_marked() {
        let roster: Vec<Person> = (0..13).map(outside).collect();
        let teams = TeamGenerator::new().with_seed(3).generate(&roster);

        assert_eq!(teams.len(), 2);
        let seven = teams.iter().find(|t| t.size == 7).unwrap();
        assert_eq!(seven.real_player_count(), 7);
        assert_eq!(seven.extra_player_index, Some(6));
        let six = teams.iter().find(|t| t.size == 6).unwrap();
        assert_eq!(six.extra_player_index, None);
    }

    #[test]
    fn test_no_female_middle_unless_true_middle() {
        let mut roster: Vec<Person> = (0..9).map(outside).collect();
        roster.push(
            Person::new("F1", "f1@club.org")
                .with_gender(Gender::Female)
                .with_prefs(Some(Position::Outside), Some(Position::Middle), None),
        );
        roster.push(
            Person::new("F2", "f2@club.org")
                .with_gender(Gender::Female)
                .with_prefs(Some(Position::Middle), None, None),
        );
        roster.push(
            Person::new("F3", "f3@club.org")
                .with_gender(Gender::Female)
                .with_prefs(Some(Position::Outside), None, None),
        );

        for seed in 0..20 {
            let teams = TeamGenerator::new().with_seed(seed).generate(&roster);
            for team in &teams {
                for pa in &team.players {
                    if pa.person.is_female() && pa.position == Position::Middle {
                        assert_eq!(pa.person.pref1, Some(Position::Middle));
                    }
                }
            }
        }
    }

    #[test]
    fn test_females_spread_before_doubling() {
        // The two females are the only setter-preference people, so each
        // team's setter slot pulls one in; the distribution gate then
        // keeps the second one off the first team's remaining slots.
        let mut roster: Vec<Person> = (0..10).map(outside).collect();
        roster.push(
            Person::new("F1", "f1@club.org")
                .with_gender(Gender::Female)
                .with_prefs(Some(Position::Setter), None, None),
        );
        roster.push(
            Person::new("F2", "f2@club.org")
                .with_gender(Gender::Female)
                .with_prefs(Some(Position::Setter), None, None),
        );

        for seed in 0..20 {
            let teams = TeamGenerator::new().with_seed(seed).generate(&roster);
            // 2 teams, 2 females → each team gets exactly one.
            for team in &teams {
                let females = team.players.iter().filter(|pa| pa.person.is_female()).count();
                assert_eq!(females, 1, "seed={seed}");
            }
        }
    }

    #[test]
    fn test_everyone_placed_exactly_once() {
        let roster: Vec<Person> = (0..23).map(|i| with_pref(i, match i % 3 {
            0 => Position::Setter,
            1 => Position::Middle,
            _ => Position::Outside,
        })).collect();

        let teams = TeamGenerator::new().with_seed(11).generate(&roster);
        let mut emails: Vec<String> = teams
            .iter()
            .flat_map(|t| t.emails().map(String::from))
            .collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 23);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let roster: Vec<Person> = (0..18).map(|i| with_pref(i, match i % 3 {
            0 => Position::Setter,
            1 => Position::Middle,
            _ => Position::Outside,
        })).collect();

        let gen = TeamGenerator::new().with_seed(99);
        let a = gen.generate(&roster);
        let b = gen.generate(&roster);
        assert_eq!(a, b);
    }

    #[test]
    fn test_protected_player_stays_on_first_pref() {
        let mut roster: Vec<Person> = (0..11).map(|i| with_pref(i, Position::Outside)).collect();
        roster.push(with_pref(11, Position::Setter));
        let email = roster[11].email.clone();

        let rules = RuleSet::from_rules(&[SessionRule::keep_first_preference(&email)]);
        for seed in 0..10 {
            let teams = TeamGenerator::new()
                .with_seed(seed)
                .with_rules(rules.clone())
                .generate(&roster);
            let placed = teams
                .iter()
                .flat_map(|t| t.players.iter())
                .find(|pa| pa.person.email == email)
                .unwrap();
            assert_eq!(placed.position, Position::Setter, "seed={seed}");
        }
    }

    #[test]
    fn test_true_middles_win_middle_slots() {
        // 4 true middles for 12 people: both teams should use them
        // before backfilling.
        let mut roster: Vec<Person> = (0..8).map(outside).collect();
        for i in 8..12 {
            roster.push(with_pref(i, Position::Middle));
        }

        let teams = TeamGenerator::new().with_seed(5).generate(&roster);
        for team in &teams {
            let true_middles = team
                .players
                .iter()
                .filter(|pa| {
                    pa.position == Position::Middle && pa.person.pref1 == Some(Position::Middle)
                })
                .count();
            assert_eq!(true_middles, 2);
        }
    }
}
