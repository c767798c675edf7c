//! Per-slot candidate ranking.
//!
//! Given a candidate, a target slot and contextual flags, either declares
//! the candidate ineligible or returns a totally ordered cost tuple.
//! Lower cost = better candidate; the generator sorts ascending and
//! breaks remaining ties uniformly at random.
//!
//! # Eligibility (strict pass)
//!
//! - A female may occupy `middle` only when her effective first
//!   preference (forced position, else pref1) is `middle`. Never relaxed.
//! - A protected or forced person may only take their effective first
//!   preference.
//! - A person off-pref in both of the last two finals is excluded from
//!   `middle` backfill (fatigue cutoff).
//! - While some team still has no female, a female is excluded from a
//!   team that already has one.
//! - A true middle (pref1 = middle) is excluded from `setter` unless
//!   pref2 is explicitly `setter`.
//!
//! The relaxed pass drops everything except the female-in-middle rule.

use crate::models::{FairnessHistory, Person, Position, RuleSet};

/// Shared preference rank for every eligible `middle` backfill candidate.
///
/// Backfill willingness is deliberately uniform: candidates are not
/// differentiated by how far down their list `middle` appears.
const BACKFILL_RANK: u8 = 4;

/// Preference rank for a placement outside the stated preferences.
const UNRANKED_RANK: u8 = 5;

/// Extra penalty for sacrificing someone already off-pref recently.
const REPEAT_SACRIFICE_PENALTY: u8 = 3;

/// Penalty for converting a true middle into a setter, even when allowed.
const MIDDLE_TO_SETTER_PENALTY: u8 = 1;

/// Ascending-is-better cost tuple for one (candidate, slot) pairing.
///
/// Field order carries the lexicographic comparison: preference first,
/// then fairness, then the special penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotCost {
    /// 0 = forced/boosted exact match, 1..=3 = stated preference,
    /// 4 = middle backfill, 5 = unranked.
    pub preference: u8,
    /// Penalty for placing the candidate off their first preference,
    /// scaled by how often it happened recently.
    pub fairness: u8,
    /// Last-resort discriminator among otherwise-equal candidates.
    pub special: u8,
}

/// Contextual flags for one slot evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankContext {
    /// Whether the target team already has a female.
    pub team_has_female: bool,
    /// Whether every team has received its fair share of females.
    pub female_distributed: bool,
    /// Whether this is the relaxed second pass.
    pub relaxed: bool,
}

/// Ranks a candidate for a slot, or returns `None` if ineligible.
pub fn rank_for_slot(
    person: &Person,
    pos: Position,
    ctx: RankContext,
    fairness: &FairnessHistory,
    rules: &RuleSet,
) -> Option<SlotCost> {
    let email = person.email.as_str();
    let forced = rules.forced(email);
    let effective_first = forced.or(person.pref1);
    let off_count = fairness.off_pref_count(email);
    let going_off = person.pref1 != Some(pos);

    // Hard rule, never relaxed: female in middle only as a true middle.
    if pos == Position::Middle && person.is_female() && effective_first != Some(Position::Middle) {
        return None;
    }

    if !ctx.relaxed {
        // Protected or forced players stay at their effective first pref.
        if (rules.is_protected(email) || forced.is_some()) && effective_first != Some(pos) {
            return None;
        }

        // Fatigue cutoff: no middle backfill for someone sacrificed in
        // both of the last two finals.
        if pos == Position::Middle && going_off && off_count >= 2 {
            return None;
        }

        // One female per team until every team has its share.
        if person.is_female() && ctx.team_has_female && !ctx.female_distributed {
            return None;
        }

        // Keep true middles out of setter slots unless they opted in.
        if pos == Position::Setter
            && forced != Some(pos)
            && person.pref1 == Some(Position::Middle)
            && person.pref2 != Some(Position::Setter)
        {
            return None;
        }
    }

    let preference = if forced == Some(pos) {
        0
    } else if pos == Position::Setter && person.all_prefs(Position::Setter) {
        0
    } else if pos == Position::Middle && person.pref1 != Some(Position::Middle) {
        // Uniform backfill tier: a stated pref2/pref3 middle ranks no
        // better than no stated middle at all.
        BACKFILL_RANK
    } else if let Some(rank) = person.pref_rank(pos) {
        rank
    } else {
        UNRANKED_RANK
    };

    let mut fairness_penalty = 0;
    if going_off {
        fairness_penalty += off_count * 2;
        if off_count >= 1 && !ctx.relaxed {
            fairness_penalty += REPEAT_SACRIFICE_PENALTY;
        }
    }

    let special = if pos == Position::Setter
        && person.pref1 == Some(Position::Middle)
        && person.pref2 == Some(Position::Setter)
    {
        MIDDLE_TO_SETTER_PENALTY
    } else {
        0
    };

    Some(SlotCost {
        preference,
        fairness: fairness_penalty,
        special,
    })
}
