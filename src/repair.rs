//! Constraint repair over a completed assignment.
//!
//! Applies per-session soft rules on top of generated teams through
//! targeted swaps. Four phases run in a fixed order: forced positions,
//! forbidden positions, must-play-with, cannot-play-with. Every phase is
//! best-effort — an unsatisfiable rule is skipped silently — and no phase
//! ever changes a team's player count, only identity and position
//! assignments.
//!
//! Cross-team moves go through an email → (team, slot) index rebuilt
//! after each structural change, so swaps never alias stale locations.

use std::collections::HashMap;

use crate::models::{FairnessHistory, Person, Position, RuleSet, Team};

/// Applies all four soft-rule phases to the teams, in order.
///
/// Pairing rules are processed once per unordered pair, anchored on the
/// lexicographically smaller email. Rules referencing emails absent from
/// the teams are skipped.
pub fn postprocess_teams(teams: &mut [Team], rules: &RuleSet, fairness: &FairnessHistory) {
    let emails = sorted_rule_emails(rules);
    apply_forced_positions(teams, rules, fairness, &emails);
    apply_forbidden_positions(teams, rules, fairness, &emails);
    apply_must_play_with(teams, rules, fairness, &emails);
    apply_cannot_play_with(teams, rules, &emails);
}

/// Rule emails in a fixed order, so repair stays deterministic.
fn sorted_rule_emails(rules: &RuleSet) -> Vec<String> {
    let mut emails: Vec<String> = rules.emails().map(String::from).collect();
    emails.sort();
    emails
}

/// Email → (team index, slot index) for every placed player.
fn locate_players(teams: &[Team]) -> HashMap<String, (usize, usize)> {
    let mut index = HashMap::new();
    for (ti, team) in teams.iter().enumerate() {
        for (si, pa) in team.players.iter().enumerate() {
            index.insert(pa.person.email.clone(), (ti, si));
        }
    }
    index
}

/// Exchanges the people in two slots; positions stay with their slots.
fn swap_people(teams: &mut [Team], a: (usize, usize), b: (usize, usize)) {
    let person_a = teams[a.0].players[a.1].person.clone();
    let person_b = teams[b.0].players[b.1].person.clone();
    teams[a.0].players[a.1].person = person_b;
    teams[b.0].players[b.1].person = person_a;
}

/// Whether placing this person at `pos` respects the female-in-middle
/// hard rule. Repair must uphold it the same way generation does.
fn placement_allowed(person: &Person, pos: Position, rules: &RuleSet) -> bool {
    pos != Position::Middle
        || !person.is_female()
        || rules.forced(&person.email).or(person.pref1) == Some(Position::Middle)
}

/// Phase 1: move each forced person to a slot at their forced position,
/// swapping with the safest same-position occupant across all teams.
/// Falls back to rewriting the person's own slot when no swap is safe.
fn apply_forced_positions(
    teams: &mut [Team],
    rules: &RuleSet,
    fairness: &FairnessHistory,
    emails: &[String],
) {
    for email in emails {
        let Some(forced) = rules.forced(email) else { continue };
        let index = locate_players(teams);
        let Some(&(ti, si)) = index.get(email) else { continue };
        let current = teams[ti].players[si].position;
        if current == forced {
            continue;
        }

        let mut best: Option<(u8, (usize, usize))> = None;
        for (tj, team) in teams.iter().enumerate() {
            for (sj, pa) in team.players.iter().enumerate() {
                if (tj, sj) == (ti, si) || pa.position != forced {
                    continue;
                }
                let cand = &pa.person;
                // The displaced occupant takes the vacated position; their
                // own forced rule must not pin them where they are.
                if let Some(cand_forced) = rules.forced(&cand.email) {
                    if cand_forced != current {
                        continue;
                    }
                }
                if rules.is_forbidden(&cand.email, current) {
                    continue;
                }
                if !placement_allowed(cand, current, rules) {
                    continue;
                }
                let score = fairness.off_pref_count(&cand.email);
                if best.map_or(true, |(s, _)| score < s) {
                    best = Some((score, (tj, sj)));
                }
            }
        }

        match best {
            Some((_, target)) => swap_people(teams, (ti, si), target),
            // Last resort: force the position in place, breaking the
            // team's template balance.
            None => teams[ti].players[si].position = forced,
        }
    }
}

/// Phase 2: swap each person out of a forbidden position with a
/// same-team occupant of a different, non-conflicting position. Only
/// positions move, never team membership.
fn apply_forbidden_positions(
    teams: &mut [Team],
    rules: &RuleSet,
    fairness: &FairnessHistory,
    emails: &[String],
) {
    for email in emails {
        let Some(bundle) = rules.bundle(email) else { continue };
        if bundle.forbidden.is_empty() {
            continue;
        }
        let index = locate_players(teams);
        let Some(&(ti, si)) = index.get(email) else { continue };
        let vacated = teams[ti].players[si].position;
        if !bundle.forbidden.contains(&vacated) {
            continue;
        }

        let person = teams[ti].players[si].person.clone();
        let mut best: Option<((bool, u8), usize)> = None;
        for (sj, pa) in teams[ti].players.iter().enumerate() {
            if sj == si || pa.position == vacated {
                continue;
            }
            let cand = &pa.person;
            if bundle.forbidden.contains(&pa.position) {
                continue;
            }
            if rules.is_forbidden(&cand.email, vacated) {
                continue;
            }
            if rules.forced(&cand.email) == Some(pa.position) {
                continue;
            }
            if !placement_allowed(cand, vacated, rules) {
                continue;
            }
            if !placement_allowed(&person, pa.position, rules) {
                continue;
            }
            // For a vacated middle, a male occupant is preferred so the
            // slot keeps its widest candidate pool later.
            let key = (
                vacated == Position::Middle && cand.is_female(),
                fairness.off_pref_count(&cand.email),
            );
            if best.map_or(true, |(k, _)| key < k) {
                best = Some((key, sj));
            }
        }

        if let Some((_, sj)) = best {
            let taken = teams[ti].players[sj].position;
            teams[ti].players[sj].position = vacated;
            teams[ti].players[si].position = taken;
        }
    }
}

/// Phase 3: reunite each split must-play-with pair by swapping the
/// second person into the first person's team, same position for same
/// position.
fn apply_must_play_with(
    teams: &mut [Team],
    rules: &RuleSet,
    fairness: &FairnessHistory,
    emails: &[String],
) {
    for email in emails {
        let Some(bundle) = rules.bundle(email) else { continue };
        let mut partners: Vec<&String> = bundle.must_with.iter().collect();
        partners.sort();
        for partner in partners {
            // Each unordered pair fires once, anchored on the smaller email.
            if partner.as_str() <= email.as_str() {
                continue;
            }
            let index = locate_players(teams);
            let (Some(&(ta, _)), Some(&(tb, sb))) =
                (index.get(email.as_str()), index.get(partner.as_str()))
            else {
                continue;
            };
            if ta == tb {
                continue;
            }

            let partner_pos = teams[tb].players[sb].position;
            let mut best: Option<(u8, usize)> = None;
            for (sj, pa) in teams[ta].players.iter().enumerate() {
                if pa.position != partner_pos || pa.person.email == *email {
                    continue;
                }
                // Do not drag out someone whose own pairing anchors them here.
                if let Some(cand_bundle) = rules.bundle(&pa.person.email) {
                    if cand_bundle
                        .must_with
                        .iter()
                        .any(|m| teams[ta].contains(m))
                    {
                        continue;
                    }
                }
                let score = fairness.off_pref_count(&pa.person.email);
                if best.map_or(true, |(s, _)| score < s) {
                    best = Some((score, sj));
                }
            }

            if let Some((_, sj)) = best {
                swap_people(teams, (tb, sb), (ta, sj));
            }
        }
    }
}

/// Phase 4: split each cohabiting cannot-play-with pair by relocating
/// the second person to another team via a same-position swap, taking
/// the first team that offers a safe partner.
fn apply_cannot_play_with(teams: &mut [Team], rules: &RuleSet, emails: &[String]) {
    for email in emails {
        let Some(bundle) = rules.bundle(email) else { continue };
        let mut partners: Vec<&String> = bundle.cannot_with.iter().collect();
        partners.sort();
        for partner in partners {
            if partner.as_str() <= email.as_str() {
                continue;
            }
            let index = locate_players(teams);
            let (Some(&(ta, _)), Some(&(tb, sb))) =
                (index.get(email.as_str()), index.get(partner.as_str()))
            else {
                continue;
            };
            if ta != tb {
                continue;
            }

            let partner_bundle = rules.bundle(partner.as_str());
            let partner_pos = teams[tb].players[sb].position;
            let mut target: Option<(usize, usize)> = None;
            'scan: for (tj, team) in teams.iter().enumerate() {
                if tj == tb {
                    continue;
                }
                // The relocated person must not land next to anyone they
                // cannot play with.
                if let Some(pb) = partner_bundle {
                    if team
                        .players
                        .iter()
                        .any(|pa| pb.cannot_with.contains(&pa.person.email))
                    {
                        continue;
                    }
                }
                for (sj, pa) in team.players.iter().enumerate() {
                    if pa.position != partner_pos {
                        continue;
                    }
                    // The incoming occupant must not conflict with the
                    // partner's old team, nor leave their own pair behind.
                    if let Some(cand_bundle) = rules.bundle(&pa.person.email) {
                        let conflicts = teams[tb]
                            .players
                            .iter()
                            .enumerate()
                            .any(|(k, q)| k != sb && cand_bundle.cannot_with.contains(&q.person.email));
                        if conflicts {
                            continue;
                        }
                        if cand_bundle.must_with.iter().any(|m| team.contains(m)) {
                            continue;
                        }
                    }
                    target = Some((tj, sj));
                    break 'scan;
                }
            }

            if let Some(target) = target {
                swap_people(teams, (tb, sb), target);
            }
        }
    }
}
