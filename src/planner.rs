//! Template planning.
//!
//! Decides, from the roster size alone, how many teams to form and the
//! positional shape of each. Pure and total for all n ≥ 0.
//!
//! # Remainder rules (r = n mod 6)
//!
//! - r = 0: n/6 standard 6-slot teams.
//! - r ∈ {1, 2}: r 7-slot shapes, then standard shapes up to floor(n/6)
//!   teams.
//! - r ∈ {3, 4, 5}: {3, 2, 1} 5-slot shapes (short one middle) after
//!   standard shapes, ceil(n/6) teams in all.
//!
//! No shape ever has fewer than 5 or more than 7 slots.

use crate::models::TeamShape;

/// Plans team shapes for a roster of `n` people.
///
/// Shapes are returned in fill order: 7-slot before 6-slot before
/// 5-slot. `n = 0` yields an empty plan.
pub fn plan(n: usize) -> Vec<TeamShape> {
    if n == 0 {
        return Vec::new();
    }

    let r = n % 6;
    match r {
        0 => (0..n / 6).map(|_| TeamShape::standard()).collect(),
        1 | 2 => {
            let total = n / 6;
            let mut shapes: Vec<TeamShape> = (0..r).map(|_| TeamShape::extended()).collect();
            shapes.extend((0..total.saturating_sub(r)).map(|_| TeamShape::standard()));
            shapes
        }
        _ => {
            let total = n.div_ceil(6);
            let five = 6 - r; // r=3 → 3 short, r=4 → 2, r=5 → 1
            let mut shapes: Vec<TeamShape> = (0..total.saturating_sub(five))
                .map(|_| TeamShape::standard())
                .collect();
            shapes.extend((0..five).map(|_| TeamShape::short()));
            shapes
        }
    }
}
