//! Team and template models.
//!
//! A `TeamShape` is the positional template decided by the planner; a
//! `Team` is the filled (or partially filled) result of one generation
//! run. Teams are the engine's only output and carry the denormalized
//! query fields collaborators need for rendering and persistence.

use serde::{Deserialize, Serialize};

use super::{Person, Position};

/// An ordered sequence of position slots for one team.
///
/// Never fewer than 5 or more than 7 slots; fixed at planning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamShape {
    slots: Vec<Position>,
}

impl TeamShape {
    /// Standard 6-slot shape: setter, middle, middle, outside ×3.
    pub fn standard() -> Self {
        Self {
            slots: vec![
                Position::Setter,
                Position::Middle,
                Position::Middle,
                Position::Outside,
                Position::Outside,
                Position::Outside,
            ],
        }
    }

    /// 7-slot shape: standard plus a fourth outside.
    pub fn extended() -> Self {
        let mut shape = Self::standard();
        shape.slots.push(Position::Outside);
        shape
    }

    /// 5-slot shape: standard minus one middle.
    ///
    /// Every 5-member team is short by exactly one middle, never another
    /// position.
    pub fn short() -> Self {
        Self {
            slots: vec![
                Position::Setter,
                Position::Middle,
                Position::Outside,
                Position::Outside,
                Position::Outside,
            ],
        }
    }

    /// Slots in template order.
    pub fn slots(&self) -> &[Position] {
        &self.slots
    }

    /// Number of slots (5, 6 or 7).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the shape has no slots (never true for planned shapes).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Required count per position for this shape.
    pub fn capacity(&self) -> PositionCounts {
        let mut counts = PositionCounts::default();
        for pos in &self.slots {
            match pos {
                Position::Setter => counts.setter += 1,
                Position::Middle => counts.middle += 1,
                Position::Outside => counts.outside += 1,
            }
        }
        counts
    }
}

/// Per-position slot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionCounts {
    pub setter: usize,
    pub middle: usize,
    pub outside: usize,
}

/// A person placed at a position within a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAssignment {
    pub person: Person,
    pub position: Position,
}

impl PlayerAssignment {
    /// Creates an assignment.
    pub fn new(person: Person, position: Position) -> Self {
        Self { person, position }
    }
}

/// A filled team.
///
/// Invariant: the number of assignments never exceeds the shape's slot
/// count. The only intentionally short team size is 5, always missing
/// exactly one middle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Sequential team id (1-based).
    pub id: usize,
    /// Shape slot count (5, 6 or 7).
    pub size: usize,
    /// The positional template this team was filled against.
    pub shape: TeamShape,
    /// Placed players in fill order.
    pub players: Vec<PlayerAssignment>,
    /// Set to `Middle` for intentionally short (5-slot) teams.
    pub missing: Option<Position>,
    /// Index of the 7th player in `players`, for display emphasis.
    pub extra_player_index: Option<usize>,
    /// Required setter/middle/outside counts for the shape.
    pub capacity: PositionCounts,
}

impl Team {
    /// Creates an empty team from a planned shape.
    pub fn from_shape(id: usize, shape: TeamShape) -> Self {
        let capacity = shape.capacity();
        let size = shape.len();
        Self {
            id,
            size,
            shape,
            players: Vec::new(),
            missing: if size == 5 { Some(Position::Middle) } else { None },
            extra_player_index: None,
            capacity,
        }
    }

    /// Number of placed players.
    pub fn real_player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether any placed player is female.
    pub fn has_female(&self) -> bool {
        self.players.iter().any(|pa| pa.person.is_female())
    }

    /// Emails of placed players, in fill order.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|pa| pa.person.email.as_str())
    }

    /// Whether the given email is placed on this team.
    pub fn contains(&self, email: &str) -> bool {
        self.players.iter().any(|pa| pa.person.email == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn test_shape_capacities() {
        assert_eq!(
            TeamShape::standard().capacity(),
            PositionCounts { setter: 1, middle: 2, outside: 3 }
        );
        assert_eq!(
            TeamShape::extended().capacity(),
            PositionCounts { setter: 1, middle: 2, outside: 4 }
        );
        assert_eq!(
            TeamShape::short().capacity(),
            PositionCounts { setter: 1, middle: 1, outside: 3 }
        );
    }

    #[test]
    fn test_short_team_marked_missing_middle() {
        let team = Team::from_shape(1, TeamShape::short());
        assert_eq!(team.size, 5);
        assert_eq!(team.missing, Some(Position::Middle));

        let full = Team::from_shape(2, TeamShape::standard());
        assert_eq!(full.missing, None);
    }

    #[test]
    fn test_has_female() {
        let mut team = Team::from_shape(1, TeamShape::standard());
        assert!(!team.has_female());
        team.players.push(PlayerAssignment::new(
            Person::new("Ana", "ana@x").with_gender(Gender::Female),
            Position::Outside,
        ));
        assert!(team.has_female());
    }

    #[test]
    fn test_team_json_contract() {
        // Rendering/persistence collaborators consume this shape.
        let mut team = Team::from_shape(1, TeamShape::short());
        team.players.push(PlayerAssignment::new(
            Person::new("Ana", "ana@x").with_prefs(Some(Position::Setter), None, None),
            Position::Setter,
        ));

        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["size"], 5);
        assert_eq!(json["missing"], "middle");
        assert_eq!(json["players"][0]["position"], "setter");
        assert_eq!(json["players"][0]["person"]["email"], "ana@x");
        assert_eq!(json["capacity"]["middle"], 1);
    }

    #[test]
    fn test_contains_by_email() {
        let mut team = Team::from_shape(1, TeamShape::standard());
        team.players.push(PlayerAssignment::new(
            Person::new("Bo", "bo@x"),
            Position::Setter,
        ));
        assert!(team.contains("bo@x"));
        assert!(!team.contains("cy@x"));
    }
}
