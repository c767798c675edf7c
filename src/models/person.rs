//! Roster person model.
//!
//! A person is a roster entry with a display name, a stable email
//! identifier, an optional gender, and up to three ranked position
//! preferences. Records are constructed once per ingestion event and
//! stay immutable for the duration of a generation run.

use serde::{Deserialize, Serialize};

/// A court position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Setter,
    Middle,
    Outside,
}

impl Position {
    /// Parses a position string.
    ///
    /// Case-insensitive; the `oppo` synonym maps to `Outside`. Unknown or
    /// empty strings yield `None` rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "setter" => Some(Self::Setter),
            "middle" => Some(Self::Middle),
            "outside" | "oppo" => Some(Self::Outside),
            _ => None,
        }
    }

    /// Lowercase label as written in assignment records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setter => "setter",
            Self::Middle => "middle",
            Self::Outside => "outside",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster gender field.
///
/// Only `f` carries engine semantics (female-in-middle rule, one-female
/// distribution). Anything unrecognized is `Unspecified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    /// Parses a gender string; unknown values become `Unspecified`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" => Self::Male,
            "f" => Self::Female,
            _ => Self::Unspecified,
        }
    }

    /// Lowercase label as written in roster records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "f",
            Self::Unspecified => "",
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        g.as_str().to_string()
    }
}

/// A roster person.
///
/// The email is the true primary key and is lowercased at construction;
/// the name is display-only and may collide across people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Stable identifier, normalized lowercase.
    pub email: String,
    /// Gender field.
    #[serde(default)]
    pub gender: Gender,
    /// First position preference.
    #[serde(default)]
    pub pref1: Option<Position>,
    /// Second position preference.
    #[serde(default)]
    pub pref2: Option<Position>,
    /// Third position preference.
    #[serde(default)]
    pub pref3: Option<Position>,
}

impl Person {
    /// Creates a person with a normalized email and no preferences.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            gender: Gender::Unspecified,
            pref1: None,
            pref2: None,
            pref3: None,
        }
    }

    /// Sets the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Sets the ranked preferences in order.
    pub fn with_prefs(
        mut self,
        pref1: Option<Position>,
        pref2: Option<Position>,
        pref3: Option<Position>,
    ) -> Self {
        self.pref1 = pref1;
        self.pref2 = pref2;
        self.pref3 = pref3;
        self
    }

    /// Whether the gender field is `f`.
    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }

    /// 1-based rank of `pos` in the stated preferences, if present.
    pub fn pref_rank(&self, pos: Position) -> Option<u8> {
        if self.pref1 == Some(pos) {
            Some(1)
        } else if self.pref2 == Some(pos) {
            Some(2)
        } else if self.pref3 == Some(pos) {
            Some(3)
        } else {
            None
        }
    }

    /// Whether all three preferences are exactly `pos`.
    pub fn all_prefs(&self, pos: Position) -> bool {
        self.pref1 == Some(pos) && self.pref2 == Some(pos) && self.pref3 == Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse() {
        assert_eq!(Position::parse("setter"), Some(Position::Setter));
        assert_eq!(Position::parse(" Middle "), Some(Position::Middle));
        assert_eq!(Position::parse("OPPO"), Some(Position::Outside));
        assert_eq!(Position::parse("libero"), None);
        assert_eq!(Position::parse(""), None);
    }

    #[test]
    fn test_gender_parse_lenient() {
        assert_eq!(Gender::parse("F"), Gender::Female);
        assert_eq!(Gender::parse("m"), Gender::Male);
        assert_eq!(Gender::parse("x"), Gender::Unspecified);
        assert_eq!(Gender::parse(""), Gender::Unspecified);
    }

    #[test]
    fn test_email_normalized() {
        let p = Person::new("Ana", "  Ana.Silva@Example.COM ");
        assert_eq!(p.email, "ana.silva@example.com");
    }

    #[test]
    fn test_pref_rank() {
        let p = Person::new("A", "a@x").with_prefs(
            Some(Position::Middle),
            Some(Position::Setter),
            None,
        );
        assert_eq!(p.pref_rank(Position::Middle), Some(1));
        assert_eq!(p.pref_rank(Position::Setter), Some(2));
        assert_eq!(p.pref_rank(Position::Outside), None);
    }

    #[test]
    fn test_all_prefs() {
        let p = Person::new("A", "a@x").with_prefs(
            Some(Position::Outside),
            Some(Position::Outside),
            Some(Position::Outside),
        );
        assert!(p.all_prefs(Position::Outside));
        assert!(!p.all_prefs(Position::Setter));
    }
}
