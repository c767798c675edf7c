//! Input validation for generation runs.
//!
//! Checks structural integrity of the roster and session rules before
//! generation. Detects:
//! - Duplicate or missing emails
//! - Rules referencing emails absent from the roster
//! - Contradictory rule bundles (forced position also forbidden,
//!   the same pair under must- and cannot-play-with)
//!
//! These checks are advisory, aimed at ingestion collaborators: the
//! engine itself never rejects input and degrades silently instead.

use crate::models::{Person, RuleSet};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two roster entries share the same email.
    DuplicateEmail,
    /// A roster entry has no email.
    MissingEmail,
    /// A rule references an email absent from the roster.
    UnknownRuleTarget,
    /// A rule bundle contradicts itself.
    ContradictoryRules,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster and its session rules.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(roster: &[Person], rules: &RuleSet) -> ValidationResult {
    let mut errors = Vec::new();

    let mut emails = HashSet::new();
    for person in roster {
        if person.email.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingEmail,
                format!("Roster entry '{}' has no email", person.name),
            ));
            continue;
        }
        if !emails.insert(person.email.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEmail,
                format!("Duplicate roster email: {}", person.email),
            ));
        }
    }

    let mut rule_emails: Vec<&str> = rules.emails().collect();
    rule_emails.sort_unstable();
    for email in rule_emails {
        if !emails.contains(email) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRuleTarget,
                format!("Rule references unknown email '{email}'"),
            ));
        }
        let Some(bundle) = rules.bundle(email) else { continue };
        if let Some(forced) = bundle.forced {
            if bundle.forbidden.contains(&forced) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ContradictoryRules,
                    format!("'{email}' is both forced to and forbidden from {forced}"),
                ));
            }
        }
        for partner in bundle.must_with.intersection(&bundle.cannot_with) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ContradictoryRules,
                format!("'{email}' must and cannot play with '{partner}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
