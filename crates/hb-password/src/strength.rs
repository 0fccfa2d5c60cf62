//! Password strength scoring
//!
//! Score is the number of satisfied checks, capped at 4:
//! length ≥ 8, length ≥ 12, mixed case, a digit, a special character.

use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_LENGTH: usize = 8;
const STRONG_LENGTH: usize = 12;
const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Password policy requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Requirement {
    /// At least eight characters
    MinLength,
    /// An ASCII upper-case letter
    Uppercase,
    /// An ASCII lower-case letter
    Lowercase,
    /// An ASCII digit
    Number,
    /// A punctuation character from the allowed set
    Special,
}

impl Requirement {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinLength => "minLength",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Number => "number",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength label for a 0..=4 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrengthLabel {
    /// Score 0
    VeryWeak,
    /// Score 1
    Weak,
    /// Score 2
    Medium,
    /// Score 3
    Strong,
    /// Score 4
    VeryStrong,
}

impl StrengthLabel {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "veryWeak",
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
            Self::VeryStrong => "veryStrong",
        }
    }

    /// Label for a score; anything above 4 is `VeryStrong`
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Medium,
            3 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// 0 (very weak) to 4 (very strong)
    pub score: u8,
    /// Label for the score
    pub label: StrengthLabel,
    /// Unmet requirements, in policy order
    pub feedback: Vec<Requirement>,
}

/// Policy validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    /// Every requirement is met
    pub is_valid: bool,
    /// Unmet requirements
    pub errors: Vec<Requirement>,
    /// Strength report for the same password
    pub strength: PasswordStrength,
}

#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
struct Checks {
    length: bool,
    length_strong: bool,
    uppercase: bool,
    lowercase: bool,
    number: bool,
    special: bool,
}

impl Checks {
    fn run(password: &str) -> Self {
        let len = password.chars().count();
        Self {
            length: len >= MIN_LENGTH,
            length_strong: len >= STRONG_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        }
    }

    fn unmet(self) -> Vec<Requirement> {
        [
            (self.length, Requirement::MinLength),
            (self.uppercase, Requirement::Uppercase),
            (self.lowercase, Requirement::Lowercase),
            (self.number, Requirement::Number),
            (self.special, Requirement::Special),
        ]
        .into_iter()
        .filter_map(|(met, requirement)| (!met).then_some(requirement))
        .collect()
    }

    fn score(self) -> u8 {
        let raw = [
            self.length,
            self.length_strong,
            self.uppercase && self.lowercase,
            self.number,
            self.special,
        ]
        .into_iter()
        .map(u8::from)
        .sum::<u8>();
        raw.min(4)
    }
}

/// Score a password
#[must_use]
pub fn check_strength(password: &str) -> PasswordStrength {
    let checks = Checks::run(password);
    let score = checks.score();

    PasswordStrength {
        score,
        label: StrengthLabel::from_score(score),
        feedback: checks.unmet(),
    }
}

/// Validate a password against every requirement
///
/// Does not consult the breach database; see
/// [`PwnedChecker`](crate::pwned::PwnedChecker).
#[must_use]
pub fn validate_password(password: &str) -> PasswordValidation {
    let errors = Checks::run(password).unmet();

    PasswordValidation {
        is_valid: errors.is_empty(),
        errors,
        strength: check_strength(password),
    }
}

/// Compact breach count: `3.9M`, `12.5K`, `42`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_breach_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_password() {
        let strength = check_strength("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.label, StrengthLabel::VeryWeak);
        assert_eq!(
            strength.feedback,
            vec![
                Requirement::MinLength,
                Requirement::Uppercase,
                Requirement::Lowercase,
                Requirement::Number,
                Requirement::Special,
            ]
        );
    }

    #[test]
    fn score_ladder() {
        assert_eq!(check_strength("abcdefgh").score, 1);
        assert_eq!(check_strength("abcdefghijkl").score, 2);
        assert_eq!(check_strength("Abcdefghijkl").score, 3);
        assert_eq!(check_strength("Abcdefghijk1").score, 4);
        // Five checks pass, still capped
        assert_eq!(check_strength("Abcdefghij1!").score, 4);
    }

    #[test]
    fn mixed_case_needs_both() {
        let strength = check_strength("ABCDEFGH");
        assert_eq!(strength.score, 1);
        assert!(strength.feedback.contains(&Requirement::Lowercase));
        assert!(!strength.feedback.contains(&Requirement::Uppercase));
    }

    #[test]
    fn length_counts_characters() {
        // Eight characters, more than eight bytes
        let strength = check_strength("ééééééé1");
        assert!(!strength.feedback.contains(&Requirement::MinLength));
    }

    #[test]
    fn special_character_set() {
        for c in SPECIAL_CHARS.chars() {
            let password = format!("Abcdefg1{c}");
            assert!(validate_password(&password).is_valid, "{c} should count");
        }
        assert!(!validate_password("Abcdefg1~").is_valid);
        assert!(!validate_password("Abcdefg1 ").is_valid);
    }

    #[test]
    fn validation_errors_match_feedback() {
        let validation = validate_password("short");
        assert!(!validation.is_valid);
        assert_eq!(validation.errors, validation.strength.feedback);
    }

    #[test]
    fn breach_count_format() {
        assert_eq!(format_breach_count(0), "0");
        assert_eq!(format_breach_count(999), "999");
        assert_eq!(format_breach_count(1_000), "1.0K");
        assert_eq!(format_breach_count(12_345), "12.3K");
        assert_eq!(format_breach_count(3_861_493), "3.9M");
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(validate_password("x")).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0], "minLength");
        assert_eq!(json["strength"]["label"], "veryWeak");
    }
}
