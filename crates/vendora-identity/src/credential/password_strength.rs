//! Password strength evaluation using the zxcvbn algorithm.

use serde::{Deserialize, Serialize};
use zxcvbn::zxcvbn;

use crate::{Error, Result, TRACING_TARGET_CREDENTIAL};

/// Password strength evaluator using the zxcvbn algorithm.
#[derive(Debug, Clone)]
pub struct PasswordStrength {
    /// Minimum acceptable score (0-4).
    min_score: u8,
}

/// Result of password strength evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordStrengthResult {
    /// Score from 0 (weakest) to 4 (strongest).
    pub score: u8,
    /// Estimated guesses required to crack the password.
    pub guesses: u64,
    /// Warning message about password weaknesses.
    pub warning: Option<String>,
    /// Suggestions for improving the password.
    pub suggestions: Vec<String>,
}

impl PasswordStrength {
    /// Creates a new instance of a [`PasswordStrength`] service.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new password strength evaluator with custom minimum score.
    ///
    /// # Arguments
    ///
    /// * `min_score` - Minimum acceptable score (0-4, recommended: 3)
    #[inline]
    pub const fn with_min_score(min_score: u8) -> Self {
        Self { min_score }
    }

    /// Evaluates the strength of a password.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to evaluate
    /// * `user_inputs` - User-specific words to penalize (e.g., name, email)
    pub fn evaluate(&self, password: &str, user_inputs: &[&str]) -> PasswordStrengthResult {
        let entropy = zxcvbn(password, user_inputs);
        let score: u8 = entropy.score().into();

        let (warning, suggestions) = match entropy.feedback() {
            Some(feedback) => (
                feedback.warning().map(|w| w.to_string()),
                feedback
                    .suggestions()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            score = score,
            guesses = entropy.guesses(),
            "password strength evaluation completed"
        );

        PasswordStrengthResult {
            score,
            guesses: entropy.guesses(),
            warning,
            suggestions,
        }
    }

    /// Validates that a password meets the minimum strength requirement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WeakPassword`] with improvement suggestions when the
    /// password scores below the configured minimum.
    pub fn validate_password(&self, password: &str, user_inputs: &[&str]) -> Result<()> {
        let result = self.evaluate(password, user_inputs);

        if result.score < self.min_score {
            tracing::warn!(
                target: TRACING_TARGET_CREDENTIAL,
                score = result.score,
                min_score = self.min_score,
                "password validation failed: insufficient strength"
            );

            let mut parts = Vec::new();
            if let Some(warning) = result.warning {
                parts.push(warning);
            }
            if !result.suggestions.is_empty() {
                parts.push(result.suggestions.join("; "));
            }

            return Err(Error::WeakPassword {
                feedback: (!parts.is_empty()).then(|| parts.join(" ")),
            });
        }

        Ok(())
    }

    /// Checks if a password meets the minimum strength requirement.
    pub fn meets_requirements(&self, password: &str, user_inputs: &[&str]) -> bool {
        self.evaluate(password, user_inputs).score >= self.min_score
    }
}

impl Default for PasswordStrength {
    #[inline]
    fn default() -> Self {
        Self::with_min_score(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_password_scores_low() {
        let checker = PasswordStrength::new();
        let result = checker.evaluate("password", &[]);
        assert!(result.score < 3);
    }

    #[test]
    fn strong_password_passes() {
        let checker = PasswordStrength::new();
        assert!(checker.meets_requirements("kX9$mP2#vL5@wQ8!", &[]));
    }

    #[test]
    fn user_inputs_are_penalized() {
        let checker = PasswordStrength::new();
        let result = checker.evaluate("john1234", &["john", "smith"]);
        assert!(result.score < 3);
    }

    #[test]
    fn validate_reports_weak_password_with_feedback() {
        let checker = PasswordStrength::new();
        let result = checker.validate_password("password", &[]);
        assert!(matches!(result, Err(Error::WeakPassword { .. })));
    }

    #[test]
    fn custom_min_score() {
        let lenient = PasswordStrength::with_min_score(0);
        let strict = PasswordStrength::with_min_score(4);

        assert!(lenient.meets_requirements("password", &[]));
        assert!(!strict.meets_requirements("password123", &[]));
    }
}
