//! Error types returned by rule checks, sweeps and configuration.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::report::Counterexample;

/// This enum contains all errors this library can return. Rule checks and sweeps return a [`Result<_, RuleError>`].
///
/// [`Result<_, RuleError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The solver found inputs on which the candidate check and the exact condition disagree.
    EquivalenceViolated {
        /// The rule whose assertion failed.
        rule: &'static str,
        /// The condition that was violated, e.g. `overflow`.
        condition: &'static str,
        /// The source-type width in bits at which the violation was found.
        type_bits: u32,
        /// The violating input assignment.
        counterexample: Counterexample,
    },
    /// The solver gave up without a verdict, usually because a timeout was hit.
    SolverUnknown {
        /// The rule whose assertion could not be decided.
        rule: &'static str,
        /// The condition that was being checked.
        condition: &'static str,
        /// The source-type width in bits.
        type_bits: u32,
        /// The reason reported by the solver.
        reason: String,
    },
    /// A width outside the supported set (multiples of 8 from 8 to 256) was requested.
    InvalidWidth {
        /// The rejected width.
        bits: u32,
        /// Why the width was rejected.
        reason: &'static str,
    },
    /// The configuration is inconsistent.
    InvalidConfig {
        /// Further specifies why the configuration was invalid.
        info: String,
    },
    /// No rule with the given name is registered in the bank.
    UnknownRule {
        /// The name that was looked up.
        name: String,
    },
}

impl RuleError {
    /// Returns true if this error reports a counterexample found by the solver.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::EquivalenceViolated { .. })
    }
}

impl Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::EquivalenceViolated {
                rule,
                condition,
                type_bits,
                counterexample,
            } => {
                write!(
                    f,
                    "Rule {} violated at {} bits: {} check disagrees with the exact condition for {}",
                    rule, type_bits, condition, counterexample
                )
            }
            RuleError::SolverUnknown {
                rule,
                condition,
                type_bits,
                reason,
            } => {
                write!(
                    f,
                    "Rule {} undecided at {} bits for {}: {}",
                    rule, type_bits, condition, reason
                )
            }
            RuleError::InvalidWidth { bits, reason } => {
                write!(f, "Invalid width {}: {}", bits, reason)
            }
            RuleError::InvalidConfig { info } => {
                write!(f, "Invalid configuration: {}", info)
            }
            RuleError::UnknownRule { name } => {
                write!(f, "Unknown rule: {}", name)
            }
        }
    }
}

impl Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Binding;

    #[test]
    fn test_display_names_condition_and_inputs() {
        let err = RuleError::EquivalenceViolated {
            rule: "checked_int_add",
            condition: "overflow",
            type_bits: 8,
            counterexample: Counterexample::from_bindings(vec![
                Binding::new("X", 8, "#x7f", Some(127)),
                Binding::new("Y", 8, "#x01", Some(1)),
            ]),
        };
        let text = err.to_string();
        assert!(text.contains("checked_int_add"));
        assert!(text.contains("8 bits"));
        assert!(text.contains("overflow"));
        assert!(text.contains("X = 127"));
        assert!(err.is_violation());
    }

    #[test]
    fn test_non_violation_errors() {
        let err = RuleError::InvalidWidth {
            bits: 12,
            reason: "not a multiple of 8",
        };
        assert_eq!(err.to_string(), "Invalid width 12: not a multiple of 8");
        assert!(!err.is_violation());

        let err = RuleError::UnknownRule {
            name: "checked_int_mul".to_owned(),
        };
        assert_eq!(err.to_string(), "Unknown rule: checked_int_mul");
    }
}
