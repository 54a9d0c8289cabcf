//! The checked arithmetic rules.
//!
//! Each rule follows the same shape:
//!
//! 1. Declare `X` and `Y` at the source width W.
//! 2. Take the exact overflow/underflow predicates from the solver.
//! 3. Promote both operands to the 256-bit word and compute the result there,
//!    as generated code does.
//! 4. State the candidate check the code generator emits and prove it
//!    equivalent to step 2.
//!
//! Below 256 bits the candidate compares the widened result against the type's
//! bounds. At 256 bits the result can no longer leave the word, so every rule
//! switches to a sign- or wrap-based formulation.

use z3::ast::Bool;

use crate::{Rule, RuleError, TypeWidth};

pub mod checked_int_add;
pub mod checked_int_sub;
pub mod checked_uint_add;
pub mod checked_uint_sub;

pub use checked_int_add::CheckedIntAdd;
pub use checked_int_sub::CheckedIntSub;
pub use checked_uint_add::CheckedUintAdd;
pub use checked_uint_sub::CheckedUintSub;

/// Condition name for results above the type's maximum.
pub const OVERFLOW: &str = "overflow";
/// Condition name for results below the type's minimum.
pub const UNDERFLOW: &str = "underflow";
/// Condition name for the combined word-width check.
pub const OVERFLOW_OR_UNDERFLOW: &str = "overflow_or_underflow";

/// A rule that can be checked at every supported width.
pub trait ArithmeticRule: Send + Sync {
    /// Stable identifier, used for lookup and in outcomes.
    fn name(&self) -> &'static str;

    /// One-line summary of the code-generation helper under test.
    fn description(&self) -> &'static str;

    /// Declares inputs on `rule` and makes every assertion for `width`.
    ///
    /// Returns the first failure.
    fn check_width(&self, rule: &mut Rule, width: TypeWidth) -> Result<(), RuleError>;
}

/// Exact conditions for a signed operation, as the solver defines them.
#[derive(Debug, Clone)]
pub struct SignedTruth {
    /// The exact result is above the type's maximum.
    pub overflow: Bool,
    /// The exact result is below the type's minimum.
    pub underflow: Bool,
}

impl SignedTruth {
    /// Either bound is crossed.
    #[must_use]
    pub fn overflow_or_underflow(&self) -> Bool {
        self.overflow.clone() | self.underflow.clone()
    }
}

/// The check a code generator emits after a signed operation.
#[derive(Debug, Clone)]
pub enum SignedCandidate {
    /// Word width: a single combined test.
    Word {
        /// True when the generated code reverts.
        overflow_or_underflow: Bool,
    },
    /// Narrower types: one bound test each.
    Narrow {
        /// True when the widened result exceeds the type's maximum.
        overflow: Bool,
        /// True when the widened result is below the type's minimum.
        underflow: Bool,
    },
}

/// Asserts a signed candidate against the exact conditions.
///
/// Narrow candidates make two assertions, the word candidate makes one.
pub fn check_signed(
    rule: &mut Rule,
    truth: &SignedTruth,
    candidate: &SignedCandidate,
) -> Result<(), RuleError> {
    match candidate {
        SignedCandidate::Word {
            overflow_or_underflow,
        } => rule.check(
            OVERFLOW_OR_UNDERFLOW,
            &truth.overflow_or_underflow(),
            overflow_or_underflow,
        ),
        SignedCandidate::Narrow {
            overflow,
            underflow,
        } => {
            rule.check(OVERFLOW, &truth.overflow, overflow)?;
            rule.check(UNDERFLOW, &truth.underflow, underflow)
        },
    }
}
