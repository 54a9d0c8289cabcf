//! Overflow checked signed integer addition.
//!
//! Generated code sign-extends both operands to the word, adds them, and then:
//!
//! - below 256 bits, reverts if `sgt(sum, maxValue)` (overflow) or
//!   `slt(sum, minValue)` (underflow);
//! - at 256 bits, reverts if `xor(slt(x, 0), slt(sum, y))`. Without wrapping,
//!   `sum < y` holds exactly when `x < 0`, so the two sign tests disagree only
//!   when the addition wrapped.

use z3::ast::BV;

use super::{check_signed, ArithmeticRule, SignedCandidate, SignedTruth};
use crate::bitvec::{signed_max, signed_min, signed_up_cast};
use crate::opcodes::{is_nonzero, word, ADD, SGT, SLT, XOR};
use crate::{Rule, RuleError, TypeWidth, N_BITS};

/// The `checked_int_add` rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckedIntAdd;

impl ArithmeticRule for CheckedIntAdd {
    fn name(&self) -> &'static str {
        "checked_int_add"
    }

    fn description(&self) -> &'static str {
        "Overflow checked signed integer addition"
    }

    fn check_width(&self, rule: &mut Rule, width: TypeWidth) -> Result<(), RuleError> {
        let x_short = rule.bit_vec("X", width.bits());
        let y_short = rule.bit_vec("Y", width.bits());

        let truth = ground_truth(&x_short, &y_short);
        let candidate = candidate_check(&x_short, &y_short, width);
        check_signed(rule, &truth, &candidate)
    }
}

/// The solver's own overflow and underflow predicates for `x + y`.
#[must_use]
pub fn ground_truth(x_short: &BV, y_short: &BV) -> SignedTruth {
    SignedTruth {
        overflow: x_short.bvadd_no_overflow(y_short, true).not(),
        underflow: x_short.bvadd_no_underflow(y_short).not(),
    }
}

/// The check generated code performs for `x + y` at `width`.
#[must_use]
pub fn candidate_check(x_short: &BV, y_short: &BV, width: TypeWidth) -> SignedCandidate {
    let x = signed_up_cast(x_short, N_BITS);
    let y = signed_up_cast(y_short, N_BITS);
    let sum = ADD(&x, &y);

    if width.is_word() {
        SignedCandidate::Word {
            overflow_or_underflow: is_nonzero(&XOR(&SLT(&x, &word(0)), &SLT(&sum, &y))),
        }
    } else {
        let max_value = signed_max(width, N_BITS);
        let min_value = signed_min(width, N_BITS);
        SignedCandidate::Narrow {
            overflow: is_nonzero(&SGT(&sum, &max_value)),
            underflow: is_nonzero(&SLT(&sum, &min_value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingObserver;
    use std::sync::Arc;
    use z3::ast::Bool;
    use z3::{SatResult, Solver};

    fn holds(condition: &Bool) -> bool {
        let solver = Solver::new();
        solver.assert(&condition.not());
        solver.check() == SatResult::Unsat
    }

    fn narrow(candidate: SignedCandidate) -> (Bool, Bool) {
        match candidate {
            SignedCandidate::Narrow {
                overflow,
                underflow,
            } => (overflow, underflow),
            SignedCandidate::Word { .. } => panic!("expected a narrow candidate"),
        }
    }

    #[test]
    fn test_int8_max_plus_one_overflows() {
        let width = TypeWidth::new(8).unwrap();
        let (x, y) = (BV::from_i64(127, 8), BV::from_i64(1, 8));

        let truth = ground_truth(&x, &y);
        assert!(holds(&truth.overflow));
        assert!(holds(&truth.underflow.not()));

        let (overflow, underflow) = narrow(candidate_check(&x, &y, width));
        assert!(holds(&overflow));
        assert!(holds(&underflow.not()));
    }

    #[test]
    fn test_int8_min_minus_one_underflows() {
        let width = TypeWidth::new(8).unwrap();
        let (x, y) = (BV::from_i64(-128, 8), BV::from_i64(-1, 8));

        let truth = ground_truth(&x, &y);
        assert!(holds(&truth.underflow));
        assert!(holds(&truth.overflow.not()));

        let (overflow, underflow) = narrow(candidate_check(&x, &y, width));
        assert!(holds(&underflow));
        assert!(holds(&overflow.not()));
    }

    #[test]
    fn test_int16_in_range_sum_passes() {
        let width = TypeWidth::new(16).unwrap();
        let (x, y) = (BV::from_i64(100, 16), BV::from_i64(200, 16));

        let truth = ground_truth(&x, &y);
        assert!(holds(&truth.overflow_or_underflow().not()));

        let (overflow, underflow) = narrow(candidate_check(&x, &y, width));
        assert!(holds(&overflow.not()));
        assert!(holds(&underflow.not()));
    }

    #[test]
    fn test_int256_min_minus_one_is_caught() {
        let min = signed_min(TypeWidth::WORD, N_BITS);
        let minus_one = word(-1);

        let truth = ground_truth(&min, &minus_one);
        assert!(holds(&truth.overflow_or_underflow()));

        match candidate_check(&min, &minus_one, TypeWidth::WORD) {
            SignedCandidate::Word {
                overflow_or_underflow,
            } => assert!(holds(&overflow_or_underflow)),
            SignedCandidate::Narrow { .. } => panic!("expected the word candidate"),
        }
    }

    #[test]
    fn test_narrow_widths_make_two_assertions_word_makes_one() {
        let observer = Arc::new(CollectingObserver::new());

        let mut rule = Rule::new("checked_int_add", TypeWidth::new(8).unwrap(), observer.clone());
        CheckedIntAdd
            .check_width(&mut rule, TypeWidth::new(8).unwrap())
            .unwrap();
        assert_eq!(rule.assertions(), 2);

        let mut rule = Rule::new("checked_int_add", TypeWidth::WORD, observer.clone());
        CheckedIntAdd.check_width(&mut rule, TypeWidth::WORD).unwrap();
        assert_eq!(rule.assertions(), 1);

        let conditions: Vec<&str> = observer.outcomes().iter().map(|o| o.condition).collect();
        assert_eq!(conditions, vec!["overflow", "underflow", "overflow_or_underflow"]);
        assert!(observer.all_proven());
    }
}
