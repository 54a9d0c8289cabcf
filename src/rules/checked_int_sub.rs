//! Overflow checked signed integer subtraction.
//!
//! Below 256 bits the widened difference is compared against the type's
//! bounds. At 256 bits generated code reverts if `xor(slt(y, 0), sgt(diff, x))`:
//! without wrapping, subtracting a negative `y` always moves the result above
//! `x` and subtracting a non-negative one never does.

use z3::ast::BV;

use super::{check_signed, ArithmeticRule, SignedCandidate, SignedTruth};
use crate::bitvec::{signed_max, signed_min, signed_up_cast};
use crate::opcodes::{is_nonzero, word, SGT, SLT, SUB, XOR};
use crate::{Rule, RuleError, TypeWidth, N_BITS};

/// The `checked_int_sub` rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckedIntSub;

impl ArithmeticRule for CheckedIntSub {
    fn name(&self) -> &'static str {
        "checked_int_sub"
    }

    fn description(&self) -> &'static str {
        "Overflow checked signed integer subtraction"
    }

    fn check_width(&self, rule: &mut Rule, width: TypeWidth) -> Result<(), RuleError> {
        let x_short = rule.bit_vec("X", width.bits());
        let y_short = rule.bit_vec("Y", width.bits());

        let truth = ground_truth(&x_short, &y_short);
        let candidate = candidate_check(&x_short, &y_short, width);
        check_signed(rule, &truth, &candidate)
    }
}

/// The solver's own overflow and underflow predicates for `x - y`.
#[must_use]
pub fn ground_truth(x_short: &BV, y_short: &BV) -> SignedTruth {
    SignedTruth {
        overflow: x_short.bvsub_no_overflow(y_short).not(),
        underflow: x_short.bvsub_no_underflow(y_short, true).not(),
    }
}

/// The check generated code performs for `x - y` at `width`.
#[must_use]
pub fn candidate_check(x_short: &BV, y_short: &BV, width: TypeWidth) -> SignedCandidate {
    let x = signed_up_cast(x_short, N_BITS);
    let y = signed_up_cast(y_short, N_BITS);
    let diff = SUB(&x, &y);

    if width.is_word() {
        SignedCandidate::Word {
            overflow_or_underflow: is_nonzero(&XOR(&SLT(&y, &word(0)), &SGT(&diff, &x))),
        }
    } else {
        let max_value = signed_max(width, N_BITS);
        let min_value = signed_min(width, N_BITS);
        SignedCandidate::Narrow {
            overflow: is_nonzero(&SGT(&diff, &max_value)),
            underflow: is_nonzero(&SLT(&diff, &min_value)),
        }
    }
}
