//! Underflow checked unsigned integer subtraction.

use z3::ast::{Bool, BV};

use super::{ArithmeticRule, UNDERFLOW};
use crate::bitvec::{unsigned_max, unsigned_up_cast};
use crate::opcodes::{is_nonzero, GT, SUB};
use crate::{Rule, RuleError, TypeWidth, N_BITS};

/// The `checked_uint_sub` rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckedUintSub;

impl ArithmeticRule for CheckedUintSub {
    fn name(&self) -> &'static str {
        "checked_uint_sub"
    }

    fn description(&self) -> &'static str {
        "Underflow checked unsigned integer subtraction"
    }

    fn check_width(&self, rule: &mut Rule, width: TypeWidth) -> Result<(), RuleError> {
        let x_short = rule.bit_vec("X", width.bits());
        let y_short = rule.bit_vec("Y", width.bits());

        rule.check(
            UNDERFLOW,
            &ground_truth(&x_short, &y_short),
            &candidate_check(&x_short, &y_short, width),
        )
    }
}

/// The solver's own unsigned underflow predicate for `x - y`.
#[must_use]
pub fn ground_truth(x_short: &BV, y_short: &BV) -> Bool {
    x_short.bvsub_no_underflow(y_short, false).not()
}

/// The check generated code performs for `x - y` at `width`.
///
/// A wrapped difference lands above `2^256 - 2^w`, so it is both above the
/// type's maximum and, at word width, above `x`.
#[must_use]
pub fn candidate_check(x_short: &BV, y_short: &BV, width: TypeWidth) -> Bool {
    let x = unsigned_up_cast(x_short, N_BITS);
    let y = unsigned_up_cast(y_short, N_BITS);
    let diff = SUB(&x, &y);

    if width.is_word() {
        is_nonzero(&GT(&diff, &x))
    } else {
        is_nonzero(&GT(&diff, &unsigned_max(width, N_BITS)))
    }
}
