//! Overflow checked unsigned integer addition.
//!
//! Operands are zero-extended. Below 256 bits the generated check is
//! `gt(sum, maxValue)`; at 256 bits a wrapped sum is smaller than either
//! operand, so the check becomes `gt(x, sum)`.

use z3::ast::{Bool, BV};

use super::{ArithmeticRule, OVERFLOW};
use crate::bitvec::{unsigned_max, unsigned_up_cast};
use crate::opcodes::{is_nonzero, ADD, GT};
use crate::{Rule, RuleError, TypeWidth, N_BITS};

/// The `checked_uint_add` rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckedUintAdd;

impl ArithmeticRule for CheckedUintAdd {
    fn name(&self) -> &'static str {
        "checked_uint_add"
    }

    fn description(&self) -> &'static str {
        "Overflow checked unsigned integer addition"
    }

    fn check_width(&self, rule: &mut Rule, width: TypeWidth) -> Result<(), RuleError> {
        let x_short = rule.bit_vec("X", width.bits());
        let y_short = rule.bit_vec("Y", width.bits());

        rule.check(
            OVERFLOW,
            &ground_truth(&x_short, &y_short),
            &candidate_check(&x_short, &y_short, width),
        )
    }
}

/// The solver's own unsigned overflow predicate for `x + y`.
#[must_use]
pub fn ground_truth(x_short: &BV, y_short: &BV) -> Bool {
    x_short.bvadd_no_overflow(y_short, false).not()
}

/// The check generated code performs for `x + y` at `width`.
#[must_use]
pub fn candidate_check(x_short: &BV, y_short: &BV, width: TypeWidth) -> Bool {
    let x = unsigned_up_cast(x_short, N_BITS);
    let y = unsigned_up_cast(y_short, N_BITS);
    let sum = ADD(&x, &y);

    if width.is_word() {
        is_nonzero(&GT(&x, &sum))
    } else {
        is_nonzero(&GT(&sum, &unsigned_max(width, N_BITS)))
    }
}
