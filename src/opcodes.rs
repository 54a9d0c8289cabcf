//! Symbolic EVM opcodes over 256-bit words.
//!
//! Each function mirrors the instruction of the same name. Arithmetic wraps
//! modulo `2^256`; comparisons return the word `1` or `0` rather than a solver
//! boolean, exactly as generated code sees them. Use [`is_nonzero`] to lift a
//! comparison result back into a [`Bool`] when stating a rule.

use z3::ast::{Bool, BV};

use crate::N_BITS;

/// Lifts a signed literal into a word (two's complement).
#[must_use]
pub fn word(value: i64) -> BV {
    BV::from_i64(value, N_BITS)
}

fn bool_to_word(condition: &Bool) -> BV {
    condition.ite(&word(1), &word(0))
}

/// `ADD(a, b)`: wrapping addition.
#[allow(non_snake_case)]
#[must_use]
pub fn ADD(a: &BV, b: &BV) -> BV {
    a.bvadd(b)
}

/// `SUB(a, b)`: wrapping subtraction.
#[allow(non_snake_case)]
#[must_use]
pub fn SUB(a: &BV, b: &BV) -> BV {
    a.bvsub(b)
}

/// `XOR(a, b)`: bitwise exclusive or.
#[allow(non_snake_case)]
#[must_use]
pub fn XOR(a: &BV, b: &BV) -> BV {
    a.bvxor(b)
}

/// `LT(a, b)`: unsigned less-than.
#[allow(non_snake_case)]
#[must_use]
pub fn LT(a: &BV, b: &BV) -> BV {
    bool_to_word(&a.bvult(b))
}

/// `GT(a, b)`: unsigned greater-than.
#[allow(non_snake_case)]
#[must_use]
pub fn GT(a: &BV, b: &BV) -> BV {
    bool_to_word(&a.bvugt(b))
}

/// `SLT(a, b)`: signed less-than.
#[allow(non_snake_case)]
#[must_use]
pub fn SLT(a: &BV, b: &BV) -> BV {
    bool_to_word(&a.bvslt(b))
}

/// `SGT(a, b)`: signed greater-than.
#[allow(non_snake_case)]
#[must_use]
pub fn SGT(a: &BV, b: &BV) -> BV {
    bool_to_word(&a.bvsgt(b))
}

/// `value != 0` as a solver boolean.
#[must_use]
pub fn is_nonzero(value: &BV) -> Bool {
    value.eq(&BV::from_i64(0, value.get_size())).not()
}
