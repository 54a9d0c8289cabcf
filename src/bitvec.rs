//! Width constants and casts between source types and the working word.
//!
//! The constants are built from all-ones vectors instead of integer literals so
//! they are exact at every width, including 256 where no machine integer holds
//! `2^255 - 1`.

use z3::ast::BV;

use crate::TypeWidth;

/// Largest signed value of `width`, `2^(w-1) - 1`, as an `n_bits` vector.
///
/// `n_bits` must be at least `width.bits()`.
#[must_use]
pub fn signed_max(width: TypeWidth, n_bits: u32) -> BV {
    debug_assert!(n_bits >= width.bits());
    let magnitude_bits = width.bits() - 1;
    extend_with_zeros(BV::from_i64(-1, magnitude_bits), n_bits - magnitude_bits)
}

/// Smallest signed value of `width`, `-2^(w-1)`, as an `n_bits` vector.
///
/// In two's complement this is the bitwise complement of [`signed_max`].
#[must_use]
pub fn signed_min(width: TypeWidth, n_bits: u32) -> BV {
    signed_max(width, n_bits).bvnot()
}

/// Largest unsigned value of `width`, `2^w - 1`, as an `n_bits` vector.
#[must_use]
pub fn unsigned_max(width: TypeWidth, n_bits: u32) -> BV {
    debug_assert!(n_bits >= width.bits());
    extend_with_zeros(BV::from_i64(-1, width.bits()), n_bits - width.bits())
}

/// Sign-extends `value` to `n_bits`, preserving its signed value.
#[must_use]
pub fn signed_up_cast(value: &BV, n_bits: u32) -> BV {
    let size = value.get_size();
    debug_assert!(n_bits >= size);
    if n_bits == size {
        value.clone()
    } else {
        value.sign_ext(n_bits - size)
    }
}

/// Zero-extends `value` to `n_bits`, preserving its unsigned value.
#[must_use]
pub fn unsigned_up_cast(value: &BV, n_bits: u32) -> BV {
    let size = value.get_size();
    debug_assert!(n_bits >= size);
    extend_with_zeros(value.clone(), n_bits - size)
}

fn extend_with_zeros(value: BV, extra_bits: u32) -> BV {
    if extra_bits == 0 {
        value
    } else {
        value.zero_ext(extra_bits)
    }
}
