//! Source-type widths supported by the code generator.
//!
//! Integer types come in byte steps, `int8` through `int256`. [`TypeWidth`] is a
//! newtype over the bit count that can only hold one of those 32 values, so the
//! bit-vector helpers downstream never see a width they cannot represent in the
//! 256-bit working word.

use crate::{RuleError, N_BITS, TYPE_BITS_STEP};

/// A validated source-type width in bits: a multiple of 8 in `8..=256`.
///
/// # Examples
///
/// ```
/// use checked_arith_rules::TypeWidth;
///
/// let width = TypeWidth::new(16)?;
/// assert_eq!(width.bits(), 16);
/// assert_eq!(width.extension_bits(), 240);
/// assert!(!width.is_word());
///
/// assert!(TypeWidth::new(12).is_err());
/// assert_eq!(TypeWidth::all().count(), 32);
/// # Ok::<(), checked_arith_rules::RuleError>(())
/// ```
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct TypeWidth(u32);

impl TypeWidth {
    /// The narrowest supported width.
    pub const MIN: Self = Self(TYPE_BITS_STEP);

    /// The full EVM word.
    pub const WORD: Self = Self(N_BITS);

    /// Validates `bits` as a source-type width.
    pub fn new(bits: u32) -> Result<Self, RuleError> {
        if bits == 0 {
            return Err(RuleError::InvalidWidth {
                bits,
                reason: "width must be positive",
            });
        }
        if bits % TYPE_BITS_STEP != 0 {
            return Err(RuleError::InvalidWidth {
                bits,
                reason: "width must be a multiple of 8",
            });
        }
        if bits > N_BITS {
            return Err(RuleError::InvalidWidth {
                bits,
                reason: "width must not exceed the 256-bit word",
            });
        }
        Ok(Self(bits))
    }

    /// Returns the width in bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true for the full 256-bit word.
    ///
    /// Rules switch to their sign-based formulation here because `max + 1` no
    /// longer fits in the working width.
    #[inline]
    #[must_use]
    pub const fn is_word(self) -> bool {
        self.0 == N_BITS
    }

    /// Number of bits an operand gains when promoted to the working word.
    #[inline]
    #[must_use]
    pub const fn extension_bits(self) -> u32 {
        N_BITS - self.0
    }

    /// Returns the next wider supported width, or `None` after the word.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.is_word() {
            None
        } else {
            Some(Self(self.0 + TYPE_BITS_STEP))
        }
    }

    /// Iterates every supported width in ascending order: 8, 16, ..., 256.
    pub fn all() -> impl Iterator<Item = Self> {
        std::iter::successors(Some(Self::MIN), |w| w.next())
    }
}

impl TryFrom<u32> for TypeWidth {
    type Error = RuleError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<TypeWidth> for u32 {
    fn from(width: TypeWidth) -> Self {
        width.0
    }
}

impl std::fmt::Display for TypeWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
