//! Configuration for rule sweeps.
//!
//! | Preset | Widths | Use |
//! |--------|--------|-----|
//! | `RuleConfig::default()` / `exhaustive()` | 8..=256 | Full verification |
//! | `RuleConfig::quick()` | 8..=64 | Fast feedback while editing a rule |
//!
//! # Example
//!
//! ```
//! use checked_arith_rules::RuleConfig;
//! use web_time::Duration;
//!
//! let config = RuleConfig::quick().with_timeout(Duration::from_secs(30));
//! config.validate()?;
//! assert_eq!(config.widths().count(), 8);
//! # Ok::<(), checked_arith_rules::RuleError>(())
//! ```

use web_time::Duration;

use crate::{RuleError, TypeWidth};

/// Shortest timeout Z3 can enforce.
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Controls which widths a sweep covers and how long the solver may take.
///
/// # Forward Compatibility
///
/// New fields may be added to this struct in future versions. Use the
/// `..RuleConfig::default()` pattern when constructing instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "RuleConfig has no effect unless passed to run_rule() or RuleBank::run_all()"]
pub struct RuleConfig {
    /// Narrowest width checked, in bits.
    ///
    /// Default: 8
    pub min_type_bits: u32,

    /// Widest width checked, in bits.
    ///
    /// Default: 256
    pub max_type_bits: u32,

    /// Per-query solver timeout. A query that runs out of time is reported as
    /// [`RuleError::SolverUnknown`].
    ///
    /// Default: `None` (no timeout)
    pub timeout: Option<Duration>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_type_bits: TypeWidth::MIN.bits(),
            max_type_bits: TypeWidth::WORD.bits(),
            timeout: None,
        }
    }
}

impl RuleConfig {
    /// Creates a new `RuleConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every supported width, no timeout.
    pub fn exhaustive() -> Self {
        Self::default()
    }

    /// Widths up to 64 bits only.
    ///
    /// Skips the word-width special case, so only use this for quick iteration.
    pub fn quick() -> Self {
        Self {
            max_type_bits: 64,
            ..Self::default()
        }
    }

    /// Restricts the sweep to `min..=max` bits.
    pub fn with_widths(mut self, min_type_bits: u32, max_type_bits: u32) -> Self {
        self.min_type_bits = min_type_bits;
        self.max_type_bits = max_type_bits;
        self
    }

    /// Restricts the sweep to a single width.
    pub fn with_single_width(self, type_bits: u32) -> Self {
        self.with_widths(type_bits, type_bits)
    }

    /// Sets the per-query solver timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks that both bounds are supported widths, `min <= max`, and any
    /// timeout is at least one millisecond.
    pub fn validate(&self) -> Result<(), RuleError> {
        let min = TypeWidth::new(self.min_type_bits)?;
        let max = TypeWidth::new(self.max_type_bits)?;
        if min > max {
            return Err(RuleError::InvalidConfig {
                info: format!(
                    "min_type_bits ({}) must not exceed max_type_bits ({})",
                    min, max
                ),
            });
        }
        // Z3 takes whole milliseconds and reads 0 as no limit.
        if self.timeout.is_some_and(|timeout| timeout < MIN_TIMEOUT) {
            return Err(RuleError::InvalidConfig {
                info: "timeout must be at least 1 ms".to_owned(),
            });
        }
        Ok(())
    }

    /// Iterates the configured widths in ascending order.
    ///
    /// Yields nothing when the bounds are invalid; call [`validate`](Self::validate) first.
    pub fn widths(&self) -> impl Iterator<Item = TypeWidth> {
        let (min, max) = (self.min_type_bits, self.max_type_bits);
        TypeWidth::all().filter(move |w| (min..=max).contains(&w.bits()))
    }

    /// Builds the Z3 configuration for a sweep.
    #[must_use]
    pub fn z3_config(&self) -> z3::Config {
        let mut cfg = z3::Config::new();
        cfg.set_model_generation(true);
        if let Some(timeout) = self.timeout {
            cfg.set_timeout_msec(timeout.as_millis() as u64);
        }
        cfg
    }
}
