//! # Checked Arithmetic Rules
//!
//! An SMT-backed rule bank for the overflow checks a smart-contract compiler emits
//! around checked integer arithmetic.
//!
//! Generated code never computes in the source type's width. Both operands are
//! promoted to the 256-bit EVM word, the operation is carried out on words, and a
//! short comparison sequence decides whether the result left the range of the
//! source type. Each rule in this crate states that comparison sequence as a
//! *candidate check* and proves, with Z3, that it is equivalent to the exact
//! overflow/underflow condition for **every** pair of inputs, at every supported
//! width from 8 to 256 bits.
//!
//! ```no_run
//! use checked_arith_rules::{run_rule, CheckedIntAdd, RuleConfig, TracingObserver};
//! use std::sync::Arc;
//!
//! let summary = run_rule(&CheckedIntAdd, &RuleConfig::default(), Arc::new(TracingObserver::new()))?;
//! assert_eq!(summary.widths_checked.len(), 32);
//! # Ok::<(), checked_arith_rules::RuleError>(())
//! ```
//!
//! ## Layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`width`] | Validated source-type widths |
//! | [`bitvec`] | Width constants and up-casts |
//! | [`opcodes`] | EVM word opcodes used by candidate checks |
//! | [`rule`] | Equivalence harness over one solver |
//! | [`report`] | Outcome records and observers |
//! | [`rules`] | The checked arithmetic rules |
//! | [`bank`] | Width sweeps and the standard rule bank |
//! | [`config`] | Sweep configuration |
//! | [`error`] | The crate's error type |

#![forbid(unsafe_code)] // let us try
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use bank::{run_rule, BankReport, RuleBank, SweepSummary};
pub use config::RuleConfig;
pub use error::RuleError;
pub use report::{
    CheckOutcome, CollectingObserver, CompositeObserver, Counterexample, OutcomeObserver,
    TracingObserver, Verdict,
};
pub use rule::Rule;
pub use rules::{ArithmeticRule, CheckedIntAdd, CheckedIntSub, CheckedUintAdd, CheckedUintSub};
pub use width::TypeWidth;

pub mod bank;
pub mod bitvec;
pub mod config;
pub mod error;
pub mod opcodes;
pub mod prelude;
pub mod report;
pub mod rule;
pub mod rules;
pub mod width;

// #############
// # CONSTANTS #
// #############

/// Width in bits of the EVM word every operand is promoted to before arithmetic.
pub const N_BITS: u32 = 256;

/// Distance in bits between two consecutive supported source-type widths.
pub const TYPE_BITS_STEP: u32 = 8;
