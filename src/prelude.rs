//! Convenient re-exports for common usage.
//!
//! ```rust
//! use checked_arith_rules::prelude::*;
//! ```
//!
//! The prelude includes:
//!
//! - **Rules**: [`ArithmeticRule`], [`CheckedIntAdd`], [`CheckedIntSub`], [`CheckedUintAdd`], [`CheckedUintSub`]
//! - **Running**: [`run_rule`], [`RuleBank`], [`RuleConfig`], [`SweepSummary`], [`BankReport`]
//! - **Harness**: [`Rule`], [`TypeWidth`], [`N_BITS`]
//! - **Outcomes**: [`CheckOutcome`], [`Verdict`], [`Counterexample`], [`OutcomeObserver`], [`TracingObserver`], [`CollectingObserver`]
//! - **Error handling**: [`RuleError`]
//!
//! Rule-writing helpers live in [`bitvec`](crate::bitvec) and
//! [`opcodes`](crate::opcodes) and are not re-exported, since opcode names
//! such as `ADD` are best imported explicitly.

pub use crate::{
    run_rule, ArithmeticRule, BankReport, CheckOutcome, CheckedIntAdd, CheckedIntSub,
    CheckedUintAdd, CheckedUintSub, CollectingObserver, Counterexample, OutcomeObserver, Rule,
    RuleBank, RuleConfig, RuleError, SweepSummary, TracingObserver, TypeWidth, Verdict, N_BITS,
};
