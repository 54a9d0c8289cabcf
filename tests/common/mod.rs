//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - [`solver_case_count`]: proptest case count for properties that call the solver
//! - [`holds`]: proves a closed formula with a fresh solver
//! - [`init_tracing`]: routes rule logs to the test writer
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::{holds, init_tracing};
//! ```

#![allow(dead_code)] // Each integration crate uses a subset of these helpers.

use z3::ast::Bool;
use z3::{SatResult, Solver};

/// Returns the number of cases for property tests that invoke Z3.
///
/// Every case builds and solves a formula, so the count is kept well below
/// proptest's default. Under Miri the solver is unusable and the count drops
/// to a token value.
#[must_use]
pub const fn solver_case_count() -> u32 {
    if cfg!(miri) {
        5
    } else {
        64
    }
}

/// Returns true if `condition` holds for every assignment.
pub fn holds(condition: &Bool) -> bool {
    let solver = Solver::new();
    solver.assert(condition.not());
    solver.check() == SatResult::Unsat
}

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Decides a formula that is either valid or unsatisfiable, such as a
/// condition over constants.
///
/// # Panics
///
/// Panics if `condition` depends on a free input.
pub fn decide(condition: &Bool) -> bool {
    if holds(condition) {
        true
    } else if holds(&condition.not()) {
        false
    } else {
        panic!("condition is contingent: {condition}");
    }
}
