//! The equivalence harness.
//!
//! A [`Rule`] owns one solver for one rule at one width. Inputs are declared
//! through [`Rule::bit_vec`] so they can be read back from a model, and every
//! [`Rule::check`] asks the solver for an assignment on which the two sides
//! disagree. Finding none proves the equivalence for all inputs.

use std::sync::Arc;

use tracing::debug;
use web_time::Instant;
use z3::ast::{Bool, BV};
use z3::{Model, SatResult, Solver};

use crate::report::{Binding, CheckOutcome, Counterexample, OutcomeObserver};
use crate::{RuleError, TypeWidth};

/// Equivalence checks for one rule at one source-type width.
///
/// # Example
///
/// ```no_run
/// use checked_arith_rules::{CollectingObserver, Rule, TypeWidth};
/// use checked_arith_rules::opcodes::{is_nonzero, word, SGT};
/// use std::sync::Arc;
///
/// let mut rule = Rule::new("example", TypeWidth::WORD, Arc::new(CollectingObserver::new()));
/// let x = rule.bit_vec("X", 256);
/// // x > 0 (signed) exactly when SGT(x, 0) is nonzero.
/// rule.check("positive", &x.bvsgt(&word(0)), &is_nonzero(&SGT(&x, &word(0))))?;
/// # Ok::<(), checked_arith_rules::RuleError>(())
/// ```
pub struct Rule {
    name: &'static str,
    width: TypeWidth,
    solver: Solver,
    inputs: Vec<(String, BV)>,
    observer: Arc<dyn OutcomeObserver>,
    assertions: usize,
}

impl Rule {
    /// Creates a harness with a fresh solver.
    #[must_use]
    pub fn new(name: &'static str, width: TypeWidth, observer: Arc<dyn OutcomeObserver>) -> Self {
        Self {
            name,
            width,
            solver: Solver::new(),
            inputs: Vec::new(),
            observer,
            assertions: 0,
        }
    }

    /// Name of the rule this harness checks.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Source-type width this harness checks.
    #[must_use]
    pub fn width(&self) -> TypeWidth {
        self.width
    }

    /// Number of [`check`](Self::check) calls made so far.
    #[must_use]
    pub fn assertions(&self) -> usize {
        self.assertions
    }

    /// Declares a symbolic input of `bits` bits and tracks it for counterexamples.
    pub fn bit_vec(&mut self, name: &str, bits: u32) -> BV {
        let value = BV::new_const(name, bits);
        self.inputs.push((name.to_owned(), value.clone()));
        value
    }

    /// Adds a precondition that holds for every later check.
    pub fn require(&self, constraint: &Bool) {
        self.solver.assert(constraint);
    }

    /// Proves `actual ⇔ validator` for every input satisfying the preconditions.
    ///
    /// `condition` names the assertion in outcomes and errors.
    pub fn check(
        &mut self,
        condition: &'static str,
        actual: &Bool,
        validator: &Bool,
    ) -> Result<(), RuleError> {
        self.assertions += 1;
        let type_bits = self.width.bits();
        let start = Instant::now();

        // Scoped so one check's negated claim never constrains the next.
        self.solver.push();
        self.solver.assert(&actual.eq(validator).not());
        let verdict = self.solver.check();
        let (outcome, result) = match verdict {
            SatResult::Unsat => (
                CheckOutcome::proven(self.name, condition, type_bits, start.elapsed()),
                Ok(()),
            ),
            SatResult::Sat => {
                let counterexample = self.counterexample();
                (
                    CheckOutcome::violated(
                        self.name,
                        condition,
                        type_bits,
                        counterexample.clone(),
                        start.elapsed(),
                    ),
                    Err(RuleError::EquivalenceViolated {
                        rule: self.name,
                        condition,
                        type_bits,
                        counterexample,
                    }),
                )
            },
            SatResult::Unknown => {
                let reason = self
                    .solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_owned());
                (
                    CheckOutcome::unknown(
                        self.name,
                        condition,
                        type_bits,
                        reason.clone(),
                        start.elapsed(),
                    ),
                    Err(RuleError::SolverUnknown {
                        rule: self.name,
                        condition,
                        type_bits,
                        reason,
                    }),
                )
            },
        };
        self.solver.pop(1);

        debug!(
            rule = self.name,
            condition,
            type_bits,
            verdict = outcome.verdict.as_str(),
            "equivalence query answered"
        );
        self.observer.on_outcome(&outcome);
        result
    }

    fn counterexample(&self) -> Counterexample {
        let Some(model) = self.solver.get_model() else {
            return Counterexample::default();
        };
        Counterexample::from_bindings(
            self.inputs
                .iter()
                .filter_map(|(name, input)| binding(&model, name, input)),
        )
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("inputs", &self.inputs.len())
            .field("assertions", &self.assertions)
            .finish_non_exhaustive()
    }
}

fn binding(model: &Model, name: &str, input: &BV) -> Option<Binding> {
    let value = model.eval(input, true)?;
    let bits = input.get_size();
    let signed = if bits <= 64 {
        value.as_u64().map(|raw| to_signed(raw, bits))
    } else {
        None
    };
    Some(Binding::new(name, bits, value.to_string(), signed))
}

/// Reads the low `bits` bits of `raw` as a two's complement integer.
fn to_signed(raw: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((raw << shift) as i64) >> shift
}
