//! Structured outcomes for rule checks.
//!
//! Every assertion a [`Rule`](crate::Rule) makes produces one [`CheckOutcome`].
//! Outcomes are handed to an [`OutcomeObserver`] before the check returns, so
//! they can be:
//!
//! - Logged via tracing ([`TracingObserver`])
//! - Collected programmatically for testing ([`CollectingObserver`])
//! - Fanned out to several sinks ([`CompositeObserver`])
//!
//! # Example
//!
//! ```
//! use checked_arith_rules::{CheckOutcome, CollectingObserver, OutcomeObserver, Verdict};
//! use web_time::Duration;
//!
//! let observer = CollectingObserver::new();
//! observer.on_outcome(&CheckOutcome::proven("checked_int_add", "overflow", 8, Duration::ZERO));
//!
//! assert_eq!(observer.len(), 1);
//! assert!(observer.all_proven());
//! assert!(!observer.has_verdict(Verdict::Violated));
//! ```

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;
use web_time::Duration;

/// Serializes a `Duration` as whole milliseconds.
pub(crate) mod millis_serializer {
    use serde::Serializer;
    use web_time::Duration;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

/// The solver's answer to one equivalence query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No input distinguishes the candidate from the exact condition.
    Proven,
    /// A counterexample was found.
    Violated,
    /// The solver returned no verdict (timeout or resource limit).
    Unknown,
}

impl Verdict {
    /// Returns a string representation suitable for logging labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proven => "proven",
            Self::Violated => "violated",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a symbolic input takes in a counterexample.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Binding {
    /// Name the input was declared with.
    pub name: String,
    /// Width of the input in bits.
    pub bits: u32,
    /// The solver's numeral for the value, e.g. `#x7f`.
    pub value: String,
    /// The value read as a signed integer, when it fits in 64 bits.
    pub signed: Option<i64>,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        bits: u32,
        value: impl Into<String>,
        signed: Option<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            bits,
            value: value.into(),
            signed,
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.signed {
            Some(signed) => write!(f, "{} = {}", self.name, signed),
            None => write!(f, "{} = {}", self.name, self.value),
        }
    }
}

/// An input assignment on which a candidate check is wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Counterexample {
    bindings: SmallVec<[Binding; 2]>,
}

impl Counterexample {
    /// Builds a counterexample from its bindings, in declaration order.
    #[must_use]
    pub fn from_bindings(bindings: impl IntoIterator<Item = Binding>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Returns the bindings in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Looks up the binding of the input called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Returns true if no input was tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Display for Counterexample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bindings.is_empty() {
            return f.write_str("<no tracked inputs>");
        }
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{binding}")?;
        }
        Ok(())
    }
}

/// The recorded result of one assertion.
///
/// # Serialization
///
/// `elapsed` is serialized as whole milliseconds under `elapsed_ms`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CheckOutcome {
    /// Name of the rule that made the assertion.
    pub rule: &'static str,
    /// The condition asserted, e.g. `overflow`.
    pub condition: &'static str,
    /// Source-type width in bits.
    pub type_bits: u32,
    /// The solver's verdict.
    pub verdict: Verdict,
    /// The violating inputs, when the verdict is [`Verdict::Violated`].
    pub counterexample: Option<Counterexample>,
    /// Why the solver gave up, when the verdict is [`Verdict::Unknown`].
    pub reason: Option<String>,
    /// Time spent in the solver.
    #[serde(rename = "elapsed_ms", serialize_with = "millis_serializer::serialize")]
    pub elapsed: Duration,
}

impl CheckOutcome {
    /// An outcome for a proven assertion.
    #[must_use]
    pub fn proven(
        rule: &'static str,
        condition: &'static str,
        type_bits: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            rule,
            condition,
            type_bits,
            verdict: Verdict::Proven,
            counterexample: None,
            reason: None,
            elapsed,
        }
    }

    /// An outcome for an assertion the solver refuted.
    #[must_use]
    pub fn violated(
        rule: &'static str,
        condition: &'static str,
        type_bits: u32,
        counterexample: Counterexample,
        elapsed: Duration,
    ) -> Self {
        Self {
            verdict: Verdict::Violated,
            counterexample: Some(counterexample),
            ..Self::proven(rule, condition, type_bits, elapsed)
        }
    }

    /// An outcome for an assertion the solver could not decide.
    #[must_use]
    pub fn unknown(
        rule: &'static str,
        condition: &'static str,
        type_bits: u32,
        reason: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            verdict: Verdict::Unknown,
            reason: Some(reason.into()),
            ..Self::proven(rule, condition, type_bits, elapsed)
        }
    }

    /// Serializes this outcome to a JSON string.
    ///
    /// Returns `None` if serialization fails (which should not happen for
    /// well-formed outcomes).
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} at {} bits",
            self.verdict, self.rule, self.condition, self.type_bits
        )?;
        if let Some(counterexample) = &self.counterexample {
            write!(f, " (counterexample: {counterexample})")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " (reason: {reason})")?;
        }
        Ok(())
    }
}

/// Trait for observing check outcomes.
///
/// # Example
///
/// ```
/// use checked_arith_rules::{CheckOutcome, OutcomeObserver};
///
/// struct FailureCounter {
///     // Your counter implementation
/// }
///
/// impl OutcomeObserver for FailureCounter {
///     fn on_outcome(&self, outcome: &CheckOutcome) {
///         // Increment a counter, page someone, etc.
///         let _ = outcome.verdict;
///     }
/// }
/// ```
pub trait OutcomeObserver: Send + Sync {
    /// Called once per assertion, after the solver has answered.
    fn on_outcome(&self, outcome: &CheckOutcome);
}

/// Built-in observer that logs outcomes via the `tracing` crate.
///
/// # Log Levels
///
/// - `Proven` → `tracing::debug!`
/// - `Unknown` → `tracing::warn!`
/// - `Violated` → `tracing::error!` with the counterexample
///
/// All fields are emitted as structured tracing fields (`rule`, `condition`,
/// `type_bits`, `verdict`, `elapsed_ms`).
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl OutcomeObserver for TracingObserver {
    fn on_outcome(&self, outcome: &CheckOutcome) {
        let rule = outcome.rule;
        let condition = outcome.condition;
        let type_bits = outcome.type_bits;
        let verdict = outcome.verdict.as_str();
        let elapsed_ms = outcome.elapsed.as_millis() as u64;

        match outcome.verdict {
            Verdict::Proven => {
                tracing::debug!(rule, condition, type_bits, verdict, elapsed_ms, "check proven");
            },
            Verdict::Unknown => {
                tracing::warn!(
                    rule,
                    condition,
                    type_bits,
                    verdict,
                    elapsed_ms,
                    reason = outcome.reason.as_deref().unwrap_or("unspecified"),
                    "solver returned no verdict"
                );
            },
            Verdict::Violated => {
                let counterexample = outcome
                    .counterexample
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                tracing::error!(
                    rule,
                    condition,
                    type_bits,
                    verdict,
                    elapsed_ms,
                    counterexample = %counterexample,
                    "candidate check disagrees with exact condition"
                );
            },
        }
    }
}

/// Built-in observer that collects outcomes for testing.
///
/// # Example
///
/// ```
/// use checked_arith_rules::{CheckOutcome, CollectingObserver, Counterexample, OutcomeObserver, Verdict};
/// use web_time::Duration;
///
/// let observer = CollectingObserver::new();
/// observer.on_outcome(&CheckOutcome::violated(
///     "checked_int_add",
///     "overflow",
///     8,
///     Counterexample::default(),
///     Duration::ZERO,
/// ));
///
/// assert!(observer.has_verdict(Verdict::Violated));
/// assert_eq!(observer.outcomes_for_rule("checked_int_add").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    outcomes: Mutex<Vec<CheckOutcome>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer with an empty outcome list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected outcomes.
    #[must_use]
    pub fn outcomes(&self) -> Vec<CheckOutcome> {
        self.outcomes.lock().clone()
    }

    /// Returns the number of collected outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.lock().len()
    }

    /// Returns true if no outcomes have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.lock().is_empty()
    }

    /// Checks if any outcome with the given verdict has been collected.
    #[must_use]
    pub fn has_verdict(&self, verdict: Verdict) -> bool {
        self.outcomes.lock().iter().any(|o| o.verdict == verdict)
    }

    /// Returns true if at least one outcome was collected and all were proven.
    #[must_use]
    pub fn all_proven(&self) -> bool {
        let outcomes = self.outcomes.lock();
        !outcomes.is_empty() && outcomes.iter().all(|o| o.verdict == Verdict::Proven)
    }

    /// Returns all outcomes reported for the named rule.
    #[must_use]
    pub fn outcomes_for_rule(&self, rule: &str) -> Vec<CheckOutcome> {
        self.outcomes
            .lock()
            .iter()
            .filter(|o| o.rule == rule)
            .cloned()
            .collect()
    }

    /// Clears all collected outcomes.
    pub fn clear(&self) {
        self.outcomes.lock().clear();
    }
}

impl OutcomeObserver for CollectingObserver {
    fn on_outcome(&self, outcome: &CheckOutcome) {
        self.outcomes.lock().push(outcome.clone());
    }
}

/// A composite observer that forwards outcomes to multiple observers.
///
/// Useful when you want to both log outcomes and collect them.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn OutcomeObserver>>,
}

impl CompositeObserver {
    /// Creates a new composite observer with no child observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Adds an observer to the composite.
    pub fn add(&mut self, observer: Arc<dyn OutcomeObserver>) {
        self.observers.push(observer);
    }

    /// Creates a composite observer from a list of observers.
    #[must_use]
    pub fn from_observers(observers: Vec<Arc<dyn OutcomeObserver>>) -> Self {
        Self { observers }
    }

    /// Returns the number of child observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if there are no child observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl OutcomeObserver for CompositeObserver {
    fn on_outcome(&self, outcome: &CheckOutcome) {
        for observer in &self.observers {
            observer.on_outcome(outcome);
        }
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observer_count", &self.observers.len())
            .finish()
    }
}
