//! Width sweeps and the standard rule bank.
//!
//! [`run_rule`] drives one rule through every configured width, each with a
//! fresh [`Rule`] harness, inside a Z3 context built from the
//! [`RuleConfig`]. The first failing assertion ends the sweep.
//!
//! [`RuleBank`] groups rules so they can be looked up by name and run together.

use std::sync::Arc;

use tracing::{info, warn};
use web_time::{Duration, Instant};
use z3::with_z3_config;

use crate::report::{millis_serializer, OutcomeObserver};
use crate::rules::{ArithmeticRule, CheckedIntAdd, CheckedIntSub, CheckedUintAdd, CheckedUintSub};
use crate::{Rule, RuleConfig, RuleError};

/// What a completed sweep covered.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SweepSummary {
    /// Name of the rule swept.
    pub rule: &'static str,
    /// Widths proven, in ascending order.
    pub widths_checked: Vec<u32>,
    /// Total assertions made across all widths.
    pub assertions: usize,
    /// Wall-clock time of the sweep.
    #[serde(rename = "elapsed_ms", serialize_with = "millis_serializer::serialize")]
    pub elapsed: Duration,
}

impl SweepSummary {
    /// Serializes this summary to a JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Proves `rule` at every width `config` selects.
///
/// # Errors
///
/// - [`RuleError::InvalidWidth`] / [`RuleError::InvalidConfig`] if `config` is invalid
/// - [`RuleError::EquivalenceViolated`] for the first counterexample found
/// - [`RuleError::SolverUnknown`] for the first undecided query
pub fn run_rule<R>(
    rule: &R,
    config: &RuleConfig,
    observer: Arc<dyn OutcomeObserver>,
) -> Result<SweepSummary, RuleError>
where
    R: ArithmeticRule + ?Sized,
{
    config.validate()?;
    let z3_config = config.z3_config();
    with_z3_config(&z3_config, || sweep(rule, config, &observer))
}

fn sweep<R>(
    rule: &R,
    config: &RuleConfig,
    observer: &Arc<dyn OutcomeObserver>,
) -> Result<SweepSummary, RuleError>
where
    R: ArithmeticRule + ?Sized,
{
    let start = Instant::now();
    let mut widths_checked = Vec::new();
    let mut assertions = 0;

    for width in config.widths() {
        let mut harness = Rule::new(rule.name(), width, Arc::clone(observer));
        let result = rule.check_width(&mut harness, width);
        assertions += harness.assertions();
        if let Err(err) = result {
            warn!(rule = rule.name(), type_bits = width.bits(), error = %err, "sweep stopped");
            return Err(err);
        }
        widths_checked.push(width.bits());
    }

    let summary = SweepSummary {
        rule: rule.name(),
        widths_checked,
        assertions,
        elapsed: start.elapsed(),
    };
    info!(
        rule = summary.rule,
        widths = summary.widths_checked.len(),
        assertions = summary.assertions,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "sweep proven"
    );
    Ok(summary)
}

/// An ordered collection of rules.
///
/// # Example
///
/// ```
/// use checked_arith_rules::RuleBank;
///
/// let bank = RuleBank::standard();
/// assert_eq!(bank.names().first(), Some(&"checked_int_add"));
/// assert!(bank.get("checked_int_add").is_ok());
/// assert!(bank.get("checked_int_mul").is_err());
/// ```
#[derive(Default)]
pub struct RuleBank {
    rules: Vec<Box<dyn ArithmeticRule>>,
}

impl RuleBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The checked addition and subtraction helpers, signed then unsigned.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_rule(CheckedIntAdd)
            .with_rule(CheckedIntSub)
            .with_rule(CheckedUintAdd)
            .with_rule(CheckedUintSub)
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl ArithmeticRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Looks a rule up by name.
    pub fn get(&self, name: &str) -> Result<&dyn ArithmeticRule, RuleError> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .map(|rule| &**rule)
            .ok_or_else(|| RuleError::UnknownRule {
                name: name.to_owned(),
            })
    }

    /// Rule names in bank order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Iterates the rules in bank order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ArithmeticRule> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Number of rules in the bank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the bank holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sweeps the named rule.
    pub fn run(
        &self,
        name: &str,
        config: &RuleConfig,
        observer: Arc<dyn OutcomeObserver>,
    ) -> Result<SweepSummary, RuleError> {
        run_rule(self.get(name)?, config, observer)
    }

    /// Sweeps every rule, continuing past failing ones.
    ///
    /// Only an invalid `config` is returned as an error; per-rule failures are
    /// recorded in the report.
    pub fn run_all(
        &self,
        config: &RuleConfig,
        observer: Arc<dyn OutcomeObserver>,
    ) -> Result<BankReport, RuleError> {
        config.validate()?;
        let results = self
            .iter()
            .map(|rule| (rule.name(), run_rule(rule, config, Arc::clone(&observer))))
            .collect();
        Ok(BankReport { results })
    }
}

impl std::fmt::Debug for RuleBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBank")
            .field("rules", &self.names())
            .finish()
    }
}

/// Per-rule results of [`RuleBank::run_all`].
#[derive(Debug, Clone)]
pub struct BankReport {
    results: Vec<(&'static str, Result<SweepSummary, RuleError>)>,
}

impl BankReport {
    /// Returns true if every rule was proven at every width.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    /// Results in bank order.
    #[must_use]
    pub fn results(&self) -> &[(&'static str, Result<SweepSummary, RuleError>)] {
        &self.results
    }

    /// The errors of the rules that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &RuleError)> {
        self.results
            .iter()
            .filter_map(|(name, result)| result.as_ref().err().map(|err| (*name, err)))
    }

    /// The summaries of the rules that passed.
    pub fn summaries(&self) -> impl Iterator<Item = &SweepSummary> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingObserver;

    #[test]
    fn test_standard_bank_order() {
        let bank = RuleBank::standard();
        assert_eq!(
            bank.names(),
            vec![
                "checked_int_add",
                "checked_int_sub",
                "checked_uint_add",
                "checked_uint_sub"
            ]
        );
        assert_eq!(bank.len(), 4);
        assert!(!bank.is_empty());
        assert!(RuleBank::new().is_empty());
    }

    #[test]
    fn test_unknown_rule() {
        let bank = RuleBank::standard();
        let observer = Arc::new(CollectingObserver::new());
        let err = bank
            .run("checked_int_mul", &RuleConfig::quick(), observer.clone())
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::UnknownRule {
                name: "checked_int_mul".to_owned()
            }
        );
        assert!(observer.is_empty());
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let observer = Arc::new(CollectingObserver::new());
        let config = RuleConfig::new().with_widths(9, 64);
        assert!(run_rule(&CheckedIntAdd, &config, observer.clone()).is_err());
        assert!(RuleBank::standard()
            .run_all(&config, observer.clone())
            .is_err());
        assert!(observer.is_empty());
    }

    #[test]
    fn test_sweep_counts_assertions() {
        let observer = Arc::new(CollectingObserver::new());
        let config = RuleConfig::new().with_widths(8, 32);
        let summary = run_rule(&CheckedIntAdd, &config, observer.clone()).unwrap();
        assert_eq!(summary.rule, "checked_int_add");
        assert_eq!(summary.widths_checked, vec![8, 16, 24, 32]);
        assert_eq!(summary.assertions, 8);
        assert_eq!(observer.len(), 8);
        assert!(observer.all_proven());
    }
}
