//! Command-line runner for the rule bank.
//!
//! # Usage
//!
//! ```bash
//! # Every rule, every width
//! cargo run --features cli --bin rule-check
//!
//! # One rule, narrow widths only, with a 10s solver timeout
//! cargo run --features cli --bin rule-check -- \
//!     --rule checked_int_add \
//!     --max-bits 64 \
//!     --timeout-ms 10000
//! ```
//!
//! # Output
//!
//! One line per rule on stdout. With `--json`, one JSON object per assertion
//! followed by one per rule summary:
//! ```json
//! {"rule":"checked_int_add","condition":"overflow","type_bits":8,"verdict":"proven","counterexample":null,"reason":null,"elapsed_ms":3}
//! ```
//!
//! Exit code 0 when every selected rule is proven, 1 when any rule fails,
//! 2 for invalid arguments.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use checked_arith_rules::{
    run_rule, ArithmeticRule, CheckOutcome, CompositeObserver, OutcomeObserver, RuleBank,
    RuleConfig, RuleError, TracingObserver,
};
use clap::Parser;
use parking_lot::Mutex;
use tracing::{error, Level};
use web_time::Duration;

/// Every selected rule was proven.
const EXIT_PASS: u8 = 0;
/// At least one rule failed or was undecided.
const EXIT_FAIL: u8 = 1;
/// The arguments named an unknown rule or an invalid width range.
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "rule-check",
    version,
    about = "Prove generated overflow checks equivalent to the exact conditions"
)]
struct Args {
    /// Rule to check (repeatable). Defaults to every rule in the bank.
    #[arg(long = "rule", value_name = "NAME")]
    rules: Vec<String>,

    /// Narrowest width to check, in bits.
    #[arg(long, default_value_t = 8)]
    min_bits: u32,

    /// Widest width to check, in bits.
    #[arg(long, default_value_t = 256)]
    max_bits: u32,

    /// Per-query solver timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print outcomes and summaries as JSON lines.
    #[arg(long)]
    json: bool,

    /// List the rules in the bank and exit.
    #[arg(long)]
    list: bool,

    /// Log every proven assertion.
    #[arg(short, long)]
    verbose: bool,
}

fn emit<W: Write>(out: &Mutex<W>, line: &str) {
    // A closed stdout is not a rule failure.
    let _ = writeln!(out.lock(), "{line}");
}

/// Writes every outcome as one JSON line.
struct JsonLinesObserver<W> {
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send> OutcomeObserver for JsonLinesObserver<W> {
    fn on_outcome(&self, outcome: &CheckOutcome) {
        if let Some(line) = outcome.to_json() {
            emit(&self.out, &line);
        }
    }
}

fn select<'a>(
    bank: &'a RuleBank,
    names: &[String],
) -> Result<Vec<&'a dyn ArithmeticRule>, RuleError> {
    if names.is_empty() {
        return Ok(bank.iter().collect());
    }
    names.iter().map(|name| bank.get(name)).collect()
}

fn config_from(args: &Args) -> Result<RuleConfig, RuleError> {
    let mut config = RuleConfig::new().with_widths(args.min_bits, args.max_bits);
    if let Some(ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

/// Runs the selected rules, writing the report to `out`. Returns the exit status.
fn run<W: Write + Send + 'static>(args: &Args, out: &Arc<Mutex<W>>) -> u8 {
    let bank = RuleBank::standard();
    if args.list {
        for rule in bank.iter() {
            emit(out, &format!("{:<20} {}", rule.name(), rule.description()));
        }
        return EXIT_PASS;
    }

    let config = match config_from(args) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid arguments");
            return EXIT_USAGE;
        },
    };
    let rules = match select(&bank, &args.rules) {
        Ok(rules) => rules,
        Err(err) => {
            error!(error = %err, "invalid arguments");
            return EXIT_USAGE;
        },
    };

    let mut observer = CompositeObserver::new();
    observer.add(Arc::new(TracingObserver::new()));
    if args.json {
        observer.add(Arc::new(JsonLinesObserver {
            out: Arc::clone(out),
        }));
    }
    let observer: Arc<dyn OutcomeObserver> = Arc::new(observer);

    let mut status = EXIT_PASS;
    for rule in rules {
        match run_rule(rule, &config, Arc::clone(&observer)) {
            Ok(summary) => {
                if args.json {
                    if let Some(line) = summary.to_json() {
                        emit(out, &line);
                    }
                } else {
                    emit(
                        out,
                        &format!(
                            "PASS {} ({} widths, {} assertions, {} ms)",
                            summary.rule,
                            summary.widths_checked.len(),
                            summary.assertions,
                            summary.elapsed.as_millis()
                        ),
                    );
                }
            },
            Err(err) => {
                status = EXIT_FAIL;
                if !args.json {
                    emit(out, &format!("FAIL {}: {}", rule.name(), err));
                }
            },
        }
    }
    status
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let stdout = Arc::new(Mutex::new(std::io::stdout()));
    ExitCode::from(run(&args, &stdout))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;

    fn run_with(argv: &[&str]) -> (u8, Vec<String>) {
        let args = Args::parse_from(std::iter::once("rule-check").chain(argv.iter().copied()));
        let out = Arc::new(Mutex::new(Vec::new()));
        let status = run(&args, &out);
        let text = String::from_utf8(out.lock().clone()).unwrap();
        (status, text.lines().map(str::to_owned).collect())
    }

    #[test]
    fn test_unknown_rule_is_a_usage_error() {
        let (status, lines) = run_with(&["--rule", "checked_int_mul"]);
        assert_eq!(status, EXIT_USAGE);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_invalid_width_is_a_usage_error() {
        assert_eq!(run_with(&["--min-bits", "12"]).0, EXIT_USAGE);
        assert_eq!(run_with(&["--min-bits", "64", "--max-bits", "32"]).0, EXIT_USAGE);
        assert_eq!(run_with(&["--timeout-ms", "0"]).0, EXIT_USAGE);
    }

    #[test]
    fn test_list_names_every_rule() {
        let (status, lines) = run_with(&["--list"]);
        assert_eq!(status, EXIT_PASS);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("checked_int_add"));
        assert!(lines[3].starts_with("checked_uint_sub"));
    }

    #[test]
    fn test_narrow_run_passes() {
        let (status, lines) = run_with(&[
            "--rule",
            "checked_int_add",
            "--rule",
            "checked_uint_sub",
            "--max-bits",
            "16",
        ]);
        assert_eq!(status, EXIT_PASS);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("PASS checked_int_add (2 widths, 4 assertions"));
        assert!(lines[1].starts_with("PASS checked_uint_sub (2 widths, 2 assertions"));
    }

    #[test]
    fn test_json_prints_outcomes_then_summary() {
        let (status, lines) = run_with(&[
            "--rule",
            "checked_uint_add",
            "--max-bits",
            "16",
            "--json",
        ]);
        assert_eq!(status, EXIT_PASS);
        assert_eq!(lines.len(), 3);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["rule"], "checked_uint_add");
        assert_eq!(first["condition"], "overflow");
        assert_eq!(first["type_bits"], 8);
        assert_eq!(first["verdict"], "proven");

        let summary: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert_eq!(summary["widths_checked"], serde_json::json!([8, 16]));
        assert_eq!(summary["assertions"], 2);
    }

    #[test]
    fn test_timeout_fails_the_run() {
        let (status, lines) = run_with(&[
            "--rule",
            "checked_int_add",
            "--min-bits",
            "256",
            "--timeout-ms",
            "1",
        ]);
        assert_eq!(status, EXIT_FAIL);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("FAIL checked_int_add"));
    }
}
