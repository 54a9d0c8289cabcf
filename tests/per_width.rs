//! One test per width for the signed rules, so a failure names its width.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use checked_arith_rules::{
    run_rule, ArithmeticRule, CheckedIntAdd, CheckedIntSub, CollectingObserver, RuleConfig,
};

fn assert_proven_at(rule: &dyn ArithmeticRule, bits: u32) {
    let observer = Arc::new(CollectingObserver::new());
    let summary = run_rule(
        rule,
        &RuleConfig::new().with_single_width(bits),
        observer.clone(),
    )
    .unwrap_or_else(|err| panic!("{err}"));

    let expected_assertions = if bits == 256 { 1 } else { 2 };
    assert_eq!(summary.widths_checked, vec![bits]);
    assert_eq!(summary.assertions, expected_assertions);
    assert!(observer.all_proven());
    assert!(observer
        .outcomes()
        .iter()
        .all(|outcome| outcome.type_bits == bits));
}

macro_rules! width_tests {
    ($rule:expr, $prefix:ident: $($bits:literal),+ $(,)?) => {
        $(
            pastey::paste! {
                #[test]
                fn [<$prefix _ $bits _bits>]() {
                    assert_proven_at(&$rule, $bits);
                }
            }
        )+
    };
}

width_tests!(CheckedIntAdd, checked_int_add:
    8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 120, 128,
    136, 144, 152, 160, 168, 176, 184, 192, 200, 208, 216, 224, 232, 240, 248, 256,
);

width_tests!(CheckedIntSub, checked_int_sub: 8, 64, 128, 248, 256);
