//! Configuration tests: JSON loading and config-driven join options.

use lazyseq_core::compare::Natural;
use lazyseq_core::config::SeqConfig;
use lazyseq_core::join::{JoinOperation, JoinStrategy};
use lazyseq_operators::{join_with, JoinOptions, JoinSelectors};

#[test]
fn test_config_json_roundtrip() {
    let mut cfg = SeqConfig::default();
    cfg.buffer.backlog_warn_threshold = Some(1024);
    cfg.join.default_strategy = JoinStrategy::Merge;
    cfg.join.default_operation = JoinOperation::FullOuter;

    let json = serde_json::to_string(&cfg).expect("serialize config");
    assert!(json.contains("\"merge\""));
    assert!(json.contains("\"full_outer\""));
    let parsed = SeqConfig::from_json(&json).expect("parse config");
    assert_eq!(parsed, cfg);
}

#[test]
fn test_join_options_from_config() {
    let cfg = SeqConfig::from_json(
        r#"{"join": {"default_strategy": "loop", "default_operation": "left_outer", "hash_capacity_hint": 4}}"#,
    )
    .unwrap();
    let opts = JoinOptions::from_config(&cfg.join);
    assert_eq!(opts.strategy, JoinStrategy::Loop);
    assert_eq!(opts.operation, JoinOperation::LeftOuter);
    assert_eq!(opts.hash_capacity_hint, 4);

    let selectors = JoinSelectors::new(|l: &i32| *l, |r: &i32| *r, |l: &i32, r: &i32| l * 10 + r)
        .left_only(|l: &i32| -l);
    let rows: Vec<i32> = join_with(vec![1, 2], vec![2], opts, selectors, Natural)
        .unwrap()
        .collect();
    assert_eq!(rows, vec![-1, 22]);
}

#[test]
fn test_join_options_serde() {
    let opts = JoinOptions {
        strategy: JoinStrategy::Hash,
        operation: JoinOperation::RightOuter,
        hash_capacity_hint: 32,
    };
    let json = serde_json::to_string(&opts).unwrap();
    let back: JoinOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, opts);
}
