//! Memoize buffer tests: replay to late consumers and single evaluation.

mod common;

use common::{flaky, Gauge};
use lazyseq_buffer::{memoize, memoize_with_config, publish, Buffer, BufferError};
use lazyseq_core::config::BufferConfig;
use lazyseq_core::sequence::{repeatable, Sequence};

#[test]
fn test_memoize_replays_to_late_cursor() {
    let gauge = Gauge::default();
    let buf = memoize(flaky(vec![5, 6, 7], usize::MAX, &gauge));

    let mut first = buf.cursor().unwrap();
    assert_eq!(first.next(), Some(Ok(5)));
    assert_eq!(first.next(), Some(Ok(6)));
    assert_eq!(buf.count(), 2);

    let late: Vec<i32> = buf.cursor().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(late, vec![5, 6, 7]);
    assert_eq!(first.next(), Some(Ok(7)));
    assert_eq!(first.next(), None);

    assert_eq!(gauge.opened(), 1);
    assert_eq!(gauge.pulled(), 3);
    assert_eq!(buf.count(), 3);
}

#[test]
fn test_memoize_error_at_position() {
    let gauge = Gauge::armed();
    let buf = memoize(flaky(vec![1, 2, 3], 1, &gauge));
    let err = BufferError::Source("boom at 1".to_string());

    let mut a = buf.cursor().unwrap();
    assert_eq!(a.next(), Some(Ok(1)));
    let failure = a.next().unwrap().unwrap_err();
    assert!(failure.is_source());
    assert_eq!(failure.clone().into_source().as_deref(), Some("boom at 1"));
    assert_eq!(failure, err);

    // A new cursor replays the cached prefix, then hits the same failure.
    let mut b = buf.cursor().unwrap();
    assert_eq!(b.next(), Some(Ok(1)));
    assert_eq!(b.next(), Some(Err(err)));
    assert_eq!(gauge.pulled(), 2);

    gauge.disarm();
    buf.reset();
    assert_eq!(buf.count(), 0);
    let values: Vec<i32> = buf.cursor().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_memoize_cache_threshold_crossed_once() {
    let cfg = BufferConfig {
        backlog_warn_threshold: Some(3),
    };
    let buf = memoize_with_config(repeatable(0..10), &cfg);
    let first: Vec<i32> = buf.cursor().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(first.len(), 10);
    assert_eq!(buf.threshold_crossings(), 1);

    // Replays come from the cache and do not grow it.
    let replay: Vec<i32> = buf.cursor().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(replay, first);
    assert_eq!(buf.threshold_crossings(), 1);

    // After a reset the cache refills and crosses again.
    buf.reset();
    assert_eq!(buf.cursor().unwrap().count(), 10);
    assert_eq!(buf.threshold_crossings(), 2);
}

#[test]
fn test_memoize_dispose() {
    let buf = memoize(repeatable(vec![1]));
    let mut c = buf.cursor().unwrap();
    buf.dispose();
    let err = c.next().unwrap().unwrap_err();
    assert_eq!(err, BufferError::Disposed);
    assert!(!err.is_source());
    assert_eq!(err.into_source(), None);
    assert_eq!(buf.count(), 0);
}

#[test]
fn test_buffers_compose_as_sequences() {
    // A memoized buffer is itself a sequence; publishing it fans out a
    // replayable source.
    let memo = memoize(repeatable(vec!['a', 'b']));
    let seq_cursor = Sequence::cursor(&memo).unwrap();
    assert_eq!(seq_cursor.count(), 2);

    let fan = publish(memo);
    let a = fan.cursor().unwrap();
    let b = fan.cursor().unwrap();
    let out: Vec<char> = a.chain(b).map(|r| r.unwrap()).collect();
    assert_eq!(out, vec!['a', 'b', 'a', 'b']);
}
