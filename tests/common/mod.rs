//! Instrumented test sources shared by the buffer tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use lazyseq_core::sequence::{from_fn, Sequence};

/// Counters and a failure switch observed by `flaky`.
#[derive(Clone, Default)]
pub struct Gauge {
    pub opened: Arc<AtomicUsize>,
    pub pulled: Arc<AtomicUsize>,
    pub armed: Arc<AtomicBool>,
}

impl Gauge {
    pub fn armed() -> Self {
        let p = Self::default();
        p.armed.store(true, Ordering::SeqCst);
        p
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

/// Yields `items`, failing with `"boom at {fail_at}"` at that index while
/// the gauge is armed.
pub fn flaky(items: Vec<i32>, fail_at: usize, gauge: &Gauge) -> impl Sequence<Item = i32, Error = String> {
    let gauge = gauge.clone();
    from_fn(move || {
        gauge.opened.fetch_add(1, Ordering::SeqCst);
        let pulled = Arc::clone(&gauge.pulled);
        let armed = Arc::clone(&gauge.armed);
        Ok::<_, String>(items.clone().into_iter().enumerate().map(move |(i, v)| {
            pulled.fetch_add(1, Ordering::SeqCst);
            if i == fail_at && armed.load(Ordering::SeqCst) {
                Err(format!("boom at {i}"))
            } else {
                Ok(v)
            }
        }))
    })
}

/// A source whose cursor cannot be opened while the gauge is armed.
pub fn unopenable(items: Vec<i32>, gauge: &Gauge) -> impl Sequence<Item = i32, Error = String> {
    let gauge = gauge.clone();
    from_fn(move || {
        gauge.opened.fetch_add(1, Ordering::SeqCst);
        if gauge.armed.load(Ordering::SeqCst) {
            Err("source unavailable".to_string())
        } else {
            Ok(items.clone().into_iter().map(Ok::<i32, String>))
        }
    })
}
