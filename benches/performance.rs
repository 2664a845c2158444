use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lazyseq_buffer::{memoize, publish};
use lazyseq_core::compare::Natural;
use lazyseq_core::join::{JoinOperation, JoinStrategy};
use lazyseq_core::sequence::repeatable;
use lazyseq_operators::{join, JoinSelectors};

type Rec = (u32, u64);

fn make_side(rows: usize, keys: u32) -> Vec<Rec> {
    let mut out: Vec<Rec> = (0..rows)
        .map(|i| ((i as u32).wrapping_mul(2654435761) % keys, i as u64))
        .collect();
    // Merge needs key-sorted input; sort both sides for every strategy.
    out.sort_by_key(|r| r.0);
    out
}

fn selectors<'a>() -> JoinSelectors<'a, Rec, Rec, u32, u64> {
    JoinSelectors::new(|l: &Rec| l.0, |r: &Rec| r.0, |l: &Rec, r: &Rec| l.1 ^ r.1)
        .left_only(|l: &Rec| l.1)
        .right_only(|r: &Rec| r.1)
}

fn bench_join_strategies(c: &mut Criterion) {
    let left = make_side(2048, 512);
    let right = make_side(1024, 768);
    let mut group = c.benchmark_group("join_outer");
    for strategy in [JoinStrategy::Loop, JoinStrategy::Hash, JoinStrategy::Merge] {
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &strategy, |b, &s| {
            b.iter(|| {
                let operation = if s == JoinStrategy::Loop {
                    JoinOperation::LeftOuter
                } else {
                    JoinOperation::FullOuter
                };
                join(left.iter().copied(), right.iter().copied(), s, operation, selectors(), Natural)
                    .unwrap()
                    .fold(0u64, |acc, v| acc.wrapping_add(v))
            })
        });
    }
    group.finish();
}

fn bench_publish_fanout(c: &mut Criterion) {
    let source: Vec<u64> = (0..4096).collect();
    let mut group = c.benchmark_group("publish_fanout");
    for consumers in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(consumers), &consumers, |b, &n| {
            b.iter(|| {
                let buf = publish(repeatable(source.clone()));
                let mut cursors: Vec<_> = (0..n).map(|_| buf.cursor().unwrap()).collect();
                let mut total = 0u64;
                let mut live = n;
                while live > 0 {
                    live = 0;
                    for cursor in cursors.iter_mut() {
                        if let Some(v) = cursor.next() {
                            total = total.wrapping_add(v.unwrap());
                            live += 1;
                        }
                    }
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_memoize_replay(c: &mut Criterion) {
    let source: Vec<u64> = (0..4096).collect();
    c.bench_function("memoize_replay_4x", |b| {
        b.iter(|| {
            let buf = memoize(repeatable(source.clone()));
            let mut total = 0u64;
            for _ in 0..4 {
                for v in buf.cursor().unwrap() {
                    total = total.wrapping_add(v.unwrap());
                }
            }
            total
        })
    });
}

criterion_group!(
    benches,
    bench_join_strategies,
    bench_publish_fanout,
    bench_memoize_replay
);
criterion_main!(benches);
