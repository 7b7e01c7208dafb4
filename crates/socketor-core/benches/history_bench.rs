//! Criterion benchmarks for the message history and envelope translation.
//!
//! Every received line goes through `translate` and `MessageHistory::append`,
//! so both sit on the display path of a busy connection.
//!
//! Run with:
//! ```bash
//! cargo bench --package socketor-core --bench history_bench
//! ```

use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use socketor_core::{translate, BackendMessageEnvelope, MessageHistory, MessageItem, OwnerType};

fn bench_append_when_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_append_full");
    for bound in [100usize, 1_000, 10_000] {
        let mut history = MessageHistory::new(NonZeroUsize::new(bound).unwrap());
        for i in 0..bound {
            history.append(MessageItem::new(format!("seed {i}"), OwnerType::Receive));
        }
        group.bench_with_input(BenchmarkId::from_parameter(bound), &bound, |b, _| {
            b.iter(|| {
                let evicted =
                    history.append(MessageItem::new("payload line", OwnerType::Receive));
                black_box(evicted)
            })
        });
    }
    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let envelope = BackendMessageEnvelope::new("GET / HTTP/1.1", "Receive");
    c.bench_function("translate_receive", |b| {
        b.iter(|| translate(black_box(&envelope)))
    });

    let line = r#"{"content":"GET / HTTP/1.1","msg_type":"Receive"}"#;
    c.bench_function("parse_and_translate", |b| {
        b.iter(|| {
            let envelope = BackendMessageEnvelope::from_json(black_box(line)).unwrap();
            translate(&envelope)
        })
    });
}

criterion_group!(benches, bench_append_when_full, bench_translate);
criterion_main!(benches);
