//! # Message Store Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | `set_message` (domain) | < 1µs |
//! | `compute_store_address` | < 5µs |
//! | `set_message` via service + bus | < 50µs |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use message_store::domain::validate_message;
use message_store::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

fn random_message(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn bench_domain_writes(c: &mut Criterion) {
    let owner = Address::repeat_byte(0x01);
    let mut group = c.benchmark_group("domain");

    for len in [1usize, 64, MAX_MESSAGE_LENGTH] {
        let message = random_message(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("set_message", len), &message, |b, m| {
            b.iter_batched_ref(
                || MessageStore::deploy(owner, 0, 0).unwrap(),
                |store| black_box(store.set_message(owner, m).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("validate_message_too_long", |b| {
        let message = random_message(MAX_MESSAGE_LENGTH + 1);
        b.iter(|| black_box(validate_message(&message).is_err()));
    });

    group.bench_function("compute_store_address", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            black_box(compute_store_address(owner, nonce))
        });
    });

    group.finish();
}

fn bench_service_writes(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let owner = Address::repeat_byte(0x01);
    let bus = Arc::new(InMemoryEventBus::new());
    let _watcher = bus.subscribe(EventFilter::all());
    let service = runtime
        .block_on(MessageStoreService::deploy(
            owner,
            &FixedClock(0),
            Arc::clone(&bus),
            ServiceConfig {
                deployer_nonce: 0,
                enable_invariant_checks: false,
            },
        ))
        .unwrap();

    let message = random_message(64);
    c.bench_function("service/set_message", |b| {
        b.iter(|| {
            runtime
                .block_on(service.set_message(owner, message.clone()))
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_domain_writes, bench_service_writes);
criterion_main!(benches);
