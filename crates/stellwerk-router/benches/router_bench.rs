// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for registry churn and event dispatch throughput in
// the stellwerk-router crate.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use stellwerk_core::types::{CorrelationKey, NativeEvent};
use stellwerk_router::{EventRouter, EventSink};

/// Sink that swallows everything.
struct NullSink;
impl EventSink for NullSink {}

fn bench_registry_churn(c: &mut Criterion) {
    c.bench_function("register_unregister_cycle", |b| {
        let (router, _pump) = EventRouter::new();
        let sink: Arc<dyn EventSink> = Arc::new(NullSink);
        b.iter(|| {
            let handle = router.register(black_box(&sink));
            black_box(handle.id());
            // handle drop unregisters
        });
    });
}

fn bench_broadcast_dispatch(c: &mut Criterion) {
    c.bench_function("broadcast_to_16_instances", |b| {
        let (router, mut pump) = EventRouter::new();
        let sinks: Vec<Arc<dyn EventSink>> = (0..16).map(|_| Arc::new(NullSink) as Arc<dyn EventSink>).collect();
        let _handles: Vec<_> = sinks.iter().map(|s| router.register(s)).collect();

        b.iter(|| {
            router.dispatch(black_box(NativeEvent::KeyboardHeightChanged { height: 240 }));
            pump.drain()
        });
    });
}

fn bench_targeted_dispatch(c: &mut Criterion) {
    c.bench_function("targeted_dispatch_among_64_instances", |b| {
        let (router, mut pump) = EventRouter::new();
        let sinks: Vec<Arc<dyn EventSink>> = (0..64).map(|_| Arc::new(NullSink) as Arc<dyn EventSink>).collect();
        let handles: Vec<_> = sinks.iter().map(|s| router.register(s)).collect();
        for (i, handle) in handles.iter().enumerate() {
            handle
                .claim_notifications(CorrelationKey::new("bench", i as i32))
                .expect("claim");
        }

        let key = CorrelationKey::new("bench", 63);
        b.iter(|| {
            router.dispatch(black_box(NativeEvent::NotificationReceived {
                key: key.clone(),
                manager_name: "bench".into(),
            }));
            pump.drain()
        });
    });
}

criterion_group!(
    benches,
    bench_registry_churn,
    bench_broadcast_dispatch,
    bench_targeted_dispatch
);
criterion_main!(benches);
