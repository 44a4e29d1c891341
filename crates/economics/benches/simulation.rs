//! Benchmarks for simulation throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stakesim_economics::*;

fn proactive_params() -> SimulationParameters {
    SimulationParameters {
        staked_policy: Policy::Proactive {
            location: 0.06,
            scale: 0.01,
        },
        unstaked_policy: Policy::Proactive {
            location: 0.06,
            scale: 0.01,
        },
        ..Default::default()
    }
}

fn bench_next_state(c: &mut Criterion) {
    let params = proactive_params();
    let state = SimulationState::initial(&params, 5e8, 0.8).unwrap();

    c.bench_function("next_state", |b| {
        b.iter(|| next_state(black_box(&state), black_box(&params)))
    });
}

fn bench_full_run(c: &mut Criterion) {
    let params = proactive_params();
    let state = SimulationState::initial(&params, 5e8, 0.8).unwrap();
    let simulation = build_simulation(params, state, 200).unwrap();

    c.bench_function("run_200_years", |b| b.iter(|| simulation.run()));
}

fn bench_propensity_curve(c: &mut Criterion) {
    let grid = yield_grid(DEFAULT_MAX_YIELD, DEFAULT_SAMPLES);

    c.bench_function("propensity_curve", |b| {
        b.iter(|| propensity_curve(black_box(&grid), 0.06, 0.01))
    });
}

criterion_group!(
    benches,
    bench_next_state,
    bench_full_run,
    bench_propensity_curve
);
criterion_main!(benches);
