//! Benchmarks for the Life simulator and fitness evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use methuselah::{
    Board, Coord, Simulator,
    compute::evolution::{BoardRng, EvaluationCache, FitnessEvaluator, Population},
    schema::EvolutionConfig,
};

fn r_pentomino(size: usize) -> Board {
    let center = (size / 2) as i32;
    Board::from_pattern(".##\n##.\n.#.", Coord::new(center - 1, center - 1))
}

fn bench_simulator_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_step");

    // Warm the pattern up so the frontier has a realistic size.
    for warmup in [0, 100, 500] {
        let mut sim = Simulator::new(r_pentomino(200), 200);
        for _ in 0..warmup {
            sim.step();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("after_{}", warmup)),
            &warmup,
            |b, _| {
                b.iter_batched(
                    || sim.clone(),
                    |mut sim| sim.step(),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(20);

    for size in [40, 100] {
        let evaluator = FitnessEvaluator::new(size, 1500);
        let board = r_pentomino(size);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| evaluator.evaluate(black_box(&board)));
            },
        );
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_population");
    group.sample_size(10);

    let config = EvolutionConfig {
        population_size: 64,
        max_turns: 500,
        ..Default::default()
    };
    let evaluator = FitnessEvaluator::from_config(&config);
    let mut rng = BoardRng::new(42);
    let Ok(population) = Population::random(&mut rng, &config) else {
        return;
    };

    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "parallel" } else { "sequential" }),
            &parallel,
            |b, &parallel| {
                b.iter_batched(
                    || (population.clone(), EvaluationCache::new()),
                    |(mut population, mut cache)| population.rank(&evaluator, &mut cache, parallel),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_simulator_step, bench_evaluate, bench_rank);
criterion_main!(benches);
