use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use u_makespan::bnb::BranchAndBound;
use u_makespan::cultural::{CulturalConfig, CulturalSolver};
use u_makespan::generator::InstanceGenerator;
use u_makespan::models::ProblemModel;
use u_makespan::scheduler::GreedyScheduler;

/// Small instances kept tiny enough for exact search.
fn instances() -> Vec<(u64, ProblemModel)> {
    (0..4)
        .map(|seed| {
            let problem = InstanceGenerator::small()
                .with_machines(2..=3)
                .with_jobs(3..=4)
                .with_tasks_per_job(2..=3)
                .with_seed(seed)
                .generate()
                .expect("preset ranges are valid");
            (seed, problem)
        })
        .collect()
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");
    group.sample_size(20);

    for (seed, problem) in instances() {
        let label = format!(
            "s{seed}-{}m{}j{}t",
            problem.machine_count(),
            problem.jobs().len(),
            problem.task_count()
        );

        group.bench_with_input(BenchmarkId::new("greedy", &label), &problem, |b, p| {
            b.iter(|| GreedyScheduler::new().schedule(black_box(p)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("bnb", &label), &problem, |b, p| {
            b.iter(|| BranchAndBound::new().solve(black_box(p)).unwrap())
        });

        let config = CulturalConfig::default()
            .with_population_size(100)
            .with_generation_count(20)
            .with_seed(seed);
        let solver = CulturalSolver::new().with_config(config);
        group.bench_with_input(BenchmarkId::new("cultural", &label), &problem, |b, p| {
            b.iter(|| solver.solve(black_box(p)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
