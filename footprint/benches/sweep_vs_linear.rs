use criterion::AxisScale;
use criterion::PlotConfiguration;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use footprint::{Square, SweepVec};
use rand::Rng;

criterion_group!(benches, load, query);
criterion_main!(benches);

// a 600x600 pasture, squares up to one 30 wide cell
fn gen_squares(num: usize) -> Vec<(Square, usize)> {
    let mut rng = rand::rng();
    (0..num)
        .map(|i| {
            let x = rng.random_range(0.0..570.);
            let y = rng.random_range(0.0..570.);
            let edge = rng.random_range(7.0..30.);
            (Square::new([x, y], edge), i)
        })
        .collect()
}

fn plotconf() -> PlotConfiguration {
    PlotConfiguration::default().summary_scale(AxisScale::Logarithmic)
}

fn load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.plot_config(plotconf());
    group.warm_up_time(std::time::Duration::from_millis(200));
    group.measurement_time(std::time::Duration::from_secs(1));
    group.sample_size(50);
    for s in 3..8 {
        let num = 1 << (s * 2);
        let squares = gen_squares(num);
        group.bench_with_input(BenchmarkId::new("sweep", num), &num, |b, _num| {
            b.iter_with_setup(|| squares.clone(), SweepVec::new_from)
        });
    }
    group.finish();
}

fn query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    group.plot_config(plotconf());
    group.warm_up_time(std::time::Duration::from_millis(200));
    group.measurement_time(std::time::Duration::from_secs(1));
    group.sample_size(250);
    for s in 4..13 {
        let num = 1 << s;
        let squares = gen_squares(num);
        let mut rng = rand::rng();

        group.bench_with_input(BenchmarkId::new("linear", num), &num, |b, _num| {
            b.iter_with_setup(
                || Square::new([rng.random_range(0.0..570.), rng.random_range(0.0..570.)], 30.),
                |probe| {
                    squares
                        .iter()
                        .filter(|(s, _)| probe.near(s, 5.))
                        .map(|(_s, i)| *i)
                        .sum::<usize>()
                },
            )
        });

        let sweep = SweepVec::new_from(squares);
        group.bench_with_input(BenchmarkId::new("sweep", num), &num, |b, _num| {
            b.iter_with_setup(
                || Square::new([rng.random_range(0.0..570.), rng.random_range(0.0..570.)], 30.),
                |probe| {
                    // same amount of work on the results as the linear scan
                    sweep
                        .as_sweep_slice()
                        .query_near(black_box(&probe), 5.)
                        .map(|(_s, i)| *i)
                        .sum::<usize>()
                },
            )
        });
    }
    group.finish()
}
