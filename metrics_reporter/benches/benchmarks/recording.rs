use std::{
    cmp::{max, min},
    collections::HashMap,
    time::Instant,
};

use criterion::Criterion;
use metrics_reporter::{
    new_reporter, Backend, LabelValues, MetricConfiguration, ReporterConfiguration,
    SharedRegistry,
};
use rand::seq::SliceRandom;

const ROUTES: [&str; 4] = ["/", "/cart", "/checkout", "/search"];

pub fn recording(criterion: &mut Criterion) {
    let _ = env_logger::builder().is_test(false).try_init();

    let mut group = criterion.benchmark_group("recording");
    group.throughput(criterion::Throughput::Elements(1));

    let configuration = MetricConfiguration::new("requests", ["route"]);
    for (backend_name, backend) in [
        ("noop", Backend::Noop),
        ("prometheus", Backend::Prometheus(SharedRegistry::new())),
    ] {
        let reporter = new_reporter(backend, &ReporterConfiguration::new("bench"));
        let cached_counter = reporter.counter(&configuration);

        for threads in [1, 2, 4, 8, 16] {
            group.bench_function(format!("{backend_name}-concurrency-{threads:02}"), |bencher| {
                bencher.iter_custom(|iterations| {
                    let thread_count = max(1, min(threads, iterations));
                    let iterations_per_thread = iterations / thread_count;

                    let start = Instant::now();
                    std::thread::scope(|scope| {
                        for _ in 0..thread_count {
                            scope.spawn(|| {
                                let mut random = rand::thread_rng();
                                let labels: Vec<LabelValues<'_>> = (0..16)
                                    .map(|_| {
                                        HashMap::from([(
                                            "route",
                                            *ROUTES.choose(&mut random).unwrap_or(&"/"),
                                        )])
                                    })
                                    .collect();
                                for i in 0..iterations_per_thread {
                                    cached_counter.count(1.0, &labels[i as usize % labels.len()]);
                                }
                            });
                        }
                    });

                    start.elapsed()
                });
            });
        }
    }
}

criterion::criterion_group!(benches, recording);
