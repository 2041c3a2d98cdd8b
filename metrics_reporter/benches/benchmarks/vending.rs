use criterion::{black_box, Criterion};
use metrics_reporter::{
    new_reporter, Backend, MetricConfiguration, PrometheusReporter, Reporter,
    ReporterConfiguration, SharedRegistry,
};

pub fn vending(criterion: &mut Criterion) {
    let _ = env_logger::builder().is_test(false).try_init();

    let mut group = criterion.benchmark_group("vending");

    let configuration = MetricConfiguration::new("requests", ["route"]);
    for (backend_name, backend) in [
        ("noop", Backend::Noop),
        ("prometheus", Backend::Prometheus(SharedRegistry::new())),
    ] {
        let reporter = new_reporter(backend, &ReporterConfiguration::new("bench"));
        // The first request registers; every request after it is a cache hit.
        reporter.counter(&configuration);

        group.bench_with_input(
            format!("{backend_name}-cached-counter"),
            &configuration,
            |bencher, configuration| bencher.iter(|| black_box(reporter.counter(configuration))),
        );
    }

    // Registration itself: create and forget a path on every iteration.
    let reporter =
        PrometheusReporter::new(SharedRegistry::new(), &ReporterConfiguration::new("bench"));
    group.bench_function("prometheus-register-unregister", |bencher| {
        bencher.iter(|| {
            black_box(reporter.counter(&configuration));
            reporter.unregister("requests")
        })
    });
}

criterion::criterion_group!(benches, vending);
