use criterion::criterion_main;

mod benchmarks;

criterion_main! {
    benchmarks::recording::benches,
    benchmarks::vending::benches,
}
