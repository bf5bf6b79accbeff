use sheetvault::benchmark::run_benchmarks;

fn main() {
    run_benchmarks();
}
