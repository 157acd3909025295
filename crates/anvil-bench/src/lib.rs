//! Placeholder library target so the `anvil-bench` package can host
//! `[[bench]]` targets; the actual benchmarks live under `benches/`.
