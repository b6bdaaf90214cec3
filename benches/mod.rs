use criterion::{criterion_group, criterion_main};

mod console;

criterion_group!(
    benches,
    console::parser::bench_feed_bulk,
    console::parser::bench_feed_bytewise,
    console::parser::bench_dispatch,
    console::adapter::bench_poll_loopback
);
criterion_main!(benches);
