use airlog::visits::{parse_visit_log, AirportTally};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CODES: [&str; 12] = [
    "JFK", "LAX", "ORD", "ATL", "LHR", "CDG", "FRA", "AMS", "NRT", "SIN", "SYD", "GRU",
];
const FLAGS: [&str; 5] = ["A", "D", "A D", "L", "ADL"];

fn synthetic_log(lines: usize, seed: usize) -> String {
    let mut text = String::from("# synthetic visit log\n");
    for i in 0..lines {
        let code = CODES[(i * 7 + seed) % CODES.len()];
        let flags = FLAGS[(i + seed) % FLAGS.len()];
        text.push_str(&format!("{code} {flags}\n"));
        if i % 25 == 0 {
            text.push_str("\n# layover notes\n");
        }
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let log = synthetic_log(2_000, 0);
    c.bench_function("parse_visit_log_2000_lines", |b| {
        b.iter(|| parse_visit_log(black_box(&log)))
    });
}

fn bench_tally(c: &mut Criterion) {
    let logs: Vec<_> = (0..200)
        .map(|seed| parse_visit_log(&synthetic_log(50, seed)))
        .collect();
    c.bench_function("airport_tally_200_users", |b| {
        b.iter(|| black_box(&logs).iter().collect::<AirportTally>())
    });
}

criterion_group!(benches, bench_parse, bench_tally);
criterion_main!(benches);
