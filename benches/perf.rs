use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use league_analyzer::availability::Availability;
use league_analyzer::engine::derive_all;
use league_analyzer::partition::partition_by_league;
use league_analyzer::synthetic;
use league_analyzer::{AggregateOptions, RawTable, aggregate};

fn bench_aggregate(c: &mut Criterion) {
    let table = synthetic::generate(synthetic::DEFAULT_SEED);
    let options = AggregateOptions::default();
    c.bench_function("aggregate_synthetic", |b| {
        b.iter(|| {
            let out = aggregate(black_box(&table), &options).unwrap();
            black_box(out.leagues.len());
        })
    });
}

fn bench_derivation(c: &mut Criterion) {
    let table = synthetic::generate(7);
    let availability = Availability::resolve(&table.column_set());
    let parts = partition_by_league(&table, 10);
    c.bench_function("derive_all_partitions", |b| {
        b.iter(|| {
            let derived = derive_all(black_box(&parts.kept), &availability);
            black_box(derived.len());
        })
    });
}

fn bench_csv_parse(c: &mut Criterion) {
    let table = synthetic::generate(3);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns()).unwrap();
    for record in table.records() {
        let row = table
            .columns()
            .iter()
            .map(|col| match record.get(col) {
                Some(league_analyzer::Cell::Number(v)) => v.to_string(),
                Some(league_analyzer::Cell::Text(s)) => s.clone(),
                None => String::new(),
            })
            .collect::<Vec<_>>();
        writer.write_record(&row).unwrap();
    }
    let bytes = writer.into_inner().unwrap();
    c.bench_function("raw_csv_parse", |b| {
        b.iter(|| {
            let parsed = RawTable::from_csv_reader(black_box(bytes.as_slice())).unwrap();
            black_box(parsed.len());
        })
    });
}

fn bench_synthetic_generate(c: &mut Criterion) {
    c.bench_function("synthetic_generate", |b| {
        b.iter(|| {
            let table = synthetic::generate(black_box(42));
            black_box(table.len());
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_derivation,
    bench_csv_parse,
    bench_synthetic_generate
);
criterion_main!(benches);
