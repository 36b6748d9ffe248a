//! FILENAME: core/pivot-engine/benches/pivot_calculations.rs
//! Benchmarks for the pivot pipeline on synthetic sales data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pivot_engine::{aggregate, generate_pivot, AggregationType, PivotConfig, Record};

const REGIONS: [&str; 6] = ["North", "South", "East", "West", "Central", "Overseas"];
const PRODUCTS: [&str; 8] = [
    "Apples", "Oranges", "Pears", "Plums", "Grapes", "Cherries", "Lemons", "Limes",
];

fn sales_records(rows: usize) -> Vec<Record> {
    (0..rows)
        .map(|i| {
            let day = i % 28 + 1;
            let month = (i / 28) % 12 + 1;
            let year = 2020 + (i / 336) % 4;
            Record::new()
                .with("Region", REGIONS[i % REGIONS.len()])
                .with("Product", PRODUCTS[i.wrapping_mul(7) % PRODUCTS.len()])
                .with("OrderDate", format!("{day:02}-{month:02}-{year}"))
                .with("Sales", (i % 1000) as f64 * 1.25)
                .with("Units", (i % 9 + 1) as f64)
        })
        .collect()
}

fn date_config() -> PivotConfig {
    PivotConfig::new()
        .rows(["Region", "Product"])
        .columns(["OrderDate_Year", "OrderDate_Quarter"])
        .values(["Sales", "Units"])
        .aggregate("Units", AggregationType::Average)
}

fn bench_generate_pivot(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_pivot");
    let config = date_config();

    for rows in [1_000usize, 10_000, 100_000] {
        let records = sales_records(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &records, |b, records| {
            b.iter(|| generate_pivot(black_box(records), black_box(&config)))
        });
    }
    group.finish();
}

fn bench_aggregate_only(c: &mut Criterion) {
    let records = sales_records(50_000);
    let config = PivotConfig::new()
        .rows(["Region"])
        .columns(["Product"])
        .values(["Sales"])
        .aggregate("Sales", AggregationType::Max);

    c.bench_function("aggregate_flat_50k", |b| {
        b.iter(|| aggregate(black_box(&records), black_box(&config)))
    });
}

fn bench_wide_header(c: &mut Criterion) {
    let records = sales_records(20_000);
    let config = PivotConfig::new()
        .rows(["Region"])
        .columns(["OrderDate_Year", "OrderDate_Month", "Product"])
        .values(["Sales", "Units"]);

    c.bench_function("wide_header_20k", |b| {
        b.iter(|| generate_pivot(black_box(&records), black_box(&config)))
    });
}

criterion_group!(benches, bench_generate_pivot, bench_aggregate_only, bench_wide_header);
criterion_main!(benches);
