//! FILENAME: tests/test_properties.rs
//! Property tests: determinism, span conservation, sum consistency.

use pivot_engine::{generate_pivot, AggregationType, PivotConfig, Record};
use proptest::prelude::*;

const REGIONS: [&str; 3] = ["East", "West", "North"];
const PRODUCTS: [&str; 4] = ["Apples", "Oranges", "Pears", "Plums"];
const CHANNELS: [&str; 2] = ["Online", "Store"];

fn record_strategy() -> impl Strategy<Value = Record> {
    (0..REGIONS.len(), 0..PRODUCTS.len(), 0..CHANNELS.len(), 1..13u32, -500i32..500, 0i32..50)
        .prop_map(|(r, p, c, month, sales, units)| {
            Record::new()
                .with("Region", REGIONS[r])
                .with("Product", PRODUCTS[p])
                .with("Channel", CHANNELS[c])
                .with("OrderDate", format!("10-{month:02}-2023"))
                .with("Sales", sales)
                .with("Units", units)
        })
}

fn aggregation_strategy() -> impl Strategy<Value = AggregationType> {
    prop_oneof![
        Just(AggregationType::Sum),
        Just(AggregationType::Average),
        Just(AggregationType::Count),
        Just(AggregationType::Min),
        Just(AggregationType::Max),
    ]
}

fn config_strategy() -> impl Strategy<Value = PivotConfig> {
    let rows = prop::sample::subsequence(vec!["Region", "OrderDate_Quarter"], 0..=2);
    let columns = prop::sample::subsequence(vec!["Product", "Channel", "OrderDate_Month"], 0..=3);
    let values = prop::sample::subsequence(vec!["Sales", "Units"], 0..=2);
    (rows, columns, values, aggregation_strategy(), aggregation_strategy()).prop_map(
        |(rows, columns, values, sales_agg, units_agg)| {
            PivotConfig::new()
                .rows(rows)
                .columns(columns)
                .values(values)
                .aggregate("Sales", sales_agg)
                .aggregate("Units", units_agg)
        },
    )
}

proptest! {
    #[test]
    fn prop_generate_is_deterministic(
        records in prop::collection::vec(record_strategy(), 0..40),
        config in config_strategy(),
    ) {
        let first = generate_pivot(&records, &config);
        let second = generate_pivot(&records, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_header_rows_conserve_span(
        records in prop::collection::vec(record_strategy(), 1..40),
        config in config_strategy(),
    ) {
        prop_assume!(!config.value_fields.is_empty());
        let result = generate_pivot(&records, &config);
        prop_assume!(!result.is_empty());

        let expected = result.column_keys.len() * config.value_fields.len();
        prop_assert_eq!(result.header.depth, config.column_fields.len() + 1);
        for row in 0..result.header.depth {
            prop_assert_eq!(result.header.row_width(row), expected);
        }
    }

    #[test]
    fn prop_column_keys_have_one_part_per_field(
        records in prop::collection::vec(record_strategy(), 1..40),
        config in config_strategy(),
    ) {
        let result = generate_pivot(&records, &config);
        for key in &result.column_keys {
            prop_assert_eq!(key.len(), config.column_fields.len());
        }
        for key in &result.row_keys {
            prop_assert_eq!(key.len(), config.row_fields.len());
        }
    }

    #[test]
    fn prop_sum_grand_total_matches_dataset(
        records in prop::collection::vec(record_strategy(), 1..40),
    ) {
        let config = PivotConfig::new()
            .rows(["Region"])
            .columns(["Product", "Channel"])
            .values(["Sales"]);
        let result = generate_pivot(&records, &config);

        let direct: f64 = records
            .iter()
            .filter_map(|r| r.get("Sales").and_then(|v| v.as_number()))
            .sum();
        prop_assert_eq!(result.grand_total("Sales"), Some(direct));
    }
}
