use insights_core::{
    CategoryUniverse, Counter, CounterValue, Dimension, Record, RecordTable, ViewsConfig,
};
use insights_engine::{normalize, DimensionalAggregator, FilterSelection, FunnelSummary};
use proptest::prelude::*;

const REGIONS: [&str; 3] = ["North", "South", "East"];
const FEEDBACK: [&str; 3] = ["Good", "Neutral", "Bad"];
const STAGES: [&str; 3] = ["Active", "Dormant", "Churned"];

fn cell_strategy() -> impl Strategy<Value = CounterValue> {
    prop_oneof![
        6 => (0u32..500).prop_map(|n| CounterValue::Number(n as f64)),
        1 => (0u32..500).prop_map(|n| CounterValue::Text(n.to_string())),
        1 => Just(CounterValue::Text("n/a".to_string())),
        1 => Just(CounterValue::Missing),
        1 => Just(CounterValue::Number(f64::NAN)),
        1 => (-50i32..0).prop_map(|n| CounterValue::Number(n as f64)),
    ]
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        0usize..6,
        0usize..3,
        0usize..3,
        0usize..3,
        proptest::collection::vec(cell_strategy(), 5),
    )
        .prop_map(|(entity, region, feedback, stage, cells)| {
            let mut record: Record = Record::new(
                format!("driver-{entity}"),
                REGIONS[region],
                FEEDBACK[feedback],
                STAGES[stage],
            );
            for (counter, cell) in Counter::ALL.into_iter().zip(cells) {
                record = record.with_counter(counter, cell);
            }
            record
        })
}

fn table_strategy() -> impl Strategy<Value = RecordTable> {
    proptest::collection::vec(record_strategy(), 0..40).prop_map(RecordTable::new)
}

/// Rows whose funnel never widens: read, clicked and converted stay within sent.
fn consistent_table_strategy() -> impl Strategy<Value = RecordTable<f64>> {
    proptest::collection::vec((1u32..1000, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0), 1..30)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(sent, r, c, v)| {
                    let sent = sent as f64;
                    let read = (sent * r).floor();
                    let clicked = (read * c).floor();
                    let converted = (clicked * v).floor();
                    Record::<f64>::new("d", "North", "Good", "Active")
                        .with_counter(Counter::Sent, sent)
                        .with_counter(Counter::Read, read)
                        .with_counter(Counter::Clicked, clicked)
                        .with_counter(Counter::Converted, converted)
                })
                .collect::<RecordTable<f64>>()
        })
}

fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
    (
        proptest::sample::subsequence(REGIONS.to_vec(), 0..=3),
        proptest::sample::subsequence(FEEDBACK.to_vec(), 0..=3),
        proptest::sample::subsequence(STAGES.to_vec(), 0..=3),
    )
        .prop_map(|(regions, feedback, stages)| {
            FilterSelection::default()
                .with(Dimension::Region, regions)
                .with(Dimension::Feedback, feedback)
                .with(Dimension::LifecycleStage, stages)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn test_normalized_counters_are_finite_and_non_negative(table in table_strategy()) {
        let normalized = normalize(&table);
        for record in &normalized {
            for counter in Counter::ALL {
                let value = *record.counters.get(counter);
                prop_assert!(value.is_finite() && value >= 0.0, "{counter} = {value}");
            }
        }
    }

    #[test]
    fn test_normalization_is_idempotent(table in table_strategy()) {
        let once = normalize(&table);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_filtering_is_idempotent(
        table in table_strategy(),
        selection in selection_strategy(),
    ) {
        let table = normalize(&table);
        let once = selection.apply(&table);
        prop_assert_eq!(selection.apply(&once), once.clone());

        let superset = FilterSelection::all(&CategoryUniverse::snapshot(&table));
        prop_assert_eq!(superset.apply(&once), once);
    }

    #[test]
    fn test_rates_within_unit_interval_for_consistent_counters(
        table in consistent_table_strategy(),
    ) {
        let summary = FunnelSummary::compute(&table);
        for rate in [summary.read_rate, summary.click_rate, summary.conversion_rate] {
            prop_assert!((0.0..=1.0).contains(&rate), "rate {rate} out of range");
        }
    }

    #[test]
    fn test_stage_totals_sum_to_total_orders(
        table in table_strategy(),
        selection in selection_strategy(),
    ) {
        let universe = CategoryUniverse::snapshot(&table);
        let normalized = normalize(&selection.apply(&table));
        let summary = FunnelSummary::compute(&normalized);
        let stages = DimensionalAggregator::new(&universe, ViewsConfig::default())
            .orders_by_stage(&normalized);
        let stage_sum: f64 = stages.iter().map(|s| s.total_orders).sum();
        prop_assert!((stage_sum - summary.total_orders()).abs() < 1e-6);
    }

    #[test]
    fn test_crosstab_row_sums_match_feedback_counts(table in table_strategy()) {
        let universe = CategoryUniverse::snapshot(&table);
        let normalized = normalize(&table);
        let crosstab = DimensionalAggregator::new(&universe, ViewsConfig::default())
            .feedback_stage_crosstab(&normalized);
        for feedback in &crosstab.row_labels {
            let expected = normalized.iter().filter(|r| &r.feedback == feedback).count() as u64;
            prop_assert_eq!(crosstab.row_total(feedback), expected);
        }
        let total: u64 = crosstab.row_labels.iter().map(|f| crosstab.row_total(f)).sum();
        prop_assert_eq!(total, normalized.len() as u64);
    }

    #[test]
    fn test_grouped_sample_sizes_cover_every_row(table in table_strategy()) {
        let universe = CategoryUniverse::snapshot(&table);
        let normalized = normalize(&table);
        let aggregator = DimensionalAggregator::new(&universe, ViewsConfig::default());
        let regions: u64 = aggregator
            .conversion_by_region(&normalized)
            .iter()
            .map(|r| r.sample_size)
            .sum();
        let feedback: u64 = aggregator
            .feedback_metrics(&normalized)
            .iter()
            .map(|r| r.sample_size)
            .sum();
        let stages: u64 = aggregator
            .stage_means(&normalized)
            .iter()
            .map(|r| r.sample_size)
            .sum();
        prop_assert_eq!(regions, normalized.len() as u64);
        prop_assert_eq!(feedback, normalized.len() as u64);
        prop_assert_eq!(stages, normalized.len() as u64);
    }
}
