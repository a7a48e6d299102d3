//! Integration test: cleaning pass over a raw search log

use hotelsort::preprocessing::Cleaner;
use polars::prelude::*;

/// A small raw search log covering every column the cleaning policy touches.
fn raw_df() -> DataFrame {
    let mut columns: Vec<Column> = vec![
        Column::new("srch_id".into(), &[1i64, 1, 2]),
        Column::new(
            "date_time".into(),
            &["2013-01-01 10:00:00", "2013-01-01 10:00:00", "2013-02-02 11:30:00"],
        ),
        Column::new("prop_id".into(), &[100i64, 101, 102]),
        Column::new("price_usd".into(), &[120.5, 89.0, 210.0]),
        Column::new("prop_review_score".into(), &[Some(4.5), None, Some(3.0)]),
        Column::new("prop_location_score2".into(), &[Some(0.2), Some(0.4), None]),
        Column::new("visitor_hist_starrating".into(), &[None, Some(4.0), None]),
        Column::new("visitor_hist_adr_usd".into(), &[None, Some(150.0), None]),
        Column::new("srch_query_affinity_score".into(), &[None, None, Some(-10.5)]),
        Column::new("orig_destination_distance".into(), &[Some(500.0), None, Some(120.0)]),
        Column::new("position".into(), &[3i64, 7, 1]),
        Column::new("click_bool".into(), &[1i64, 0, 1]),
        Column::new("booking_bool".into(), &[0i64, 0, 1]),
        Column::new("gross_bookings_usd".into(), &[None, None, Some(210.0)]),
    ];

    for i in 1..=8 {
        columns.push(Column::new(
            format!("comp{i}_rate").into(),
            &[Some(1i64), None, Some(-1)],
        ));
        columns.push(Column::new(
            format!("comp{i}_inv").into(),
            &[None, Some(0i64), None],
        ));
        columns.push(Column::new(
            format!("comp{i}_rate_percent_diff").into(),
            &[Some(12.5), None, None],
        ));
    }

    DataFrame::new(columns).unwrap()
}

const FILL_COLUMNS: [&str; 6] = [
    "prop_review_score",
    "prop_location_score2",
    "visitor_hist_starrating",
    "visitor_hist_adr_usd",
    "srch_query_affinity_score",
    "orig_destination_distance",
];

#[test]
fn test_no_missing_values_after_cleaning() {
    let cleaned = Cleaner::new().apply(&raw_df()).unwrap();

    for name in FILL_COLUMNS {
        assert_eq!(
            cleaned.column(name).unwrap().null_count(),
            0,
            "{} should have no missing values",
            name
        );
    }

    for i in 1..=8 {
        for suffix in ["rate", "inv", "rate_percent_diff"] {
            let name = format!("comp{i}_{suffix}");
            assert_eq!(
                cleaned.column(&name).unwrap().null_count(),
                0,
                "{} should have no missing values",
                name
            );
        }
    }
}

#[test]
fn test_fill_values_are_exact() {
    let cleaned = Cleaner::new().apply(&raw_df()).unwrap();

    let review = cleaned.column("prop_review_score").unwrap().f64().unwrap();
    assert_eq!(review.get(0), Some(4.5), "present value must be untouched");
    assert_eq!(review.get(1), Some(0.0), "missing review score becomes 0");

    let starrating = cleaned
        .column("visitor_hist_starrating")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(starrating.get(0), Some(3.0));
    assert_eq!(starrating.get(1), Some(4.0));
    assert_eq!(starrating.get(2), Some(3.0));

    let distance = cleaned
        .column("orig_destination_distance")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(distance.get(1), Some(-1.0), "unknown distance becomes -1");

    let affinity = cleaned
        .column("srch_query_affinity_score")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(affinity.get(0), Some(0.0));
    assert_eq!(affinity.get(2), Some(-10.5));
}

#[test]
fn test_dropped_columns_and_order() {
    let raw = raw_df();
    let cleaned = Cleaner::new().apply(&raw).unwrap();

    for name in ["date_time", "gross_bookings_usd", "position"] {
        assert!(
            cleaned.column(name).is_err(),
            "{} should be dropped",
            name
        );
    }

    let expected: Vec<String> = raw
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .filter(|n| !["date_time", "gross_bookings_usd", "position"].contains(&n.as_str()))
        .collect();
    let actual: Vec<String> = cleaned
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();

    assert_eq!(actual, expected, "surviving columns keep their order");
}

#[test]
fn test_competitor_columns_types_and_values() {
    let cleaned = Cleaner::new().apply(&raw_df()).unwrap();

    for i in 1..=8 {
        let rate = cleaned.column(&format!("comp{i}_rate")).unwrap();
        let inv = cleaned.column(&format!("comp{i}_inv")).unwrap();
        let diff = cleaned
            .column(&format!("comp{i}_rate_percent_diff"))
            .unwrap();

        assert_eq!(rate.dtype(), &DataType::Int64);
        assert_eq!(inv.dtype(), &DataType::Int64);
        assert_eq!(diff.dtype(), &DataType::Float64);
    }

    let rate = cleaned.column("comp1_rate").unwrap().i64().unwrap();
    assert_eq!(rate.get(0), Some(1));
    assert_eq!(rate.get(1), Some(0));
    assert_eq!(rate.get(2), Some(-1));

    let inv = cleaned.column("comp1_inv").unwrap().i64().unwrap();
    assert_eq!(inv.get(0), Some(0));

    let diff = cleaned
        .column("comp1_rate_percent_diff")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(diff.get(0), Some(12.5), "fractional values survive");
    assert_eq!(diff.get(1), Some(0.0));
}

#[test]
fn test_csv_round_trip() {
    let cleaned = Cleaner::new().apply(&raw_df()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned.csv");

    hotelsort::data::write_csv(&cleaned, &path).unwrap();
    let loaded = hotelsort::data::load_csv(&path).unwrap();

    assert_eq!(loaded.shape(), cleaned.shape());
    assert_eq!(loaded.get_column_names(), cleaned.get_column_names());

    // Spot-check values of each kind: filled float, integer-cast, untouched
    let starrating = loaded
        .column("visitor_hist_starrating")
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(starrating.get(0), Some(3.0));
    assert_eq!(starrating.get(1), Some(4.0));

    let rate = loaded.column("comp5_rate").unwrap().i64().unwrap();
    assert_eq!(rate.get(2), Some(-1));

    let price = loaded.column("price_usd").unwrap().f64().unwrap();
    assert_eq!(price.get(0), Some(120.5));
}

#[test]
fn test_missing_expected_column_aborts() {
    let incomplete = raw_df().drop("comp3_inv").unwrap();
    assert!(Cleaner::new().apply(&incomplete).is_err());
}
