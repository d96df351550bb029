//! Properties of the classifier and the reconciler over random tables.

use std::collections::BTreeSet;

use airq_ingest::SecondaryArchive;
use airq_model::{DailyRecord, DailyTable, MissingKind, MissingReport, day_range, format_day};
use airq_reconcile::{classify, reconcile};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Rows for distinct day offsets, in arbitrary order, with random gaps in values.
fn arb_table() -> impl Strategy<Value = DailyTable> {
    prop::collection::btree_map(
        0u64..60,
        (prop::option::of(0i64..300), prop::option::of(0i64..150)),
        1..40,
    )
    .prop_flat_map(|rows| {
        let rows: Vec<_> = rows.into_iter().collect();
        Just(rows).prop_shuffle()
    })
    .prop_map(|rows| {
        let records = rows
            .into_iter()
            .map(|(offset, (pm10, pm25))| {
                let date = base_day().checked_add_days(Days::new(offset)).unwrap();
                DailyRecord::new("중구", date, pm10, pm25)
            })
            .collect();
        DailyTable::from_records("중구", records)
    })
}

proptest! {
    #[test]
    fn categories_are_disjoint_and_cover_missing_days(table in arb_table()) {
        let report = classify(&table).unwrap();

        let mut seen = BTreeSet::new();
        for kind in MissingKind::ALL {
            for date in report.dates(kind) {
                prop_assert!(seen.insert(date.clone()), "{date} listed twice");
            }
        }

        let (first, last) = table.date_span().unwrap();
        let expected: BTreeSet<String> = day_range(first, last)
            .filter(|day| {
                let rows: Vec<_> = table.rows_on(*day).collect();
                rows.is_empty()
                    || rows.iter().all(|r| r.pm10.is_none())
                    || rows.iter().all(|r| r.pm25.is_none())
            })
            .map(format_day)
            .collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn no_date_entries_are_ascending(table in arb_table()) {
        let report = classify(&table).unwrap();
        let dates = report.dates(MissingKind::NoDate);
        prop_assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn empty_report_only_sorts(table in arb_table()) {
        let out = reconcile(&table, &MissingReport::new(), &SecondaryArchive::new()).unwrap();

        prop_assert_eq!(out.table, table.sorted_by_date());
        prop_assert!(out.remaining.is_empty());
        prop_assert_eq!(out.summary.inserted, 0);
    }

    #[test]
    fn placeholders_close_the_calendar(table in arb_table()) {
        let report = classify(&table).unwrap();
        let out = reconcile(&table, &report, &SecondaryArchive::new()).unwrap();

        let (first, last) = table.date_span().unwrap();
        let expected = (last - first).num_days() as usize + 1;
        prop_assert_eq!(out.table.len(), expected);
        prop_assert_eq!(out.summary.inserted, report.count(MissingKind::NoDate));
        prop_assert!(out.remaining.dates(MissingKind::NoDate).is_empty());
    }
}
