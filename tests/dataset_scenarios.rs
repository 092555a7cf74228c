use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Write};

use citmap::{
    load_dataset_csv, read_dataset, AggregationConfig, AggregationStore, Attr, DecodedRow, Metric,
    MinimumTracking, BLUES_7,
};

const HEADER: &str = "Year,Country,Alpha3,Queued,Dequeued,Granted,Refused,Canceled,Pending,AvgProcessingTime\n";

fn dataset(body: &str) -> citmap::Dataset {
    read_dataset(Cursor::new(format!("{HEADER}{body}")), AggregationConfig::default())
        .expect("fixture CSV should decode")
}

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn duplicate_rows_sum_granted() {
    let mut store = AggregationStore::new();
    for granted in ["10", "5"] {
        let row = DecodedRow::from_fields(
            &fields(&[
                ("Year", "2020"),
                ("Country", "United States"),
                ("Alpha3", "USA"),
                ("Granted", granted),
                ("Queued", "0"),
                ("Dequeued", "0"),
                ("Refused", "0"),
                ("Canceled", "0"),
                ("Pending", "0"),
                ("AvgProcessingTime", "0"),
            ]),
            1,
        )
        .unwrap();
        store.fold(row);
    }
    let d = store.finish();
    assert_eq!(d.region_in("2020", "USA").unwrap().granted(), 15.0);
}

#[test]
fn two_rows_average_processing_time_with_floor() {
    let d = dataset("2020,Chile,CHL,1,1,1,1,1,1,100\n2020,Chile,CHL,1,1,1,1,1,1,45\n");
    let r = d.region_in("2020", "CHL").unwrap();
    assert_eq!(r.avg_processing_time(), Some(72.0));
    assert_eq!(r.incoming(), 2.0);
    assert_eq!(r.refused(), 2.0);
}

#[test]
fn unseen_region_in_known_year_is_empty_record() {
    let d = dataset("2020,Chile,CHL,1,1,1,1,1,1,100\n");
    let r = d.region_in("2020", "ZZZ").expect("known year returns a record");
    assert_eq!(r.granted(), 0.0);
    assert_eq!(r.get(Attr::Country), None);
}

#[test]
fn unknown_year_is_absent() {
    let d = dataset("2020,Chile,CHL,1,1,1,1,1,1,100\n");
    assert!(d.region_in("1999", "CHL").is_none());
    assert!(d.region_in("1999", "ANY").is_none());
}

#[test]
fn available_years_are_sorted_distinct() {
    let d = dataset(
        "2021,Chile,CHL,1,1,1,1,1,1,1\n\
         2019,Chile,CHL,1,1,1,1,1,1,1\n\
         2021,Peru,PER,1,1,1,1,1,1,1\n\
         2020,Peru,PER,1,1,1,1,1,1,1\n",
    );
    assert_eq!(d.available_years(), &["2019", "2020", "2021"].map(String::from)[..]);
}

#[test]
fn processing_time_scale_matches_labels() {
    let d = dataset("2020,Chile,CHL,1,1,1,1,1,1,100\n");
    let scale = d.color_scale_for(Metric::AvgProcessingTime);
    let labels = d.labels_for(Metric::AvgProcessingTime);

    assert_eq!(labels.len(), 9);
    assert_eq!(labels[0].0, "undefined");
    assert_eq!(scale.classify(0.0), labels[0].1);

    let three_years = labels.iter().find(|(l, _)| *l == "up to 3 years").unwrap();
    assert_eq!(scale.classify(1000.0), three_years.1);
    assert_eq!(scale.classify(730.0), three_years.1);
    assert_eq!(scale.classify(1_000_000.0), labels[8].1);
}

#[test]
fn count_metrics_have_no_labels() {
    let d = dataset("2020,Chile,CHL,1,1,1,1,1,1,100\n");
    assert!(d.labels_for(Metric::Granted).is_empty());
    assert!(d.labels_for(Metric::Pending).is_empty());
}

#[test]
fn maximum_bounds_every_written_value() {
    let d = dataset(
        "2020,Chile,CHL,5,1,30,1,1,1,1\n\
         2020,Peru,PER,9,1,12,1,1,1,1\n\
         2020,Chile,CHL,5,1,25,1,1,1,1\n\
         2021,Peru,PER,2,1,40,1,1,1,1\n",
    );
    let max = d.maximum(Metric::Granted).unwrap();
    assert_eq!(max, 55.0);
    for year in d.available_years() {
        for r in d.regions_in(year) {
            assert!(r.granted() <= max);
        }
    }
    let scale = d.color_scale_for(Metric::Granted);
    for v in [-1.0, 0.0, 12.0, 55.0, 1e9] {
        assert!(BLUES_7.contains(&scale.classify(v)));
    }
}

#[test]
fn true_minimum_spreads_fallback_palette() {
    let csv = format!("{HEADER}2020,Chile,CHL,0,0,10,0,0,0,0\n2020,Peru,PER,0,0,70,0,0,0,0\n");
    let cfg = AggregationConfig { minimum_tracking: MinimumTracking::True, ..Default::default() };
    let d = read_dataset(Cursor::new(csv), cfg).unwrap();
    let scale = d.color_scale_for(Metric::Granted);
    assert_eq!(scale.domain(), &[10.0, 22.0, 34.0, 46.0, 58.0, 70.0][..]);
    let used: BTreeSet<_> = [5.0, 15.0, 25.0, 40.0, 50.0, 60.0, 80.0].map(|v| scale.classify(v)).into_iter().collect();
    assert_eq!(used.len(), 7);
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{HEADER}2017,Ghana,GHA,4,2,2,0,0,2,200\n").unwrap();
    let d = load_dataset_csv(file.path(), AggregationConfig::default()).unwrap();
    assert_eq!(d.region_in("2017", "GHA").unwrap().country(), Some("Ghana"));
}

#[test]
fn missing_file_reports_path() {
    let err = load_dataset_csv("/definitely/not/here.csv", AggregationConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.csv"));
}

#[test]
fn dataset_serves_concurrent_readers() {
    let d = std::sync::Arc::new(dataset("2020,Chile,CHL,1,1,7,1,1,1,100\n"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let d = d.clone();
            std::thread::spawn(move || d.region_in("2020", "CHL").map(|r| r.granted()))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Some(7.0));
    }
}
