//! End-to-end scenarios: CSV in, analysis out.
//!
//! Each test writes its own fixture to a temp file and goes through the same
//! `load_bars` → `analyze` path the CLI uses.

use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tempfile::NamedTempFile;
use weeklows_core::analysis::{analyze, AnalysisOptions};
use weeklows_core::data::{
    load_bars, load_sample, DataError, DataProvider, DataSource, FetchRequest, SourceSpec,
    SAMPLE_CSV,
};
use weeklows_core::domain::{Bar, WeekId};
use weeklows_core::report::render_text;
use weeklows_core::AnalysisError;

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,low,high").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn load_file(path: &Path) -> Vec<Bar> {
    load_bars("TEST", &SourceSpec::File(path.to_path_buf()), None, None)
        .unwrap()
        .bars
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

struct UnreachableProvider;

impl DataProvider for UnreachableProvider {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn fetch(&self, _symbol: &str, _request: &FetchRequest) -> Result<Vec<Bar>, DataError> {
        Err(DataError::NetworkUnreachable("dns lookup failed".into()))
    }
}

#[test]
fn three_bar_week_ranks_lows() {
    let file = write_csv(&[
        "2024-03-25T09:30:00,10,15",
        "2024-03-25T10:30:00,8,14",
        "2024-03-25T11:30:00,12,16",
    ]);
    let bars = load_file(file.path());
    let analysis = analyze("TEST", &bars, &AnalysisOptions::default()).unwrap();

    let lows: Vec<(f64, NaiveDateTime)> = analysis
        .extremes
        .lows
        .iter()
        .map(|b| (b.low, b.timestamp))
        .collect();
    assert_eq!(
        lows,
        vec![
            (8.0, ts("2024-03-25T10:30:00")),
            (10.0, ts("2024-03-25T09:30:00")),
            (12.0, ts("2024-03-25T11:30:00")),
        ]
    );
}

#[test]
fn single_week_window_reports_exact_times() {
    let file = write_csv(&[
        "2024-03-25T09:30:00,10,15",
        "2024-03-26T13:30:00,7,14",
        "2024-03-28T15:30:00,12,19",
    ]);
    let bars = load_file(file.path());
    let opts = AnalysisOptions {
        window: 1,
        ..Default::default()
    };
    let analysis = analyze("TEST", &bars, &opts).unwrap();
    assert_eq!(analysis.window.len(), 1);
    assert_eq!(analysis.averages.weeks, 1);
    assert_eq!(analysis.averages.low, hm(13, 30));
    assert_eq!(analysis.averages.high, hm(15, 30));
}

#[test]
fn failed_live_fetch_matches_direct_sample_run() {
    let origin = SourceSpec::Live(FetchRequest::hourly(60, true));
    let loaded = load_bars("AAPL", &origin, Some(&UnreachableProvider), None).unwrap();
    assert_eq!(loaded.source, DataSource::BundledSample);
    let notice = loaded.fallback_notice("AAPL").unwrap();
    assert!(notice.contains("AAPL"));
    assert!(notice.contains("dns lookup failed"));
    assert!(notice.contains("bundled sample data"));

    let mut sample_file = NamedTempFile::new().unwrap();
    sample_file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
    sample_file.flush().unwrap();
    let direct = load_file(sample_file.path());

    let opts = AnalysisOptions {
        target: NaiveDate::from_ymd_opt(2024, 2, 14),
        ..Default::default()
    };
    let via_fallback = analyze("AAPL", &loaded.bars, &opts).unwrap();
    let via_file = analyze("AAPL", &direct, &opts).unwrap();
    assert_eq!(via_fallback.extremes, via_file.extremes);
    assert_eq!(render_text(&via_fallback), render_text(&via_file));
}

#[test]
fn oversized_window_uses_available_weeks() {
    let file = write_csv(&[
        "2024-02-26T09:30:00,10,11",
        "2024-03-04T10:30:00,10,11",
        "2024-03-11T11:30:00,10,11",
        "2024-03-18T12:30:00,10,11",
        "2024-03-25T13:30:00,10,11",
        "2024-03-29T14:30:00,10,12",
    ]);
    let bars = load_file(file.path());
    let opts = AnalysisOptions {
        window: 20,
        ..Default::default()
    };
    let analysis = analyze("TEST", &bars, &opts).unwrap();
    assert_eq!(analysis.window.len(), 5);
    assert_eq!(analysis.averages.weeks, 5);
    assert!(analysis.is_partial_window());
    assert_eq!(analysis.window[0].week, WeekId::new(2024, 13));
    assert_eq!(analysis.window[4].week, WeekId::new(2024, 9));
}

#[test]
fn near_midnight_times_average_to_noon() {
    // Sunday 23:50 in one week, Monday 00:10 in the next.
    let file = write_csv(&["2024-03-24T23:50:00,5,6", "2024-03-25T00:10:00,5,6"]);
    let bars = load_file(file.path());
    let opts = AnalysisOptions {
        target: NaiveDate::from_ymd_opt(2024, 3, 25),
        window: 2,
        ..Default::default()
    };
    let analysis = analyze("TEST", &bars, &opts).unwrap();
    assert_eq!(analysis.averages.low, hm(12, 0));
    assert_eq!(analysis.averages.high, hm(12, 0));
}

#[test]
fn unsorted_input_gives_same_analysis() {
    let sorted = load_sample(None).unwrap();
    let mut shuffled = sorted.clone();
    shuffled.reverse();
    shuffled.rotate_left(17);

    let opts = AnalysisOptions::default();
    let a = analyze("TEST", &sorted, &opts).unwrap();
    let b = analyze("TEST", &shuffled, &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sample_default_target_is_last_sample_week() {
    let bars = load_sample(None).unwrap();
    let analysis = analyze("TEST", &bars, &AnalysisOptions::default()).unwrap();
    // Sample ends Friday 2024-04-05.
    assert_eq!(analysis.week, WeekId::new(2024, 14));
    assert_eq!(analysis.window.len(), 12);
    assert_eq!(analysis.extremes.lows.len(), 3);
    assert_eq!(analysis.extremes.highs.len(), 3);
}

#[test]
fn malformed_file_surfaces_malformed_input() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,low,high").unwrap();
    writeln!(file, "2024-03-25,1,2").unwrap();
    let err = load_bars("TEST", &SourceSpec::File(file.path().to_path_buf()), None, None)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedInput(_)));
}

#[test]
fn target_week_outside_data_is_empty_week() {
    let bars = load_sample(None).unwrap();
    let opts = AnalysisOptions {
        target: NaiveDate::from_ymd_opt(2023, 6, 1),
        ..Default::default()
    };
    assert!(matches!(
        analyze("TEST", &bars, &opts),
        Err(AnalysisError::EmptyWeek { .. })
    ));
}
