//! End-to-end tests over temporary feeds on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use feedlint_core::{
    default_registry, validate_input, GtfsInput, NoticeSeverity, ValidationOptions,
    ValidatorRegistry,
};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos))
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write file");
}

fn write_minimal_feed(dir: &Path) {
    fs::create_dir_all(dir).expect("create dir");
    write_file(
        dir,
        "agency.txt",
        "agency_id,agency_name,agency_url,agency_timezone\nA1,Test Agency,https://example.com,Europe/Amsterdam\n",
    );
    write_file(
        dir,
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\nS1,First Stop,52.01,4.01\nS2,Second Stop,52.02,4.02\n",
    );
    write_file(
        dir,
        "routes.txt",
        "route_id,agency_id,route_short_name,route_long_name,route_type\nR1,A1,1,First Line,3\n",
    );
    write_file(
        dir,
        "trips.txt",
        "route_id,service_id,trip_id\nR1,SVC1,T1\n",
    );
    write_file(
        dir,
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         T1,08:00:00,08:00:00,S1,1\nT1,08:07:00,08:08:00,S2,2\n",
    );
    write_file(
        dir,
        "calendar.txt",
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
         SVC1,1,1,1,1,1,0,0,20240101,20241231\n",
    );
    write_file(
        dir,
        "feed_info.txt",
        "feed_publisher_name,feed_publisher_url,feed_lang,feed_start_date,feed_end_date,feed_version\n\
         Test Publisher,https://example.com,en,20240101,20241231,1\n",
    );
}

fn run(dir: &Path) -> feedlint_core::ValidationOutcome {
    let input = GtfsInput::from_path(dir).expect("input");
    let registry = default_registry();
    validate_input(&input, &registry, &ValidationOptions::default()).expect("run")
}

#[test]
fn clean_feed_has_no_errors() {
    let dir = temp_dir("feedlint_clean");
    write_minimal_feed(&dir);

    let outcome = run(&dir);
    let errors: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.severity == NoticeSeverity::Error)
        .collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:#?}");
    assert!(outcome.notices.system_errors().is_empty());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn valid_date_cell_parses_without_notice() {
    let dir = temp_dir("feedlint_date_ok");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "calendar.txt",
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
         SVC1,1,1,1,1,1,0,0,20180913,20241231\n",
    );

    let outcome = run(&dir);
    assert!(!outcome.notices.iter().any(|notice| notice.code == "invalid_date"));
    let calendar = outcome.feed.table("calendar.txt");
    assert_eq!(
        calendar
            .cell(0, "start_date")
            .and_then(|cell| cell.as_date())
            .map(|date| date.to_string()),
        Some("20180913".to_string())
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn dashed_date_yields_invalid_date_error() {
    let dir = temp_dir("feedlint_date_bad");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "calendar.txt",
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
         SVC1,1,1,1,1,1,0,0,2018-09-13,20241231\n",
    );

    let outcome = run(&dir);
    let invalid_dates: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "invalid_date")
        .collect();
    assert_eq!(invalid_dates.len(), 1);
    let notice = invalid_dates[0];
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert_eq!(notice.file.as_deref(), Some("calendar.txt"));
    assert_eq!(notice.row, Some(2));
    assert_eq!(notice.field.as_deref(), Some("start_date"));
    assert_eq!(
        notice.context.get("fieldValue").unwrap().as_str(),
        Some("2018-09-13")
    );
    assert!(outcome
        .feed
        .table("calendar.txt")
        .cell(0, "start_date")
        .is_none());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn short_row_yields_one_length_notice_and_no_typed_parsing() {
    let dir = temp_dir("feedlint_row_length");
    write_minimal_feed(&dir);
    write_file(&dir, "trips.txt", "route_id,service_id,trip_id\na,b\n");

    let outcome = run(&dir);
    let length_notices: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "invalid_row_length")
        .collect();
    assert_eq!(length_notices.len(), 1);
    assert_eq!(
        length_notices[0].context.get("rowLength").unwrap().as_u64(),
        Some(2)
    );
    assert_eq!(
        length_notices[0].context.get("headerCount").unwrap().as_u64(),
        Some(3)
    );
    // The malformed row produced no entity, so no missing-field notices.
    assert!(!outcome
        .notices
        .iter()
        .any(|notice| notice.code == "missing_required_field"
            && notice.file.as_deref() == Some("trips.txt")));
    assert_eq!(outcome.feed.table("trips.txt").row_count(), 0);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn duplicate_stop_ids_are_reported_once_and_both_rows_kept() {
    let dir = temp_dir("feedlint_duplicate");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\nS1,First Stop,52.01,4.01\nS1,Clone Stop,52.02,4.02\n",
    );
    write_file(
        &dir,
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nT1,08:00:00,08:00:00,S1,1\n",
    );

    let outcome = run(&dir);
    let duplicates: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "duplicate_key")
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].field.as_deref(), Some("stop_id"));
    assert_eq!(outcome.feed.table("stops.txt").row_count(), 2);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn out_of_range_latitude_is_kept_and_reported() {
    let dir = temp_dir("feedlint_latitude");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\nS1,First Stop,91.0,4.01\nS2,Second Stop,52.02,4.02\n",
    );

    let outcome = run(&dir);
    let out_of_range: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "number_out_of_range")
        .collect();
    assert_eq!(out_of_range.len(), 1);
    assert_eq!(
        out_of_range[0].context.get("bounds").unwrap().as_str(),
        Some("latitude within [-90, 90]")
    );
    assert_eq!(
        outcome
            .feed
            .table("stops.txt")
            .cell(0, "stop_lat")
            .and_then(|cell| cell.as_float()),
        Some(91.0)
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unexpected_wheelchair_boarding_maps_to_sentinel() {
    let dir = temp_dir("feedlint_enum");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon,wheelchair_boarding\nS1,First Stop,52.01,4.01,7\nS2,Second Stop,52.02,4.02,1\n",
    );

    let outcome = run(&dir);
    let unexpected: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "unexpected_enum_value")
        .collect();
    assert_eq!(unexpected.len(), 1);
    assert_eq!(unexpected[0].row, Some(2));
    assert_eq!(
        outcome
            .feed
            .table("stops.txt")
            .cell(0, "wheelchair_boarding")
            .and_then(|cell| cell.as_enum()),
        Some(feedlint_core::UNRECOGNIZED_ENUM_VALUE)
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn orphaned_stop_reference_is_a_foreign_key_violation() {
    let dir = temp_dir("feedlint_fk");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nT1,08:00:00,08:00:00,S404,1\n",
    );

    let outcome = run(&dir);
    let violations: Vec<_> = outcome
        .notices
        .iter()
        .filter(|notice| notice.code == "foreign_key_violation")
        .collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].file.as_deref(), Some("stop_times.txt"));
    assert_eq!(
        violations[0].context.get("fieldValue").unwrap().as_str(),
        Some("S404")
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn running_twice_produces_identical_sorted_exports() {
    let dir = temp_dir("feedlint_determinism");
    write_minimal_feed(&dir);
    write_file(
        &dir,
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\nS1,STOP ONE,91.0,4.01\nS1,Second Stop,52.02,bad\n",
    );
    write_file(&dir, "shuttle_notes.txt", "note\nhello\n");

    let export = |outcome: &feedlint_core::ValidationOutcome| {
        outcome
            .notices
            .export_sorted()
            .iter()
            .map(|notice| {
                (
                    notice.code.clone(),
                    notice.file.clone(),
                    notice.row,
                    notice.field.clone(),
                )
            })
            .collect::<Vec<_>>()
    };

    let first = run(&dir);
    let second = run(&dir);
    assert_eq!(export(&first), export(&second));
    assert!(first.notices.iter().any(|notice| notice.code == "unknown_file"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn validates_a_zipped_feed() {
    use std::io::Write;

    let dir = temp_dir("feedlint_zip");
    let feed_dir = dir.join("feed");
    write_minimal_feed(&feed_dir);

    let zip_path = dir.join("feed.zip");
    let file = fs::File::create(&zip_path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    for entry in fs::read_dir(&feed_dir).expect("read dir") {
        let entry = entry.expect("entry");
        let name = entry.file_name().to_string_lossy().into_owned();
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .expect("start entry");
        let data = fs::read(entry.path()).expect("read file");
        writer.write_all(&data).expect("write entry");
    }
    writer.finish().expect("finish zip");

    let input = GtfsInput::from_path(&zip_path).expect("input");
    let registry = default_registry();
    let outcome = validate_input(&input, &registry, &ValidationOptions::default()).expect("run");
    assert_eq!(outcome.feed.table("stops.txt").row_count(), 2);
    assert!(!outcome.notices.has_errors());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_registry_still_loads_and_reports_structural_notices() {
    let dir = temp_dir("feedlint_no_rules");
    write_minimal_feed(&dir);
    fs::remove_file(dir.join("stops.txt")).expect("remove stops");

    let input = GtfsInput::from_path(&dir).expect("input");
    let registry = ValidatorRegistry::new();
    let outcome = validate_input(&input, &registry, &ValidationOptions::default()).expect("run");

    assert!(outcome
        .notices
        .iter()
        .any(|notice| notice.code == "missing_required_file"
            && notice.file.as_deref() == Some("stops.txt")));
    assert!(outcome.feed.table("stops.txt").is_empty());

    fs::remove_dir_all(&dir).ok();
}
