//! Runs the pipeline: parallel per-file load + single-file validation,
//! a barrier, then the cross-file stage. A panicking validator becomes a
//! system error; the run always completes.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::info;

use crate::feed::{GtfsFeed, GtfsTable};
use crate::field_validator::FieldValidator;
use crate::input::{GtfsInput, GtfsInputError};
use crate::loader::{load_table, missing_table, unknown_file_notice};
use crate::notice::{NoticeContainer, NoticeSeverity, SystemError, ValidationNotice};
use crate::options::ValidationOptions;
use crate::schema::{schema_for_file, TableSpec, GTFS_TABLES};
use crate::validator::ValidatorRegistry;

pub struct ValidationOutcome {
    pub feed: GtfsFeed,
    pub notices: NoticeContainer,
}

/// Validates a feed end to end. Only input-listing failures are fatal;
/// everything else is reported through the container.
pub fn validate_input(
    input: &GtfsInput,
    registry: &ValidatorRegistry,
    options: &ValidationOptions,
) -> Result<ValidationOutcome, GtfsInputError> {
    let mut notices = NoticeContainer::with_max_per_code(options.max_notices_per_code);
    let field_validator = FieldValidator::new(options.country_code.clone());

    for file_name in input.file_names()? {
        if schema_for_file(&file_name).is_none() {
            notices.push(unknown_file_notice(&file_name));
        }
    }

    info!(
        input = %input.path().display(),
        threads = options.resolved_thread_count(),
        "loading feed"
    );
    let run_jobs = || {
        GTFS_TABLES
            .par_iter()
            .map(|spec| load_and_validate(input, spec, &field_validator, registry, options))
            .collect::<Vec<_>>()
    };
    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(options.resolved_thread_count())
        .build()
    {
        Ok(pool) => pool.install(run_jobs),
        // Pool construction can only fail on resource exhaustion; degrade
        // to the global pool.
        Err(_) => run_jobs(),
    };

    let mut tables = Vec::with_capacity(results.len());
    for (table, local) in results {
        tables.push(table);
        notices.merge(local);
    }
    let feed = GtfsFeed::new(tables);

    for validator in registry.cross_file_validators() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut local = NoticeContainer::with_max_per_code(options.max_notices_per_code);
            validator.validate(&feed, &mut local);
            local
        }));
        match result {
            Ok(local) => notices.merge(local),
            Err(panic) => notices.push_system_error(SystemError::new(
                validator.name(),
                "panic",
                panic_payload_message(&*panic),
            )),
        }
    }

    Ok(ValidationOutcome { feed, notices })
}

fn load_and_validate(
    input: &GtfsInput,
    spec: &'static TableSpec,
    field_validator: &FieldValidator,
    registry: &ValidatorRegistry,
    options: &ValidationOptions,
) -> (GtfsTable, NoticeContainer) {
    let mut local = NoticeContainer::with_max_per_code(options.max_notices_per_code);
    let table = match input.read(spec.file_name) {
        Ok(Some(data)) => load_table(spec.file_name, &data, field_validator, spec, &mut local),
        Ok(None) => missing_table(spec, &mut local),
        Err(error) => {
            local.push(io_error_notice(spec.file_name, &error));
            GtfsTable::empty(spec.file_name, spec)
        }
    };

    for validator in registry.file_validators_for(spec.file_name) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut validator_notices =
                NoticeContainer::with_max_per_code(options.max_notices_per_code);
            validator.validate(&table, &mut validator_notices);
            validator_notices
        }));
        match result {
            Ok(validator_notices) => local.merge(validator_notices),
            Err(panic) => local.push_system_error(SystemError::new(
                validator.name(),
                "panic",
                panic_payload_message(&*panic),
            )),
        }
    }

    (table, local)
}

fn io_error_notice(file_name: &str, error: &GtfsInputError) -> ValidationNotice {
    ValidationNotice::new("i_o_error", NoticeSeverity::Error, error.to_string())
        .with_file(file_name)
        .with_context_field("message", error.to_string())
}

fn panic_payload_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{AGENCY_FILE, STOPS_FILE};
    use crate::validator::{CrossFileValidator, FileValidator};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos))
    }

    fn minimal_feed(dir: &PathBuf) {
        fs::create_dir_all(dir).expect("create dir");
        fs::write(
            dir.join("agency.txt"),
            "agency_id,agency_name,agency_url,agency_timezone\nA1,Test Agency,https://example.com,Europe/Amsterdam\n",
        )
        .expect("write");
        fs::write(
            dir.join("stops.txt"),
            "stop_id,stop_name,stop_lat,stop_lon\nS1,First Stop,52.0,4.0\n",
        )
        .expect("write");
        fs::write(
            dir.join("routes.txt"),
            "route_id,agency_id,route_short_name,route_long_name,route_type\nR1,A1,1,First Line,3\n",
        )
        .expect("write");
        fs::write(
            dir.join("trips.txt"),
            "route_id,service_id,trip_id\nR1,SVC1,T1\n",
        )
        .expect("write");
        fs::write(
            dir.join("stop_times.txt"),
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\nT1,08:00:00,08:00:00,S1,1\n",
        )
        .expect("write");
    }

    struct PanickingValidator;

    impl FileValidator for PanickingValidator {
        fn name(&self) -> &'static str {
            "panicking_validator"
        }

        fn file(&self) -> &'static str {
            STOPS_FILE
        }

        fn validate(&self, _table: &GtfsTable, _notices: &mut NoticeContainer) {
            panic!("boom");
        }
    }

    struct CountingCrossValidator;

    impl CrossFileValidator for CountingCrossValidator {
        fn name(&self) -> &'static str {
            "counting_cross_validator"
        }

        fn files(&self) -> &'static [&'static str] {
            &[AGENCY_FILE, STOPS_FILE]
        }

        fn validate(&self, feed: &GtfsFeed, notices: &mut NoticeContainer) {
            notices.push(
                ValidationNotice::new("cross_ran", NoticeSeverity::Info, "cross validator ran")
                    .with_context_field("stops", feed.table(STOPS_FILE).row_count()),
            );
        }
    }

    #[test]
    fn loads_feed_and_runs_cross_stage_after_barrier() {
        let dir = temp_dir("feedlint_sched_ok");
        minimal_feed(&dir);

        let mut registry = ValidatorRegistry::new();
        registry.register_cross(CountingCrossValidator);
        let input = GtfsInput::from_path(&dir).expect("input");
        let outcome =
            validate_input(&input, &registry, &ValidationOptions::default()).expect("run");

        assert_eq!(outcome.feed.table(STOPS_FILE).row_count(), 1);
        assert!(outcome.notices.iter().any(|notice| notice.code == "cross_ran"));
        assert!(!outcome.notices.has_errors());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn panicking_validator_becomes_system_error_and_run_continues() {
        let dir = temp_dir("feedlint_sched_panic");
        minimal_feed(&dir);

        let mut registry = ValidatorRegistry::new();
        registry.register_file(PanickingValidator);
        registry.register_cross(CountingCrossValidator);
        let input = GtfsInput::from_path(&dir).expect("input");
        let outcome =
            validate_input(&input, &registry, &ValidationOptions::default()).expect("run");

        let errors = outcome.notices.system_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].validator, "panicking_validator");
        assert_eq!(errors[0].message, "boom");
        assert!(outcome.notices.iter().any(|notice| notice.code == "cross_ran"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_required_files_still_produce_empty_tables() {
        let dir = temp_dir("feedlint_sched_missing");
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(
            dir.join("agency.txt"),
            "agency_name,agency_url,agency_timezone\nTest,https://example.com,Europe/Amsterdam\n",
        )
        .expect("write");

        let registry = ValidatorRegistry::new();
        let input = GtfsInput::from_path(&dir).expect("input");
        let outcome =
            validate_input(&input, &registry, &ValidationOptions::default()).expect("run");

        assert!(outcome.feed.table(STOPS_FILE).is_empty());
        let missing = outcome
            .notices
            .iter()
            .filter(|notice| notice.code == "missing_required_file")
            .count();
        // stops, routes, trips, stop_times
        assert_eq!(missing, 4);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unknown_files_are_reported_as_info() {
        let dir = temp_dir("feedlint_sched_unknown");
        minimal_feed(&dir);
        fs::write(dir.join("extra.txt"), "a\n1\n").expect("write");

        let registry = ValidatorRegistry::new();
        let input = GtfsInput::from_path(&dir).expect("input");
        let outcome =
            validate_input(&input, &registry, &ValidationOptions::default()).expect("run");

        let unknown: Vec<&ValidationNotice> = outcome
            .notices
            .iter()
            .filter(|notice| notice.code == "unknown_file")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].severity, NoticeSeverity::Info);
        assert_eq!(unknown[0].file.as_deref(), Some("extra.txt"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn repeated_runs_export_identical_notice_sequences() {
        let dir = temp_dir("feedlint_sched_determinism");
        minimal_feed(&dir);
        // Introduce a few problems so the export is non-trivial.
        fs::write(
            dir.join("stops.txt"),
            "stop_id,stop_name,stop_lat,stop_lon\nS1,First Stop,91.0,4.0\nS1,Dup Stop,52.0,bad\n",
        )
        .expect("write");

        let registry = ValidatorRegistry::new();
        let input = GtfsInput::from_path(&dir).expect("input");
        let export = |options: &ValidationOptions| {
            let outcome = validate_input(&input, &registry, options).expect("run");
            outcome
                .notices
                .export_sorted()
                .iter()
                .map(|notice| (notice.code.clone(), notice.file.clone(), notice.row))
                .collect::<Vec<_>>()
        };

        let single_thread = ValidationOptions {
            num_threads: 1,
            ..ValidationOptions::default()
        };
        let many_threads = ValidationOptions {
            num_threads: 4,
            ..ValidationOptions::default()
        };
        assert_eq!(export(&single_thread), export(&many_threads));

        fs::remove_dir_all(&dir).ok();
    }
}
