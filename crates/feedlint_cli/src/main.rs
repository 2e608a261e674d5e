use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use feedlint_core::{
    default_registry, validate_input, CountryCode, GtfsInput, NoticeSeverity, ValidationOptions,
};
use feedlint_report::{write_html_report, ValidationReport};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "feedlint")]
#[command(about = "GTFS Schedule validator")]
struct Args {
    /// Path to a feed directory, a zip archive, or an HTTPS url of one.
    #[arg(short = 'g', long = "gtfs")]
    gtfs: String,

    /// Directory the reports are written to.
    #[arg(short = 'o', long = "output_base", default_value = "output")]
    output_base: PathBuf,

    /// Worker-pool size; 0 means hardware concurrency.
    #[arg(short = 'n', long = "num_threads", default_value_t = 0)]
    num_threads: usize,

    /// ISO 3166 country code for phone-number validation.
    #[arg(short = 'c', long = "country_code")]
    country_code: Option<String>,

    #[arg(long = "validation_report_name", default_value = "report.json")]
    validation_report_name: String,

    #[arg(long = "system_errors_report_name", default_value = "system_errors.json")]
    system_errors_report_name: String,

    #[arg(long = "html_report_name", default_value = "report.html")]
    html_report_name: String,

    /// Pretty-print the JSON reports.
    #[arg(short = 'p', long = "pretty")]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.output_base)
        .with_context(|| format!("create output dir {}", args.output_base.display()))?;

    let input = resolve_input(&args)?;
    info!(input = %input.path().display(), "validating feed");

    let options = ValidationOptions {
        country_code: args
            .country_code
            .as_deref()
            .map(CountryCode::parse)
            .unwrap_or_default(),
        num_threads: args.num_threads,
        ..ValidationOptions::default()
    };
    let registry = default_registry();

    let started_at = Instant::now();
    let outcome = validate_input(&input, &registry, &options)?;
    let elapsed = started_at.elapsed();

    let report = ValidationReport::from_container(&outcome.notices);
    let system_errors = ValidationReport::from_system_errors(&outcome.notices);
    report.write_json(args.output_base.join(&args.validation_report_name), args.pretty)?;
    system_errors.write_json(
        args.output_base.join(&args.system_errors_report_name),
        args.pretty,
    )?;
    write_html_report(
        args.output_base.join(&args.html_report_name),
        &report,
        &args.gtfs,
    )?;

    info!(
        errors = report.count_by_severity(NoticeSeverity::Error),
        warnings = report.count_by_severity(NoticeSeverity::Warning),
        infos = report.count_by_severity(NoticeSeverity::Info),
        seconds = elapsed.as_secs_f64(),
        "validation finished"
    );

    if outcome.notices.has_errors() || !outcome.notices.system_errors().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Local paths are used as-is; an https url is downloaded into the output
/// directory first so the core never touches the network.
fn resolve_input(args: &Args) -> anyhow::Result<GtfsInput> {
    if args.gtfs.starts_with("http://") || args.gtfs.starts_with("https://") {
        let archive_path = args.output_base.join("gtfs.zip");
        info!(url = %args.gtfs, "downloading feed");
        let response = reqwest::blocking::get(&args.gtfs)
            .and_then(reqwest::blocking::Response::error_for_status)
            .with_context(|| format!("download {}", args.gtfs))?;
        let data = response
            .bytes()
            .with_context(|| format!("download {}", args.gtfs))?;
        std::fs::write(&archive_path, &data)
            .with_context(|| format!("write {}", archive_path.display()))?;
        return GtfsInput::from_path(&archive_path)
            .with_context(|| format!("open downloaded feed {}", archive_path.display()));
    }
    GtfsInput::from_path(&args.gtfs).with_context(|| format!("open feed {}", args.gtfs))
}
