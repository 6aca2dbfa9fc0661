use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::to_string_pretty;

use depsnap::analysis::{AnalysisInput, AnalysisOutcome, RpmInput, run_analyzers};
use depsnap::cli::Cli;
use depsnap::events::LogSink;
use depsnap::models::{
    ExtraData, Header, OUTPUT_FORMAT_VERSION, Output, RpmPackageRecord, SystemEnvironment,
};
use depsnap::parsers::detect_os_release;
use depsnap::scanner::{CollectResult, ScanCounts, collect, count};

fn main() -> std::io::Result<()> {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let start_time = Utc::now();

    let exclude_patterns = compile_exclude_patterns(&cli.exclude)?;

    let counts = count(&cli.dir_path, cli.max_depth, &exclude_patterns)
        .with_context(|| format!("cannot scan {}", cli.dir_path))?;
    if !cli.quiet {
        println!(
            "Found {} files in {} directories ({} items excluded)",
            counts.files, counts.directories, counts.excluded
        );
    }

    let progress_bar = create_progress_bar(counts.files, cli.quiet);
    let collected = collect(
        &cli.dir_path,
        cli.max_depth,
        Arc::clone(&progress_bar),
        &exclude_patterns,
        cli.max_file_size,
    )
    .with_context(|| format!("cannot scan {}", cli.dir_path))?;
    progress_bar.finish_with_message("Scan complete!");

    let os_release = detect_os_release(&collected.snapshot);
    let rpm_records = load_rpm_records(cli.rpm_packages.as_deref())?;

    let input = AnalysisInput {
        snapshot: &collected.snapshot,
        rpm: rpm_records.as_ref().map(|records| RpmInput {
            image: cli.image.as_deref().unwrap_or(&cli.dir_path),
            records: records.as_slice(),
            repositories: &cli.repositories,
            os_release: os_release.as_ref(),
        }),
    };
    let outcome = run_analyzers(&input, &LogSink);

    let end_time = Utc::now();
    let output = create_output(start_time, end_time, counts, collected, outcome);
    write_output(&cli.output_file, &output)?;

    if !cli.quiet {
        println!("JSON output written to {}", cli.output_file);
    }
    Ok(())
}

fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern)
                .with_context(|| format!("invalid exclude pattern '{}'", pattern))
        })
        .collect()
}

fn create_progress_bar(total_files: usize, quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }

    let progress_bar = ProgressBar::new(total_files as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files processed ({eta})")
            .expect("Failed to create progress bar style")
            .progress_chars("#>-"),
    );
    Arc::new(progress_bar)
}

fn load_rpm_records(path: Option<&str>) -> Result<Option<Vec<RpmPackageRecord>>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;
    let records: Vec<RpmPackageRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid package records in {}", path))?;
    Ok(Some(records))
}

fn create_output(
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    counts: ScanCounts,
    collected: CollectResult,
    outcome: AnalysisOutcome,
) -> Output {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    let extra_data = ExtraData {
        files_count: collected.snapshot.len(),
        directories_count: counts.directories,
        excluded_count: collected.excluded_count,
        system_environment: SystemEnvironment {
            operating_system: sys_info::os_type().ok(),
            cpu_architecture: env::consts::ARCH.to_string(),
            platform: format!(
                "{}-{}-{}",
                sys_info::os_type().unwrap_or_else(|_| "unknown".to_string()),
                sys_info::os_release().unwrap_or_else(|_| "unknown".to_string()),
                env::consts::ARCH
            ),
            rust_version: rustc_version_runtime::version().to_string(),
        },
    };

    Output {
        headers: vec![Header {
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            extra_data,
            errors: collected.errors,
            output_format_version: OUTPUT_FORMAT_VERSION.to_string(),
        }],
        scan_results: outcome.scan_results,
        image_packages: outcome.image_packages,
    }
}

fn write_output(output_file: &str, output: &Output) -> std::io::Result<()> {
    let json_output = match to_string_pretty(output) {
        Ok(json) => json,
        Err(err) => return Err(std::io::Error::other(err)),
    };
    let mut file = File::create(output_file)?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_patterns_compile() {
        let patterns =
            compile_exclude_patterns(&["node_modules".to_string(), "*.tmp".to_string()])
                .expect("valid patterns should compile");
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_rejected() {
        let err = compile_exclude_patterns(&["a[".to_string()])
            .expect_err("an unclosed character class must not compile");
        assert!(err.to_string().contains("a["), "got {:#}", err);
    }
}
