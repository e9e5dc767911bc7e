//! SocLog Core - Main Entry Point

mod logic;
pub mod constants;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use logic::analysis::AnalyticsEngine;
use logic::ingest::LogIngestor;
use logic::report;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let args: Vec<String> = env::args().skip(1).collect();
    let inputs = match resolve_inputs(&args) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Failed to resolve inputs: {}", e);
            process::exit(1);
        }
    };

    if inputs.is_empty() {
        eprintln!("No log files found to process.");
        print_usage();
        process::exit(1);
    }

    println!("Processing {} log file(s):", inputs.len());
    for input in &inputs {
        println!("  - {}", input.display());
    }
    println!();

    let ingestor = LogIngestor::new();
    let ingested = ingestor.ingest(&inputs);
    report::print_ingestion_summary(&ingested);

    if let Some(target) = constants::get_export_path() {
        if let Err(e) = report::export_json(&ingested, Path::new(&target)) {
            log::error!("Report export failed: {}", e);
        }
    }

    let window = ingested
        .earliest_event_time()
        .zip(ingested.latest_event_time());
    let engine = AnalyticsEngine::new(ingested.into_events());
    report::print_analytics(&engine, window);
}

/// No arguments: every `*.csv` in the default data directory. One directory
/// argument: every `*.csv` inside it. Anything else: each argument is a file.
fn resolve_inputs(args: &[String]) -> io::Result<Vec<PathBuf>> {
    if args.is_empty() {
        let dir = constants::get_data_dir();
        println!("No arguments provided. Using '{}' directory...", dir);
        return csv_files_in(Path::new(&dir));
    }

    if args.len() == 1 {
        let arg = Path::new(&args[0]);
        if arg.is_dir() {
            println!("Processing all CSV files in directory: {}", arg.display());
            return csv_files_in(arg);
        }
    }

    Ok(args.iter().map(PathBuf::from).collect())
}

fn csv_files_in(directory: &Path) -> io::Result<Vec<PathBuf>> {
    if !directory.exists() {
        log::warn!("Directory does not exist: {}", directory.display());
        return Ok(Vec::new());
    }
    if !directory.is_dir() {
        log::warn!("Path is not a directory: {}", directory.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "csv"))
        .collect();

    // Deterministic processing order regardless of directory listing order.
    files.sort();

    if files.is_empty() {
        println!("No CSV files found in directory: {}", directory.display());
    } else {
        println!("Found {} CSV file(s) in {}", files.len(), directory.display());
    }

    Ok(files)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  soclog-core");
    eprintln!("    (processes all CSV files in the '{}' directory)", constants::DEFAULT_DATA_DIR);
    eprintln!("  soclog-core <directory>");
    eprintln!("    (processes all CSV files in the given directory)");
    eprintln!("  soclog-core <csv-file> [<csv-file>...]");
    eprintln!("    (processes the given CSV files)");
}
