//! Example: Reconcile a response file against a directory of rosters.
//!
//! Usage:
//!   cargo run --example reconcile -- <input_file> <reference_dir>
//!
//! Writes `filtered-<input stem>.xlsx` to the current directory.

use std::env;
use std::path::Path;

use rollcall::{OutputFormat, Reconciler, ValidationStatus};

fn main() -> rollcall::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example reconcile -- <input_file> <reference_dir>");
        std::process::exit(1);
    }

    let input = Path::new(&args[1]);
    let references = Path::new(&args[2]);

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Rollcall: {}", input.display());
    println!("{}", separator);
    println!();

    let reconciler = Reconciler::new();
    let result = reconciler.run_files(input, references)?;
    let summary = &result.summary;

    println!("Reference sources:");
    for source in &summary.loaded_sources {
        println!("  {:<30} {:>6} records", source.name, source.records);
    }
    for source in &summary.skipped_sources {
        println!("  {:<30} skipped: {}", source.name, source.reason);
    }
    println!();

    println!("Records: {}", summary.total_records);
    for status in ValidationStatus::ALL {
        println!("  {:<36} {}", status.label(), summary.status_counts.get(status));
    }
    println!();

    if !result.corrections.is_empty() {
        println!("Name corrections:");
        for correction in &result.corrections {
            println!(
                "  row {}: {} -> {}",
                correction.row + 2,
                correction.from,
                correction.to
            );
        }
        println!();
    }

    let output = OutputFormat::Xlsx.default_output(input);
    let mut sink = OutputFormat::Xlsx.open_sink(&output)?;
    for written in reconciler.export(&result, sink.as_mut())? {
        println!("  {:<32} {:>6} rows", written.written_as, written.rows);
    }
    println!();
    println!("Wrote {}", output.display());

    Ok(())
}
