//! Run command - reconcile an input file and export its partitions.

use std::path::PathBuf;

use colored::Colorize;
use rollcall::export::WrittenPartition;
use rollcall::{
    CollisionPolicy, OutputFormat, ReconciliationResult, Reconciler, RollcallConfig,
    ValidationStatus,
};

use super::load_config;

/// Arguments of `rollcall run`.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: PathBuf,
    pub references: PathBuf,
    pub sheet: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub on_collision: Option<CollisionPolicy>,
    pub json: bool,
}

/// What a run produced.
pub struct RunOutcome {
    pub output: PathBuf,
    pub result: ReconciliationResult,
    pub written: Vec<WrittenPartition>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = execute(&args)?;

    if args.json {
        let report = serde_json::json!({
            "output": outcome.output,
            "format": args.format,
            "input": outcome.result.input,
            "written": outcome.written,
            "summary": outcome.result.summary,
            "corrections": outcome.result.corrections,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&outcome);
    }

    Ok(())
}

/// Reconcile and export without printing anything.
pub fn execute(args: &RunArgs) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    let reconciler = Reconciler::with_config(config);

    let result = reconciler.run_files(&args.input, &args.references)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.format.default_output(&args.input));
    let mut sink = args.format.open_sink(&output)?;
    let written = reconciler.export(&result, sink.as_mut())?;

    Ok(RunOutcome {
        output,
        result,
        written,
    })
}

fn resolve_config(args: &RunArgs) -> Result<RollcallConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(sheet) = &args.sheet {
        config.input.sheet = sheet.clone();
    }
    if let Some(policy) = args.on_collision {
        config.collision = policy;
    }
    Ok(config)
}

fn print_report(outcome: &RunOutcome) {
    let summary = &outcome.result.summary;

    let file = outcome
        .result
        .input
        .as_ref()
        .map(|s| s.file.clone())
        .unwrap_or_default();
    println!("{} {}", "Reconciled".cyan().bold(), file.white());
    println!();

    if !summary.missing_columns.is_empty() {
        println!(
            "{} input columns not found: {}",
            "Warning:".yellow().bold(),
            summary.missing_columns.join(", ")
        );
    }
    for skipped in &summary.skipped_sources {
        println!(
            "{} skipped reference {}: {}",
            "Warning:".yellow().bold(),
            skipped.name,
            skipped.reason
        );
    }
    let collisions = summary.index.email_collisions + summary.index.name_collisions;
    if collisions > 0 {
        println!(
            "{} {} reference key collision(s) resolved by policy",
            "Note:".blue().bold(),
            collisions
        );
    }

    println!("{}", "Validation:".yellow().bold());
    for status in ValidationStatus::ALL {
        let count = summary.status_counts.get(status).to_string();
        let count = if status.is_matched() {
            count.green()
        } else {
            count.red()
        };
        println!("  {:<36} {}", status.label(), count);
    }
    println!(
        "  {:<36} {}",
        "Consolidated Duplicate",
        summary.duplicate_counts.consolidated_duplicate.to_string().magenta()
    );
    if summary.name_corrections > 0 {
        println!(
            "  {:<36} {}",
            "Names corrected",
            summary.name_corrections.to_string().blue()
        );
    }
    println!();

    println!("{}", "Partitions:".yellow().bold());
    for written in &outcome.written {
        let dropped = summary
            .partitions
            .iter()
            .find(|p| p.name == written.name)
            .map(|p| p.dropped)
            .unwrap_or(0);
        let mut line = format!("  {:<32} {:>6} rows", written.written_as, written.rows);
        if dropped > 0 {
            line.push_str(&format!(" ({} duplicates removed)", dropped));
        }
        println!("{}", line);
    }
    println!();

    println!(
        "{} {}",
        "Wrote".green().bold(),
        outcome.output.display().to_string().white()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();

        let refs = dir.path().join("refs");
        fs::create_dir(&refs).unwrap();
        fs::write(
            refs.join("Sales.csv"),
            "First Name,Email,Position,Company\nJane Doe,jane@co.com,Rep,Acme\n",
        )
        .unwrap();

        let input = dir.path().join("responses.csv");
        fs::write(
            &input,
            "Full Name (as per NRIC/Passport),Work Email Address,Position / Job Title,Department / Business Unit\n\
             jane doe,JANE@CO.COM,rep,sales\n\
             Ghost,ghost@co.com,,\n",
        )
        .unwrap();

        (dir, input, refs)
    }

    #[test]
    fn test_execute_writes_csv_partitions() {
        let (dir, input, refs) = fixture();
        let out = dir.path().join("out");

        let outcome = execute(&RunArgs {
            input,
            references: refs,
            sheet: None,
            config: None,
            output: Some(out.clone()),
            format: OutputFormat::Csv,
            on_collision: None,
            json: false,
        })
        .unwrap();

        assert_eq!(outcome.result.summary.total_records, 2);
        assert_eq!(outcome.written.len(), 2);
        assert!(out.join("Sales.csv").is_file());
        assert!(out.join("Invalid_Uncategorized.csv").is_file());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = RunArgs {
            input: PathBuf::from("in.xlsx"),
            references: PathBuf::from("refs"),
            sheet: Some("Responses".to_string()),
            config: None,
            output: None,
            format: OutputFormat::Xlsx,
            on_collision: Some(CollisionPolicy::FirstWriteWins),
            json: false,
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input.sheet, "Responses");
        assert_eq!(config.collision, CollisionPolicy::FirstWriteWins);
    }
}
