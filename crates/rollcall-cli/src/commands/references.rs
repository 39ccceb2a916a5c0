//! References command - show what a reference directory would load.

use std::path::PathBuf;

use colored::Colorize;
use rollcall::{ReferenceIndex, Reconciler};

use super::load_config;

pub fn run(
    dir: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_ref())?;
    let index = Reconciler::with_config(config).build_index_from_dir(&dir)?;

    if json_output {
        let report = serde_json::json!({
            "directory": dir,
            "policy": index.policy(),
            "loaded": index.loaded_sources(),
            "skipped": index.skipped_sources(),
            "stats": index.stats(),
            "collisions": index.collisions(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&dir, &index, verbose);
    }

    Ok(())
}

fn print_report(dir: &std::path::Path, index: &ReferenceIndex, verbose: bool) {
    println!(
        "{} {}",
        "Reference data in".cyan().bold(),
        dir.display().to_string().white()
    );
    println!();

    println!("{}", "Loaded:".yellow().bold());
    for source in index.loaded_sources() {
        println!(
            "  {:<32} {:>6} records  {}",
            source.name,
            source.records,
            source.category.dimmed()
        );
    }

    if !index.skipped_sources().is_empty() {
        println!();
        println!("{}", "Skipped:".yellow().bold());
        for source in index.skipped_sources() {
            println!("  {:<32} {}", source.name.red(), source.reason);
        }
    }
    println!();

    let stats = index.stats();
    println!("{}", "Index:".yellow().bold());
    println!("  Records:     {}", stats.records.to_string().white());
    println!("  Email keys:  {}", stats.email_keys.to_string().white());
    println!("  Name keys:   {}", stats.name_keys.to_string().white());

    let collisions = stats.email_collisions + stats.name_collisions;
    let collision_text = collisions.to_string();
    println!(
        "  Collisions:  {} (policy: {})",
        if collisions > 0 {
            collision_text.yellow()
        } else {
            collision_text.green()
        },
        index.policy()
    );

    if verbose {
        for collision in index.collisions() {
            println!(
                "    {} {:?}: {} then {}",
                collision.field.label(),
                collision.key,
                collision.existing.describe(),
                collision.incoming.describe()
            );
        }
    }
}
