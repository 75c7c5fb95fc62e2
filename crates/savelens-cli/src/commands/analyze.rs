//! Analyze command implementation.

use anyhow::Result;
use owo_colors::OwoColorize;
use savelens_core::{Analyzer, Candidate, EngineConfig, FsAccess};
use std::path::Path;

fn confidence_cell(confidence: f64) -> String {
    let text = format!("{:>5.2}", confidence);
    if confidence >= 0.7 {
        text.green().to_string()
    } else if confidence >= 0.4 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn print_candidate(index: usize, candidate: &Candidate) {
    println!(
        "{:>4}. {} {:<28} {:<16} {:<18} {}",
        index + 1,
        confidence_cell(candidate.confidence),
        candidate.key,
        candidate.raw_value,
        candidate.category.as_str(),
        candidate.location.dimmed()
    );
}

/// Run the analyze command
pub fn run(config: EngineConfig, file: &Path, json: bool, limit: Option<usize>) -> Result<()> {
    let mut analysis = Analyzer::new(config).analyze(&FsAccess, file);
    if let Some(limit) = limit {
        analysis.candidates.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let summary = analysis.summary();
    println!("File:      {}", file.display());
    println!("Structure: {}", summary.structure.bold());
    println!("Encoding:  {}", summary.encoding.unwrap_or("(binary)"));
    println!("Found:     {} candidates", summary.total);
    for (category, count) in &summary.by_category {
        println!("  {:<18} {}", category.as_str(), count);
    }
    println!();

    for (index, candidate) in analysis.candidates.iter().enumerate() {
        print_candidate(index, candidate);
    }
    Ok(())
}
