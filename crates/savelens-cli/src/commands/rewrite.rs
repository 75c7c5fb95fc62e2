//! Rewrite command implementation.

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use savelens_core::{Analyzer, EngineConfig, FsAccess, Location, Rewriter};
use std::path::Path;

/// Run the rewrite command
pub fn run(
    config: EngineConfig,
    file: &Path,
    key: &str,
    location: Option<&str>,
    value: &str,
) -> Result<()> {
    let location: Option<Location> = location
        .map(str::parse::<Location>)
        .transpose()
        .context("Invalid --location")?;

    let analysis = Analyzer::new(config).analyze(&FsAccess, file);
    let Some(candidate) = analysis.find(key, location.as_ref()) else {
        match &location {
            Some(location) => bail!("No candidate '{}' at {} in {}", key, location, file.display()),
            None => bail!("No candidate '{}' in {}", key, file.display()),
        }
    };

    let edited = candidate.with_edit(value);
    Rewriter::new(&FsAccess)
        .try_rewrite(file, &edited, value)
        .with_context(|| format!("Failed to rewrite '{}' at {}", key, edited.location))?;

    println!(
        "{} {} at {}: {} -> {}",
        "Rewrote".green(),
        key,
        edited.location,
        edited.current_value(),
        value.bold()
    );
    Ok(())
}
