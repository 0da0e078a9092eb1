use colored::Colorize;

use apigen_core::{ArtifactOutcome, EmitResult, Generator, GenerationReport};

use super::prompt::TerminalConfirm;
use super::GenerateOpts;

/// Generate every artifact of `name` (or the `--only` subset) and print one
/// line per artifact followed by the confirmation message.
pub fn run(
    name: &str,
    version: Option<&str>,
    opts: &GenerateOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = generate(name, version, opts)?;
    println!();
    println!("{}", confirmation(&report).green());
    Ok(())
}

/// Same as [`run`] without the closing message; returns the report.
pub fn generate(
    name: &str,
    version: Option<&str>,
    opts: &GenerateOpts,
) -> Result<GenerationReport, Box<dyn std::error::Error>> {
    let config = opts.resolve_config()?;
    let prompt = TerminalConfirm;
    let generator = Generator::new(&config, &prompt);
    let report = generator.run_with(name, version, opts.only(), print_outcome)?;
    Ok(report)
}

/// `API components for <Name> created successfully in version <V>.`
pub fn confirmation(report: &GenerationReport) -> String {
    format!(
        "API components for {} created successfully in version {}.",
        report.identity.pascal_name(),
        report.identity.version()
    )
}

fn print_outcome(outcome: &ArtifactOutcome) {
    let marker = match outcome.result {
        EmitResult::Created | EmitResult::Patched => "✓".green(),
        EmitResult::Overwritten => "!".yellow(),
        EmitResult::Skipped => "-".dimmed(),
    };
    println!(
        "{} {:<11} {:<26} {}",
        marker,
        outcome.result.to_string(),
        outcome.kind.to_string(),
        outcome.path.display().to_string().cyan()
    );
}
