use colored::Colorize;

use apigen_core::{ArtifactSpec, Generator, NeverOverwrite};

use super::GenerateOpts;

/// One row of the dry-run listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub kind: String,
    /// Shared by every resource of the project or version.
    pub shared: bool,
    pub policy: String,
    pub path: String,
    pub exists: bool,
}

/// Print what `apigen make` would do, without writing.
pub fn run(
    name: &str,
    version: Option<&str>,
    opts: &GenerateOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let (title, rows) = rows(name, version, opts)?;
    println!("{} {}", "->".blue(), title.bold());
    println!();
    for row in &rows {
        let state = if row.exists {
            "exists".yellow()
        } else {
            "new".green()
        };
        let scope = if row.shared { "shared" } else { "resource" };
        println!(
            "  {:<26} {:<8} {:<17} {:<7} {}",
            row.kind,
            scope,
            row.policy,
            state,
            row.path.cyan()
        );
    }
    Ok(())
}

/// The plan for `name` as printable rows, with a title line.
pub fn rows(
    name: &str,
    version: Option<&str>,
    opts: &GenerateOpts,
) -> Result<(String, Vec<PlanRow>), Box<dyn std::error::Error>> {
    let config = opts.resolve_config()?;
    let generator = Generator::new(&config, &NeverOverwrite);
    let (identity, specs) = generator.plan(name, version, opts.only())?;

    let rows = specs
        .iter()
        .map(|spec| row(spec, &config.base_dir))
        .collect::<Result<Vec<_>, _>>()?;
    let title = format!(
        "{} ({}) - route '{}', table '{}'",
        identity.pascal_name(),
        identity.version(),
        identity.route_segment(),
        identity.table_name()
    );
    Ok((title, rows))
}

fn row(
    spec: &ArtifactSpec,
    base_dir: &std::path::Path,
) -> Result<PlanRow, apigen_core::GenerateError> {
    let existing = spec.target.find_existing(base_dir)?;
    Ok(PlanRow {
        kind: spec.kind.to_string(),
        shared: spec.kind.is_shared(),
        policy: spec.write_policy.to_string(),
        path: spec.target.display_path().display().to_string(),
        exists: existing.is_some(),
    })
}
