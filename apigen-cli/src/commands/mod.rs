//! Command implementations for the `apigen` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

use std::path::PathBuf;

use apigen_core::{GeneratorConfig, OverwriteMode, PluralRule, ScaffolderKind};

/// Generation: `apigen make <name> [version]`.
pub mod make;

/// Dry run: `apigen plan <name> [version]`.
///
/// Prints kind, write policy, target path and whether the target exists.
pub mod plan;

/// Interactive overwrite confirmation.
pub mod prompt;

/// Command-line flags shared by `make` and `plan`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOpts {
    pub base_dir: Option<PathBuf>,
    pub force: bool,
    pub no_overwrite: bool,
    pub only: Vec<String>,
    pub artisan: bool,
    pub english_plurals: bool,
}

impl GenerateOpts {
    /// Load `apigen.yaml` and `APIGEN_*` from the project root, then apply
    /// the flags on top.
    pub fn resolve_config(&self) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
        let base_dir = self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        if !base_dir.is_dir() {
            return Err(format!("project root '{}' is not a directory", base_dir.display()).into());
        }

        let mut config = GeneratorConfig::load(&base_dir)?;
        if self.force {
            config.overwrite = OverwriteMode::Always;
        }
        if self.no_overwrite {
            config.overwrite = OverwriteMode::Never;
        }
        if self.artisan {
            config.scaffolder = ScaffolderKind::Artisan;
        }
        if self.english_plurals {
            config.pluralizer = PluralRule::English;
        }
        Ok(config)
    }

    /// The `--only` selection, if any.
    pub fn only(&self) -> Option<&[String]> {
        (!self.only.is_empty()).then_some(self.only.as_slice())
    }
}
