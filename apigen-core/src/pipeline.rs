use std::path::PathBuf;

use crate::config::{GeneratorConfig, OverwriteMode};
use crate::emit::{AlwaysOverwrite, ConfirmOverwrite, EmitResult, Emitter, NeverOverwrite};
use crate::naming::ResourceIdentity;
use crate::plan::{self, ArtifactKind, ArtifactPlanner, ArtifactSource, ArtifactSpec, Target};
use crate::scaffold::{self, Scaffolder};
use crate::templates::{self, TemplateParams};
use crate::GenerateError;

/// Result of emitting one planned artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    /// Path relative to the project root.
    pub path: PathBuf,
    pub result: EmitResult,
}

/// Everything one successful run did, in plan order.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub identity: ResourceIdentity,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl GenerationReport {
    /// Number of artifacts that modified the file system.
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.wrote()).count()
    }
}

/// Runs naming, planning, rendering and emission for one resource.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    scaffolder: Box<dyn Scaffolder>,
    prompt: &'a dyn ConfirmOverwrite,
}

impl<'a> Generator<'a> {
    /// `prompt` is consulted when `config.overwrite` is
    /// [`OverwriteMode::Prompt`].
    pub fn new(config: &'a GeneratorConfig, prompt: &'a dyn ConfirmOverwrite) -> Self {
        Generator {
            config,
            scaffolder: scaffold::from_config(config),
            prompt,
        }
    }

    pub fn with_scaffolder(mut self, scaffolder: Box<dyn Scaffolder>) -> Self {
        self.scaffolder = scaffolder;
        self
    }

    /// Derive the identity and plan the artifacts without touching the disk.
    ///
    /// `only` restricts the plan to the named kinds.
    pub fn plan(
        &self,
        raw_name: &str,
        version: Option<&str>,
        only: Option<&[String]>,
    ) -> Result<(ResourceIdentity, Vec<ArtifactSpec>), GenerateError> {
        let identity = self.config.name_deriver().derive(raw_name, version)?;
        let planner = ArtifactPlanner::new(self.config);
        let specs = match only {
            Some(names) => planner.plan_kinds(&identity, &plan::parse_kinds(names)?)?,
            None => planner.plan(&identity)?,
        };
        Ok((identity, specs))
    }

    pub fn run(
        &self,
        raw_name: &str,
        version: Option<&str>,
        only: Option<&[String]>,
    ) -> Result<GenerationReport, GenerateError> {
        self.run_with(raw_name, version, only, |_| {})
    }

    /// Like [`Generator::run`], calling `on_outcome` after each artifact.
    ///
    /// Stops at the first error. Files written before it stay on disk; a
    /// second run picks up where this one stopped.
    pub fn run_with(
        &self,
        raw_name: &str,
        version: Option<&str>,
        only: Option<&[String]>,
        mut on_outcome: impl FnMut(&ArtifactOutcome),
    ) -> Result<GenerationReport, GenerateError> {
        let (identity, specs) = self.plan(raw_name, version, only)?;
        let params = TemplateParams::for_resource(&identity, &self.config.root_namespace);

        // Render everything up front so a template error writes nothing.
        let bodies = specs
            .iter()
            .map(|spec| match &spec.source {
                ArtifactSource::Template(id) => templates::render(*id, &params).map(Some),
                ArtifactSource::Scaffolder(_) => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // A file created earlier in this run (the scaffolder's model stub)
        // is replaced without asking.
        let preexisting = specs
            .iter()
            .map(|spec| spec.target.find_existing(&self.config.base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        let confirm: &dyn ConfirmOverwrite = match self.config.overwrite {
            OverwriteMode::Always => &AlwaysOverwrite,
            OverwriteMode::Never => &NeverOverwrite,
            OverwriteMode::Prompt => self.prompt,
        };
        let emitter = Emitter::new(&self.config.base_dir, self.config.dir_mode, confirm);
        let fresh = Emitter::new(&self.config.base_dir, self.config.dir_mode, &AlwaysOverwrite);

        let mut outcomes = Vec::with_capacity(specs.len());
        for ((spec, body), existed) in specs.iter().zip(&bodies).zip(&preexisting) {
            let result = match (&spec.source, body) {
                (ArtifactSource::Scaffolder(request), _) => {
                    emitter.delegate(spec, self.scaffolder.as_ref(), request)?
                }
                (ArtifactSource::Template(_), Some(body)) if existed.is_none() => {
                    match fresh.emit(spec, body)? {
                        EmitResult::Overwritten => EmitResult::Created,
                        other => other,
                    }
                }
                (ArtifactSource::Template(_), Some(body)) => emitter.emit(spec, body)?,
                (ArtifactSource::Template(id), None) => {
                    return Err(GenerateError::InvalidInput(format!(
                        "template {} was not rendered",
                        id.name()
                    )))
                }
            };
            let outcome = ArtifactOutcome {
                kind: spec.kind,
                path: self.outcome_path(&spec.target)?,
                result,
            };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        tracing::info!(
            name = identity.pascal_name(),
            version = identity.version(),
            written = outcomes.iter().filter(|o| o.result.wrote()).count(),
            "generation finished"
        );
        Ok(GenerationReport { identity, outcomes })
    }

    fn outcome_path(&self, target: &Target) -> Result<PathBuf, GenerateError> {
        let found = target.find_existing(&self.config.base_dir)?;
        Ok(match found {
            Some(path) => path
                .strip_prefix(&self.config.base_dir)
                .map(|p| p.to_path_buf())
                .unwrap_or(path),
            None => target.display_path(),
        })
    }
}
