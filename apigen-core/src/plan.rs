//! Artifact planning.
//!
//! [`ArtifactPlanner::plan`] turns a [`ResourceIdentity`] into the ordered list
//! of files to realise. Every target path is a pure function of
//! `(kind, name, version)` plus the configuration, so repeated runs aim at
//! the same files and their existence doubles as the record of what has been
//! generated.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::GeneratorConfig;
use crate::naming::ResourceIdentity;
use crate::scaffold::ScaffoldRequest;
use crate::templates::{self, TemplateId, TemplateParams};
use crate::GenerateError;

/// Which form request a [`ArtifactKind::Request`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    Store,
    Update,
}

impl RequestAction {
    pub fn prefix(self) -> &'static str {
        match self {
            RequestAction::Store => "Store",
            RequestAction::Update => "Update",
        }
    }
}

/// One kind of generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ModelBase,
    QueryFilterBase,
    BaseRepositoryInterface,
    BaseRepository,
    ApiRenderableException,
    ApiResponses,
    ApiControllerBase,
    Migration,
    Model,
    Repository,
    Dto,
    Exception,
    Service,
    Filter,
    Request(RequestAction),
    Resource,
    Controller,
    RouteFragment,
}

impl ArtifactKind {
    /// Every kind, in plan order: shared artifacts first, then the resource
    /// artifacts so that nothing refers to a symbol planned later.
    pub const ALL: [ArtifactKind; 19] = [
        ArtifactKind::ModelBase,
        ArtifactKind::QueryFilterBase,
        ArtifactKind::BaseRepositoryInterface,
        ArtifactKind::BaseRepository,
        ArtifactKind::ApiRenderableException,
        ArtifactKind::ApiResponses,
        ArtifactKind::ApiControllerBase,
        ArtifactKind::Migration,
        ArtifactKind::Model,
        ArtifactKind::Repository,
        ArtifactKind::Dto,
        ArtifactKind::Exception,
        ArtifactKind::Service,
        ArtifactKind::Filter,
        ArtifactKind::Request(RequestAction::Store),
        ArtifactKind::Request(RequestAction::Update),
        ArtifactKind::Resource,
        ArtifactKind::Controller,
        ArtifactKind::RouteFragment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::ModelBase => "model-base",
            ArtifactKind::QueryFilterBase => "query-filter",
            ArtifactKind::BaseRepositoryInterface => "base-repository-interface",
            ArtifactKind::BaseRepository => "base-repository",
            ArtifactKind::ApiRenderableException => "api-renderable-exception",
            ArtifactKind::ApiResponses => "api-responses",
            ArtifactKind::ApiControllerBase => "api-controller",
            ArtifactKind::Migration => "migration",
            ArtifactKind::Model => "model",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Dto => "dto",
            ArtifactKind::Exception => "exception",
            ArtifactKind::Service => "service",
            ArtifactKind::Filter => "filter",
            ArtifactKind::Request(RequestAction::Store) => "store-request",
            ArtifactKind::Request(RequestAction::Update) => "update-request",
            ArtifactKind::Resource => "resource",
            ArtifactKind::Controller => "controller",
            ArtifactKind::RouteFragment => "routes",
        }
    }

    /// Shared artifacts exist once per project or version, not per resource.
    pub fn is_shared(self) -> bool {
        matches!(
            self,
            ArtifactKind::ModelBase
                | ArtifactKind::QueryFilterBase
                | ArtifactKind::BaseRepositoryInterface
                | ArtifactKind::BaseRepository
                | ArtifactKind::ApiRenderableException
                | ArtifactKind::ApiResponses
                | ArtifactKind::ApiControllerBase
        )
    }

    pub fn write_policy(self) -> WritePolicy {
        match self {
            ArtifactKind::Model => WritePolicy::OverwriteAlways,
            ArtifactKind::Controller | ArtifactKind::RouteFragment => WritePolicy::PatchExisting,
            _ => WritePolicy::CreateIfAbsent,
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtifactKind {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| GenerateError::UnsupportedKind(s.to_string()))
    }
}

/// Parse a list of kind names. `request` selects both form requests.
pub fn parse_kinds<S: AsRef<str>>(names: &[S]) -> Result<Vec<ArtifactKind>, GenerateError> {
    let mut kinds = Vec::new();
    for name in names {
        match name.as_ref().trim().to_ascii_lowercase().as_str() {
            "request" | "requests" => {
                kinds.push(ArtifactKind::Request(RequestAction::Store));
                kinds.push(ArtifactKind::Request(RequestAction::Update));
            }
            _ => kinds.push(name.as_ref().parse()?),
        }
    }
    Ok(kinds)
}

/// How an existing target file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Skip if the target exists; user edits are never touched.
    CreateIfAbsent,
    /// Replace the target. Destructive: the emitter warns first.
    OverwriteAlways,
    /// Splice generated text into the existing target at an anchor.
    PatchExisting,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WritePolicy::CreateIfAbsent => "create-if-absent",
            WritePolicy::OverwriteAlways => "overwrite",
            WritePolicy::PatchExisting => "patch",
        })
    }
}

/// Where an artifact lives, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A fixed path.
    File(PathBuf),
    /// Any file in `dir` whose name ends with `suffix`; used for timestamped
    /// migrations.
    Matching { dir: PathBuf, suffix: String },
}

impl Target {
    /// The fixed path, or `dir/*suffix` for matching targets.
    pub fn display_path(&self) -> PathBuf {
        match self {
            Target::File(path) => path.clone(),
            Target::Matching { dir, suffix } => dir.join(format!("*{suffix}")),
        }
    }

    /// The existing file satisfying this target under `root`, if any.
    pub fn find_existing(&self, root: &Path) -> Result<Option<PathBuf>, GenerateError> {
        match self {
            Target::File(path) => {
                let full = root.join(path);
                Ok(full.is_file().then_some(full))
            }
            Target::Matching { dir, suffix } => {
                let full_dir = root.join(dir);
                if !full_dir.is_dir() {
                    return Ok(None);
                }
                let entries =
                    std::fs::read_dir(&full_dir).map_err(|e| GenerateError::io(&full_dir, e))?;
                for entry in entries {
                    let entry = entry.map_err(|e| GenerateError::io(&full_dir, e))?;
                    if entry.file_name().to_string_lossy().ends_with(suffix.as_str()) {
                        return Ok(Some(entry.path()));
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Where the content of an artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Rendered from the template catalog.
    Template(TemplateId),
    /// Delegated to a [`crate::Scaffolder`].
    Scaffolder(ScaffoldRequest),
}

/// Insertion rule for [`WritePolicy::PatchExisting`] artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Merge into the body of `class <class_name> ... {`.
    ClassBody { class_name: String },
    /// Add a line to the route group matched by the regex `opener`, unless
    /// `marker` already appears inside that group. A file without the group
    /// gets `group` appended; a missing file is created from `seed`.
    RouteGroup {
        opener: String,
        marker: String,
        group: String,
        seed: String,
    },
}

/// Regex matching the opening line of `Route::prefix('<prefix>')->group(function () {`.
pub fn route_group_opener(prefix: &str) -> String {
    format!(
        r"Route::prefix\(\s*['\x22]{}['\x22]\s*\)\s*->\s*group\(\s*function\s*\(\s*\)\s*(?:use\s*\([^)]*\)\s*)?\{{",
        regex::escape(prefix)
    )
}

/// One planned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub target: Target,
    pub write_policy: WritePolicy,
    pub source: ArtifactSource,
    pub anchor: Option<Anchor>,
}

impl ArtifactSpec {
    fn new(kind: ArtifactKind, target: Target, source: ArtifactSource) -> Self {
        ArtifactSpec {
            kind,
            target,
            write_policy: kind.write_policy(),
            source,
            anchor: None,
        }
    }

    fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Computes the ordered artifact list for a resource.
pub struct ArtifactPlanner<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ArtifactPlanner<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        ArtifactPlanner { config }
    }

    /// Plan every artifact kind.
    pub fn plan(&self, identity: &ResourceIdentity) -> Result<Vec<ArtifactSpec>, GenerateError> {
        self.plan_kinds(identity, &ArtifactKind::ALL)
    }

    /// Plan a subset of kinds. The result keeps plan order regardless of the
    /// order of `kinds`, and holds at most one spec per kind.
    pub fn plan_kinds(
        &self,
        identity: &ResourceIdentity,
        kinds: &[ArtifactKind],
    ) -> Result<Vec<ArtifactSpec>, GenerateError> {
        let mut selected: Vec<ArtifactKind> = kinds.to_vec();
        selected.sort_by_key(|k| k.position());
        selected.dedup();

        let params = TemplateParams::for_resource(identity, &self.config.root_namespace);
        selected
            .into_iter()
            .map(|kind| {
                let spec = self.spec(identity, &params, kind)?;
                tracing::debug!(
                    kind = %spec.kind,
                    policy = %spec.write_policy,
                    path = %spec.target.display_path().display(),
                    "planned artifact"
                );
                Ok(spec)
            })
            .collect()
    }

    /// Plan kinds given by name; unknown names fail with
    /// [`GenerateError::UnsupportedKind`].
    pub fn plan_named<S: AsRef<str>>(
        &self,
        identity: &ResourceIdentity,
        names: &[S],
    ) -> Result<Vec<ArtifactSpec>, GenerateError> {
        let kinds = parse_kinds(names)?;
        self.plan_kinds(identity, &kinds)
    }

    fn spec(
        &self,
        identity: &ResourceIdentity,
        params: &TemplateParams,
        kind: ArtifactKind,
    ) -> Result<ArtifactSpec, GenerateError> {
        let name = identity.pascal_name();
        let v = identity.version();
        let app = |relative: String| Target::File(self.config.app_path(relative));
        let template = ArtifactSource::Template;

        let spec = match kind {
            ArtifactKind::ModelBase => ArtifactSpec::new(
                kind,
                app("Models/ModelBase.php".into()),
                template(TemplateId::ModelBase),
            ),
            ArtifactKind::QueryFilterBase => ArtifactSpec::new(
                kind,
                app("Filters/QueryFilter.php".into()),
                template(TemplateId::QueryFilter),
            ),
            ArtifactKind::BaseRepositoryInterface => ArtifactSpec::new(
                kind,
                app(format!("Interfaces/{v}/BaseRepositoryInterface{v}.php")),
                template(TemplateId::BaseRepositoryInterface),
            ),
            ArtifactKind::BaseRepository => ArtifactSpec::new(
                kind,
                app(format!("Repositories/{v}/BaseRepository{v}.php")),
                template(TemplateId::BaseRepository),
            ),
            ArtifactKind::ApiRenderableException => ArtifactSpec::new(
                kind,
                app(format!("Interfaces/{v}/ApiRenderableException{v}.php")),
                template(TemplateId::ApiRenderableException),
            ),
            ArtifactKind::ApiResponses => ArtifactSpec::new(
                kind,
                app("Traits/ApiResponses.php".into()),
                template(TemplateId::ApiResponses),
            ),
            ArtifactKind::ApiControllerBase => ArtifactSpec::new(
                kind,
                app(format!("Http/Controllers/Api/{v}/ApiController{v}.php")),
                template(TemplateId::ApiController),
            ),
            ArtifactKind::Migration => ArtifactSpec::new(
                kind,
                Target::Matching {
                    dir: self.config.migrations_dir.clone(),
                    suffix: format!("_create_{}_table.php", identity.table_name()),
                },
                ArtifactSource::Scaffolder(ScaffoldRequest::Model {
                    class_name: name.to_string(),
                    table_name: identity.table_name().to_string(),
                    with_migration: true,
                }),
            ),
            ArtifactKind::Model => ArtifactSpec::new(
                kind,
                app(format!("Models/{name}.php")),
                template(TemplateId::Model),
            ),
            ArtifactKind::Repository => ArtifactSpec::new(
                kind,
                app(format!("Repositories/{v}/{name}Repository{v}.php")),
                template(TemplateId::Repository),
            ),
            ArtifactKind::Dto => ArtifactSpec::new(
                kind,
                app(format!("DTOs/{v}/{name}DTO{v}.php")),
                template(TemplateId::Dto),
            ),
            ArtifactKind::Exception => ArtifactSpec::new(
                kind,
                app(format!("Exceptions/{name}Exception.php")),
                template(TemplateId::Exception),
            ),
            ArtifactKind::Service => ArtifactSpec::new(
                kind,
                app(format!("Services/Api/{v}/{name}Service{v}.php")),
                template(TemplateId::Service),
            ),
            ArtifactKind::Filter => ArtifactSpec::new(
                kind,
                app(format!("Filters/{name}Filter.php")),
                template(TemplateId::Filter),
            ),
            ArtifactKind::Request(action) => {
                let qualified = format!("Api/{v}/{name}/{}{name}Request{v}", action.prefix());
                ArtifactSpec::new(
                    kind,
                    app(format!("Http/Requests/{qualified}.php")),
                    ArtifactSource::Scaffolder(ScaffoldRequest::Request {
                        qualified_name: qualified,
                    }),
                )
            }
            ArtifactKind::Resource => {
                let qualified = format!("Api/{v}/{name}/{name}Resource{v}");
                ArtifactSpec::new(
                    kind,
                    app(format!("Http/Resources/{qualified}.php")),
                    ArtifactSource::Scaffolder(ScaffoldRequest::Resource {
                        qualified_name: qualified,
                    }),
                )
            }
            ArtifactKind::Controller => ArtifactSpec::new(
                kind,
                app(format!("Http/Controllers/Api/{v}/{name}Controller{v}.php")),
                template(TemplateId::Controller),
            )
            .with_anchor(Anchor::ClassBody {
                class_name: format!("{name}Controller{v}"),
            }),
            ArtifactKind::RouteFragment => ArtifactSpec::new(
                kind,
                Target::File(self.config.routes_file.clone()),
                template(TemplateId::RouteFragment),
            )
            .with_anchor(Anchor::RouteGroup {
                opener: route_group_opener(&identity.version_lower()),
                marker: format!("'{}'", identity.route_segment()),
                group: templates::render(TemplateId::RouteGroup, params)?,
                seed: templates::render(TemplateId::RoutesFile, params)?,
            }),
        };
        Ok(spec)
    }
}
