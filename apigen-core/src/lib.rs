//! # apigen-core
//!
//! Scaffolding engine behind the `apigen` CLI. Given a resource name and an
//! optional API version it produces the layered CRUD stack of a Laravel-style
//! application: model, migration, repository, DTO, service, filter,
//! exception, requests, resource, controller and route registration.
//!
//! The pipeline is single-pass:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | NameDeriver | [`naming`] | [`ResourceIdentity`] |
//! | ArtifactPlanner | [`plan`] | ordered [`ArtifactSpec`]s |
//! | TemplateCatalog | [`templates`] | rendered file bodies |
//! | Emitter | [`emit`] | [`EmitResult`] per artifact |
//!
//! [`Generator`] wires the stages together. The files on disk are the only
//! state: an artifact that already exists is never recreated, which makes
//! re-running a half-finished generation the recovery path.

pub mod config;
pub mod emit;
mod error;
pub mod naming;
pub mod patch;
mod pipeline;
pub mod plan;
pub mod scaffold;
pub mod templates;

pub use config::{ConfigError, GeneratorConfig, OverwriteMode, PluralRule, ScaffolderKind};
pub use emit::{AlwaysOverwrite, ConfirmOverwrite, EmitResult, Emitter, NeverOverwrite};
pub use error::GenerateError;
pub use naming::{NameDeriver, ResourceIdentity};
pub use pipeline::{ArtifactOutcome, GenerationReport, Generator};
pub use plan::{ArtifactKind, ArtifactSpec, RequestAction, WritePolicy};
pub use scaffold::{ArtisanScaffolder, BuiltinScaffolder, Scaffolder};
