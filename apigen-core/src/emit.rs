//! Writing planned artifacts to disk.
//!
//! The emitter is the only component with file-system side effects. It
//! applies each artifact's [`WritePolicy`] against what is already on disk:
//! existing files are skipped, patched, or (after a warning) overwritten.
//! Directories it creates are never removed again, even when a later
//! artifact fails.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::patch::{find_route_group, splice_into_group, ClassDocument, GroupLookup};
use crate::plan::{Anchor, ArtifactSpec, Target, WritePolicy};
use crate::scaffold::{ScaffoldRequest, Scaffolder};
use crate::GenerateError;

/// What happened to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitResult {
    Created,
    Skipped,
    Patched,
    Overwritten,
}

impl EmitResult {
    /// `true` if the file system was modified.
    pub fn wrote(self) -> bool {
        !matches!(self, EmitResult::Skipped)
    }
}

impl fmt::Display for EmitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmitResult::Created => "created",
            EmitResult::Skipped => "skipped",
            EmitResult::Patched => "patched",
            EmitResult::Overwritten => "overwritten",
        })
    }
}

/// Decides whether an `OverwriteAlways` artifact may replace an existing,
/// different file.
pub trait ConfirmOverwrite {
    fn confirm(&self, path: &Path) -> Result<bool, GenerateError>;
}

/// Overwrite without asking.
pub struct AlwaysOverwrite;

impl ConfirmOverwrite for AlwaysOverwrite {
    fn confirm(&self, _path: &Path) -> Result<bool, GenerateError> {
        Ok(true)
    }
}

/// Never overwrite; the existing file is kept.
pub struct NeverOverwrite;

impl ConfirmOverwrite for NeverOverwrite {
    fn confirm(&self, _path: &Path) -> Result<bool, GenerateError> {
        Ok(false)
    }
}

/// Applies [`ArtifactSpec`]s below a project root.
pub struct Emitter<'a> {
    root: PathBuf,
    dir_mode: u32,
    confirm: &'a dyn ConfirmOverwrite,
}

impl<'a> Emitter<'a> {
    pub fn new(root: impl Into<PathBuf>, dir_mode: u32, confirm: &'a dyn ConfirmOverwrite) -> Self {
        Emitter {
            root: root.into(),
            dir_mode,
            confirm,
        }
    }

    /// Realise `spec` with the rendered `body`.
    pub fn emit(&self, spec: &ArtifactSpec, body: &str) -> Result<EmitResult, GenerateError> {
        let Target::File(relative) = &spec.target else {
            return Err(GenerateError::InvalidInput(format!(
                "{} has no fixed target path",
                spec.kind
            )));
        };
        let path = self.root.join(relative);
        let exists = path.is_file();

        match spec.write_policy {
            WritePolicy::CreateIfAbsent => {
                if exists {
                    tracing::debug!(path = %path.display(), "exists, skipping");
                    return Ok(EmitResult::Skipped);
                }
                self.write(&path, body)?;
                Ok(EmitResult::Created)
            }
            WritePolicy::OverwriteAlways => {
                if !exists {
                    self.write(&path, body)?;
                    return Ok(EmitResult::Created);
                }
                if read(&path)? == body {
                    return Ok(EmitResult::Skipped);
                }
                tracing::warn!(
                    path = %path.display(),
                    "{} will be overwritten; local changes are lost",
                    spec.kind
                );
                if !self.confirm.confirm(&path)? {
                    tracing::warn!(path = %path.display(), "overwrite declined, keeping file");
                    return Ok(EmitResult::Skipped);
                }
                self.write(&path, body)?;
                Ok(EmitResult::Overwritten)
            }
            WritePolicy::PatchExisting => {
                let anchor = spec.anchor.as_ref().ok_or_else(|| {
                    GenerateError::InvalidInput(format!("{} has no insertion anchor", spec.kind))
                })?;
                self.patch(&path, exists, anchor, body)
            }
        }
    }

    /// Realise `spec` through `scaffolder`, unless its target already exists.
    pub fn delegate(
        &self,
        spec: &ArtifactSpec,
        scaffolder: &dyn Scaffolder,
        request: &ScaffoldRequest,
    ) -> Result<EmitResult, GenerateError> {
        if let Some(existing) = spec.target.find_existing(&self.root)? {
            tracing::debug!(path = %existing.display(), "exists, skipping");
            return Ok(EmitResult::Skipped);
        }
        scaffolder.scaffold(request)?;
        if spec.target.find_existing(&self.root)?.is_none() {
            tracing::warn!(
                path = %spec.target.display_path().display(),
                "scaffolder finished but the expected file is missing"
            );
        }
        Ok(EmitResult::Created)
    }

    fn patch(
        &self,
        path: &Path,
        exists: bool,
        anchor: &Anchor,
        body: &str,
    ) -> Result<EmitResult, GenerateError> {
        match anchor {
            Anchor::ClassBody { class_name } => {
                if !exists {
                    self.write(path, body)?;
                    return Ok(EmitResult::Created);
                }
                let source = read(path)?;
                let not_found = || GenerateError::AnchorNotFound {
                    path: path.to_path_buf(),
                    anchor: format!("class {class_name} {{"),
                };
                let mut document = ClassDocument::parse(&source, class_name).ok_or_else(not_found)?;
                let generated = ClassDocument::parse(body, class_name).ok_or_else(not_found)?;
                if !document.merge(&generated) {
                    return Ok(EmitResult::Skipped);
                }
                self.write(path, &document.render())?;
                Ok(EmitResult::Patched)
            }
            Anchor::RouteGroup {
                opener,
                marker,
                group,
                seed,
            } => {
                let re = Regex::new(opener)
                    .map_err(|e| GenerateError::InvalidInput(format!("anchor `{opener}`: {e}")))?;
                let not_found = || GenerateError::AnchorNotFound {
                    path: path.to_path_buf(),
                    anchor: opener.clone(),
                };

                let mut source = if exists { read(path)? } else { seed.clone() };
                let found = match find_route_group(&source, &re) {
                    GroupLookup::Found(found) => found,
                    GroupLookup::Unclosed => return Err(not_found()),
                    GroupLookup::Missing => {
                        tracing::debug!(path = %path.display(), "appending route group");
                        source = format!("{}\n\n{group}", source.trim_end());
                        match find_route_group(&source, &re) {
                            GroupLookup::Found(found) => found,
                            _ => return Err(not_found()),
                        }
                    }
                };

                if source[found.body.clone()].contains(marker.as_str()) {
                    tracing::debug!(path = %path.display(), %marker, "already registered");
                    return Ok(EmitResult::Skipped);
                }
                let patched = splice_into_group(&source, &found, body.trim());
                self.write(path, &patched)?;
                Ok(if exists {
                    EmitResult::Patched
                } else {
                    EmitResult::Created
                })
            }
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), GenerateError> {
        ensure_parent_dir(path, self.dir_mode)?;
        std::fs::write(path, content).map_err(|e| GenerateError::io(path, e))?;
        tracing::info!(path = %path.display(), "wrote file");
        Ok(())
    }
}

fn read(path: &Path) -> Result<String, GenerateError> {
    std::fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))
}

/// Create every missing ancestor of `path` with permission `mode`.
pub(crate) fn ensure_parent_dir(path: &Path, mode: u32) -> Result<(), GenerateError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
        .create(parent)
        .map_err(|e| GenerateError::io(parent, e))
}
