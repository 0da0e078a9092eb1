//! Collaborators that create the framework-owned artifacts: models,
//! migrations, form requests and JSON resources.
//!
//! The engine only says *what* to create ([`ScaffoldRequest`]); a
//! [`Scaffolder`] decides how. [`BuiltinScaffolder`] writes the stubs itself,
//! [`ArtisanScaffolder`] delegates to `php artisan make:*`.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;

use crate::config::GeneratorConfig;
use crate::emit::ensure_parent_dir;
use crate::templates::{self, TemplateId, TemplateParams};
use crate::GenerateError;

/// A request to an external scaffolder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldRequest {
    /// Create a model class, optionally with its `create_<table>_table`
    /// migration.
    Model {
        class_name: String,
        table_name: String,
        with_migration: bool,
    },
    /// Create a form request, e.g. `Api/V1/Order/StoreOrderRequestV1`.
    Request { qualified_name: String },
    /// Create a JSON resource, e.g. `Api/V1/Order/OrderResourceV1`.
    Resource { qualified_name: String },
}

impl ScaffoldRequest {
    /// The equivalent artisan arguments, without `php artisan`.
    pub fn artisan_args(&self) -> Vec<String> {
        match self {
            ScaffoldRequest::Model {
                class_name,
                with_migration,
                ..
            } => {
                let mut args = vec!["make:model".to_string(), class_name.clone()];
                if *with_migration {
                    args.push("--migration".into());
                }
                args
            }
            ScaffoldRequest::Request { qualified_name } => {
                vec!["make:request".into(), qualified_name.clone()]
            }
            ScaffoldRequest::Resource { qualified_name } => {
                vec!["make:resource".into(), qualified_name.clone()]
            }
        }
    }
}

/// Creates framework-owned artifacts.
///
/// Implementations must accept qualified names containing `/` or `\`
/// separators and create files at the paths those names imply.
pub trait Scaffolder {
    fn scaffold(&self, request: &ScaffoldRequest) -> Result<(), GenerateError>;
}

/// Writes framework-style stubs directly, without a PHP toolchain.
pub struct BuiltinScaffolder {
    root: PathBuf,
    app_dir: PathBuf,
    migrations_dir: PathBuf,
    root_namespace: String,
    dir_mode: u32,
}

impl BuiltinScaffolder {
    pub fn new(config: &GeneratorConfig) -> Self {
        BuiltinScaffolder {
            root: config.base_dir.clone(),
            app_dir: config.app_dir.clone(),
            migrations_dir: config.migrations_dir.clone(),
            root_namespace: config.root_namespace.clone(),
            dir_mode: config.dir_mode,
        }
    }

    fn write_new(&self, path: &Path, content: &str) -> Result<(), GenerateError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "stub already exists");
            return Ok(());
        }
        ensure_parent_dir(path, self.dir_mode)?;
        std::fs::write(path, content).map_err(|e| GenerateError::io(path, e))?;
        tracing::info!(path = %path.display(), "created stub");
        Ok(())
    }

    fn model(
        &self,
        class_name: &str,
        table_name: &str,
        with_migration: bool,
    ) -> Result<(), GenerateError> {
        let params = TemplateParams::new()
            .with("rootNamespace", &self.root_namespace)
            .with("name", class_name)
            .with("tableName", table_name);

        let model_path = self
            .root
            .join(&self.app_dir)
            .join(format!("Models/{class_name}.php"));
        self.write_new(&model_path, &templates::render(TemplateId::ModelStub, &params)?)?;

        if with_migration {
            let file_name = format!(
                "{}_create_{table_name}_table.php",
                Local::now().format("%Y_%m_%d_%H%M%S")
            );
            let path = self.root.join(&self.migrations_dir).join(file_name);
            self.write_new(&path, &templates::render(TemplateId::Migration, &params)?)?;
        }
        Ok(())
    }

    fn class(
        &self,
        template: TemplateId,
        base: &str,
        qualified_name: &str,
    ) -> Result<(), GenerateError> {
        let segments: Vec<&str> = qualified_name
            .split(|c| c == '/' || c == '\\')
            .filter(|s| !s.is_empty())
            .collect();
        let Some((class_name, dirs)) = segments.split_last() else {
            return Err(GenerateError::InvalidInput(format!(
                "empty class name for {}",
                template.name()
            )));
        };

        let mut namespace = format!("{}\\{}", self.root_namespace, base.replace('/', "\\"));
        let mut path = self.root.join(&self.app_dir).join(base);
        for dir in dirs {
            namespace.push('\\');
            namespace.push_str(dir);
            path.push(dir);
        }
        path.push(format!("{class_name}.php"));

        let params = TemplateParams::new()
            .with("namespace", namespace)
            .with("className", *class_name);
        self.write_new(&path, &templates::render(template, &params)?)
    }
}

impl Scaffolder for BuiltinScaffolder {
    fn scaffold(&self, request: &ScaffoldRequest) -> Result<(), GenerateError> {
        match request {
            ScaffoldRequest::Model {
                class_name,
                table_name,
                with_migration,
            } => self.model(class_name, table_name, *with_migration),
            ScaffoldRequest::Request { qualified_name } => {
                self.class(TemplateId::FormRequest, "Http/Requests", qualified_name)
            }
            ScaffoldRequest::Resource { qualified_name } => {
                self.class(TemplateId::JsonResource, "Http/Resources", qualified_name)
            }
        }
    }
}

/// Runs `php artisan make:*` in the project root.
pub struct ArtisanScaffolder {
    root: PathBuf,
    app_dir: PathBuf,
    php_binary: String,
}

impl ArtisanScaffolder {
    pub fn new(config: &GeneratorConfig) -> Self {
        ArtisanScaffolder {
            root: config.base_dir.clone(),
            app_dir: config.app_dir.clone(),
            php_binary: config.php_binary.clone(),
        }
    }

    /// Arguments passed to the PHP binary for `request`.
    ///
    /// `make:model` refuses to run (and skips the migration) when the model
    /// already exists, so in that case only the migration is requested.
    pub fn command_args(&self, request: &ScaffoldRequest) -> Vec<String> {
        let mut args = vec!["artisan".to_string()];
        match request {
            ScaffoldRequest::Model {
                class_name,
                table_name,
                with_migration: true,
            } if self
                .root
                .join(&self.app_dir)
                .join(format!("Models/{class_name}.php"))
                .exists() =>
            {
                args.push("make:migration".into());
                args.push(format!("create_{table_name}_table"));
                args.push(format!("--create={table_name}"));
            }
            _ => args.extend(request.artisan_args()),
        }
        args.push("--no-interaction".into());
        args
    }
}

impl Scaffolder for ArtisanScaffolder {
    fn scaffold(&self, request: &ScaffoldRequest) -> Result<(), GenerateError> {
        let args = self.command_args(request);
        let command_line = format!("{} {}", self.php_binary, args.join(" "));
        tracing::info!(command = %command_line, "running scaffolder");

        let output = Command::new(&self.php_binary)
            .args(&args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| GenerateError::CollaboratorFailure {
                command: command_line.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(GenerateError::CollaboratorFailure {
                command: command_line,
                message: format!("{} ({})", message, output.status),
            });
        }
        Ok(())
    }
}

/// The scaffolder selected by `config.scaffolder`.
pub fn from_config(config: &GeneratorConfig) -> Box<dyn Scaffolder> {
    match config.scaffolder {
        crate::ScaffolderKind::Builtin => Box::new(BuiltinScaffolder::new(config)),
        crate::ScaffolderKind::Artisan => Box::new(ArtisanScaffolder::new(config)),
    }
}
