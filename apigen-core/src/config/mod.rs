mod loader;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::naming::{self, EnglishPluralizer, NameDeriver, SuffixPluralizer};

/// Name of the optional project-level config file, looked up in `base_dir`.
pub const CONFIG_FILE: &str = "apigen.yaml";

/// Prefix of environment variables overriding config keys
/// (`APIGEN_ROOT_NAMESPACE` overrides `root_namespace`).
pub const ENV_PREFIX: &str = "APIGEN_";

/// Error type for configuration loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading the config file.
    Load(String),
    /// A key holds a value that cannot be used.
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which pluralization rule derives route segments and table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralRule {
    /// Append `s`.
    #[default]
    Suffix,
    /// Simple English rules.
    English,
}

/// Which collaborator creates models, migrations, requests and resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaffolderKind {
    /// Write framework-style stubs directly.
    #[default]
    Builtin,
    /// Shell out to `php artisan make:*`.
    Artisan,
}

/// What to do before replacing a file whose policy is `OverwriteAlways`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Ask interactively.
    #[default]
    Prompt,
    /// Overwrite without asking.
    Always,
    /// Keep the existing file.
    Never,
}

macro_rules! impl_from_str {
    ($ty:ty, $key:literal, { $( $name:literal => $variant:expr ),* $(,)? }) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $( $name => Ok($variant), )*
                    other => Err(ConfigError::Invalid {
                        key: $key.into(),
                        message: format!(
                            "unknown value '{other}' (expected one of: {})",
                            [$( $name ),*].join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

impl_from_str!(PluralRule, "pluralizer", {
    "suffix" => PluralRule::Suffix,
    "english" => PluralRule::English,
});

impl_from_str!(ScaffolderKind, "scaffolder", {
    "builtin" => ScaffolderKind::Builtin,
    "artisan" => ScaffolderKind::Artisan,
});

impl_from_str!(OverwriteMode, "overwrite", {
    "prompt" => OverwriteMode::Prompt,
    "always" => OverwriteMode::Always,
    "never" => OverwriteMode::Never,
});

/// Explicit settings for one generation run.
///
/// Resolution order (lowest to highest priority):
/// 1. built-in defaults
/// 2. `apigen.yaml` in the project root
/// 3. `APIGEN_*` environment variables
/// 4. command-line flags (applied by the caller)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Project root; every target path is relative to it.
    pub base_dir: PathBuf,
    /// Application source root, relative to `base_dir`.
    pub app_dir: PathBuf,
    /// Routes file receiving `Route::apiResource` lines.
    pub routes_file: PathBuf,
    /// Directory holding migration stubs.
    pub migrations_dir: PathBuf,
    /// Namespace prefix of generated classes.
    pub root_namespace: String,
    /// Permission mode for created directories. Octal digits, written as
    /// `755`, `"0755"` or `"0o755"`.
    #[serde(deserialize_with = "loader::deserialize_mode")]
    pub dir_mode: u32,
    /// Version used when none is given on the command line.
    pub default_version: String,
    pub pluralizer: PluralRule,
    pub scaffolder: ScaffolderKind,
    /// PHP interpreter used by the artisan scaffolder.
    pub php_binary: String,
    pub overwrite: OverwriteMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            base_dir: PathBuf::from("."),
            app_dir: PathBuf::from("app"),
            routes_file: PathBuf::from("routes/api.php"),
            migrations_dir: PathBuf::from("database/migrations"),
            root_namespace: "App".into(),
            dir_mode: 0o755,
            default_version: naming::DEFAULT_VERSION.into(),
            pluralizer: PluralRule::Suffix,
            scaffolder: ScaffolderKind::Builtin,
            php_binary: "php".into(),
            overwrite: OverwriteMode::Prompt,
        }
    }
}

impl GeneratorConfig {
    /// Load the configuration for the project rooted at `base_dir`.
    ///
    /// Reads `apigen.yaml` if present, then overlays `APIGEN_*` variables
    /// from the process environment. `base_dir` always wins over a value in
    /// the file.
    pub fn load(base_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(base_dir, std::env::vars())
    }

    /// Like [`GeneratorConfig::load`] with an explicit environment.
    pub fn load_with_env(
        base_dir: &Path,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut config = loader::load_yaml_file(&base_dir.join(CONFIG_FILE))?.unwrap_or_default();
        config.base_dir = base_dir.to_path_buf();
        loader::apply_env(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise surface as broken generated code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_namespace.is_empty()
            || !self.root_namespace.split('\\').all(naming::is_identifier)
        {
            return Err(ConfigError::Invalid {
                key: "root_namespace".into(),
                message: format!(
                    "'{}' is not a backslash-separated list of identifiers",
                    self.root_namespace
                ),
            });
        }
        if !naming::is_identifier(&self.default_version) {
            return Err(ConfigError::Invalid {
                key: "default_version".into(),
                message: format!("'{}' is not a valid identifier", self.default_version),
            });
        }
        if self.dir_mode > 0o7777 {
            return Err(ConfigError::Invalid {
                key: "dir_mode".into(),
                message: format!("{:o} is not a permission mode", self.dir_mode),
            });
        }
        Ok(())
    }

    /// A [`NameDeriver`] honouring `pluralizer` and `default_version`.
    pub fn name_deriver(&self) -> NameDeriver {
        match self.pluralizer {
            PluralRule::Suffix => NameDeriver::new(Box::new(SuffixPluralizer), &self.default_version),
            PluralRule::English => {
                NameDeriver::new(Box::new(EnglishPluralizer), &self.default_version)
            }
        }
    }

    /// `<app_dir>/<relative>`, still relative to `base_dir`.
    pub fn app_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.app_dir.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn defaults_without_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap();
        assert_eq!(config.base_dir, tmp.path());
        assert_eq!(config.app_dir, PathBuf::from("app"));
        assert_eq!(config.routes_file, PathBuf::from("routes/api.php"));
        assert_eq!(config.root_namespace, "App");
        assert_eq!(config.dir_mode, 0o755);
        assert_eq!(config.default_version, "V1");
        assert_eq!(config.overwrite, OverwriteMode::Prompt);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "routes_file: routes/api_v2.php\nroot_namespace: Acme\\Shop\npluralizer: english\nscaffolder: artisan\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap();
        assert_eq!(config.routes_file, PathBuf::from("routes/api_v2.php"));
        assert_eq!(config.root_namespace, "Acme\\Shop");
        assert_eq!(config.pluralizer, PluralRule::English);
        assert_eq!(config.scaffolder, ScaffolderKind::Artisan);
        assert_eq!(config.app_dir, PathBuf::from("app"));
    }

    #[test]
    fn env_overrides_yaml() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "default_version: V2\n").unwrap();

        let env = vec![
            ("APIGEN_DEFAULT_VERSION".to_string(), "V3".to_string()),
            ("APIGEN_DIR_MODE".to_string(), "750".to_string()),
            ("APIGEN_OVERWRITE".to_string(), "Never".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ];
        let config = GeneratorConfig::load_with_env(tmp.path(), env).unwrap();
        assert_eq!(config.default_version, "V3");
        assert_eq!(config.dir_mode, 0o750);
        assert_eq!(config.overwrite, OverwriteMode::Never);
    }

    #[test]
    fn yaml_dir_mode_is_octal() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "dir_mode: 755\n").unwrap();
        let config = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap();
        assert_eq!(config.dir_mode, 0o755);

        fs::write(tmp.path().join(CONFIG_FILE), "dir_mode: \"0o750\"\n").unwrap();
        let config = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap();
        assert_eq!(config.dir_mode, 0o750);

        fs::write(tmp.path().join(CONFIG_FILE), "dir_mode: \"0700\"\n").unwrap();
        let config = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap();
        assert_eq!(config.dir_mode, 0o700);

        fs::write(tmp.path().join(CONFIG_FILE), "dir_mode: 789\n").unwrap();
        let err = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap_err();
        assert!(err.to_string().contains("dir_mode"), "{err}");
    }

    #[test]
    fn unknown_yaml_key_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "namespace_prefix: App\n").unwrap();
        let err = GeneratorConfig::load_with_env(tmp.path(), no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let env = vec![("APIGEN_SCAFFOLDER".to_string(), "composer".to_string())];
        let err = GeneratorConfig::load_with_env(tmp.path(), env).unwrap_err();
        assert!(err.to_string().contains("scaffolder"));

        let env = vec![("APIGEN_ROOT_NAMESPACE".to_string(), "App\\\\Bad-Name".to_string())];
        let err = GeneratorConfig::load_with_env(tmp.path(), env).unwrap_err();
        assert!(err.to_string().contains("root_namespace"));

        let env = vec![("APIGEN_DIR_MODE".to_string(), "rwx".to_string())];
        assert!(GeneratorConfig::load_with_env(tmp.path(), env).is_err());
    }
}
