use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::{ConfigError, GeneratorConfig, ENV_PREFIX};

/// Load and deserialize the YAML config file, if it exists.
pub(crate) fn load_yaml_file(path: &Path) -> Result<Option<GeneratorConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    if content.trim().is_empty() {
        return Ok(Some(GeneratorConfig::default()));
    }
    let config = serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    Ok(Some(config))
}

/// Overlay `APIGEN_*` variables onto `config`.
///
/// Convention: `APIGEN_ROUTES_FILE` <-> `routes_file`. Variables with the
/// prefix but no matching key are ignored; `base_dir` is not overridable.
pub(crate) fn apply_env(
    config: &mut GeneratorConfig,
    env: impl IntoIterator<Item = (String, String)>,
) -> Result<(), ConfigError> {
    for (env_key, value) in env {
        let Some(key) = env_key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "app_dir" => config.app_dir = PathBuf::from(value),
            "routes_file" => config.routes_file = PathBuf::from(value),
            "migrations_dir" => config.migrations_dir = PathBuf::from(value),
            "root_namespace" => config.root_namespace = value,
            "default_version" => config.default_version = value,
            "php_binary" => config.php_binary = value,
            "dir_mode" => config.dir_mode = parse_mode(&value)?,
            "pluralizer" => config.pluralizer = value.parse()?,
            "scaffolder" => config.scaffolder = value.parse()?,
            "overwrite" => config.overwrite = value.parse()?,
            _ => {}
        }
    }
    Ok(())
}

/// Octal permission mode, with or without a `0o` prefix.
fn parse_mode(value: &str) -> Result<u32, ConfigError> {
    let digits = value.trim().trim_start_matches("0o");
    u32::from_str_radix(digits, 8).map_err(|_| ConfigError::Invalid {
        key: "dir_mode".into(),
        message: format!("'{value}' is not an octal permission mode"),
    })
}

/// `dir_mode` from YAML: an integer or a string, digits read as octal.
pub(crate) fn deserialize_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    let digits = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n.to_string(),
        Raw::Text(s) => s,
    };
    parse_mode(&digits).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_octal_modes() {
        assert_eq!(parse_mode("755").unwrap(), 0o755);
        assert_eq!(parse_mode("0o700").unwrap(), 0o700);
        assert_eq!(parse_mode("0755").unwrap(), 0o755);
        assert!(parse_mode("9").is_err());
    }
}
