//! Configuration discovery and effective settings resolution.
//!
//! Topicguard reads `topicguard.toml|yaml|yml` from the repository root (or
//! closest ancestor), or the file named by `--config`, and merges it with
//! CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `severity`: `warning`
//! - `fail_on_parse_error`: false
//! - `include`: `["**/*.go"]`
//! - `exclude`: `["vendor/**"]`
//! - `[signature]`: go-ethereum's `FilterQuery`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::ConfigError;
use crate::models::signature::FilterSignature;
use crate::models::{OutputMode, Severity};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_NAMES: [&str; 3] = ["topicguard.toml", "topicguard.yaml", "topicguard.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// Root configuration loaded from `topicguard.toml|yaml`.
pub struct GuardConfig {
    pub output: Option<OutputMode>,
    pub severity: Option<Severity>,
    pub fail_on_parse_error: Option<bool>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub signature: Option<FilterSignature>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// The config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub output: OutputMode,
    pub severity: Severity,
    pub fail_on_parse_error: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub signature: FilterSignature,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `topicguard.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|name| cur.join(name).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// The config file under `root`, TOML first.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

/// Parse a config file; the format follows the extension.
pub fn load_config_file(path: &Path) -> Result<GuardConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    } else {
        toml::from_str(&text).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    })
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&Path>,
    cli_config: Option<&Path>,
    cli_output: Option<OutputMode>,
    cli_severity: Option<Severity>,
    cli_fail_on_parse_error: Option<bool>,
) -> Result<Effective, ConfigError> {
    let start = cli_repo_root.unwrap_or(Path::new("."));
    let repo_root = detect_repo_root(start);

    let config_path = match cli_config {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config(&repo_root),
    };
    let cfg = match &config_path {
        Some(path) => load_config_file(path)?,
        None => GuardConfig::default(),
    };
    debug!(
        repo_root = %repo_root.display(),
        config = ?config_path,
        "configuration discovered"
    );

    let signature = cfg.signature.unwrap_or_default();
    signature.validate()?;

    Ok(Effective {
        repo_root,
        config_path,
        output: cli_output.or(cfg.output).unwrap_or_default(),
        severity: cli_severity.or(cfg.severity).unwrap_or_default(),
        fail_on_parse_error: cli_fail_on_parse_error
            .or(cfg.fail_on_parse_error)
            .unwrap_or(false),
        include: cfg
            .include
            .unwrap_or_else(|| vec!["**/*.go".to_string()]),
        exclude: cfg
            .exclude
            .unwrap_or_else(|| vec!["vendor/**".to_string()]),
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn resolve(root: &Path) -> Result<Effective, ConfigError> {
        resolve_effective(Some(root), None, None, None, None)
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve(dir.path()).unwrap();
        assert!(eff.config_path.is_none());
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.severity, Severity::Warning);
        assert!(!eff.fail_on_parse_error);
        assert_eq!(eff.include, vec!["**/*.go"]);
        assert_eq!(eff.exclude, vec!["vendor/**"]);
        assert_eq!(eff.signature, FilterSignature::default());
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("topicguard.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
severity = "error"
fail_on_parse_error = true
exclude = ["vendor/**", "third_party/**"]
            "#
        )
        .unwrap();

        // Resolve from a nested directory to exercise the upward walk
        let nested = root.join("pkg/watcher");
        fs::create_dir_all(&nested).unwrap();
        let eff = resolve(&nested).unwrap();
        assert_eq!(eff.repo_root, root);
        assert_eq!(eff.output, OutputMode::Json);
        assert_eq!(eff.severity, Severity::Error);
        assert!(eff.fail_on_parse_error);
        assert_eq!(eff.exclude.len(), 2);
    }

    #[test]
    fn test_load_yaml_signature() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("topicguard.yml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
signature:
  fields: [FromBlock, ToBlock, Address, Topics]
  addresses: Address
            "#
        )
        .unwrap();

        let eff = resolve(root).unwrap();
        assert_eq!(eff.signature.addresses, "Address");
        assert_eq!(eff.signature.topics, "Topics");
        assert_eq!(eff.signature.topics_depth, 2);
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("topicguard.toml"),
            "output = \"json\"\nseverity = \"error\"\nfail_on_parse_error = true\n",
        )
        .unwrap();
        let eff = resolve_effective(
            Some(root),
            None,
            Some(OutputMode::Human),
            Some(Severity::Warning),
            Some(false),
        )
        .unwrap();
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.severity, Severity::Warning);
        assert!(!eff.fail_on_parse_error);
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "severity = \"error\"\n").unwrap();
        let eff = resolve_effective(Some(dir.path()), Some(&path), None, None, None).unwrap();
        assert_eq!(eff.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(eff.severity, Severity::Error);

        let missing = dir.path().join("absent.toml");
        let err = resolve_effective(Some(dir.path()), Some(&missing), None, None, None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::PathNotFound { .. }));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("topicguard.toml"), "severity = \"fatal\"\n").unwrap();
        let err = resolve(root).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }));

        fs::write(root.join("topicguard.toml"), "sevrity = \"error\"\n").unwrap();
        assert!(matches!(
            resolve(root).unwrap_err(),
            ConfigError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_invalid_signature_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("topicguard.toml"),
            "[signature]\nfields = [\"Topics\"]\n",
        )
        .unwrap();
        assert!(matches!(
            resolve(root).unwrap_err(),
            ConfigError::InvalidSignature(_)
        ));
    }
}
