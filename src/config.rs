//! Settings resolution
//!
//! Reads settings from (in priority order):
//! - command line flags
//! - the `npm_config_registry` environment variable (registry only)
//! - .ts-typie.toml in the project root
//! - .npmrc in the project root, then ~/.npmrc (registry only)

use crate::classifier::DEFAULT_EXEMPT;
use crate::cli::CliArgs;
use crate::error::{ConfigError, ToolError};
use crate::package_manager::PackageTool;
use crate::registry::DEFAULT_CONCURRENCY;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional project config file
pub const CONFIG_FILENAME: &str = ".ts-typie.toml";

/// Registry used when nothing else is configured
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Environment variable npm itself reads the registry from
pub const REGISTRY_ENV: &str = "npm_config_registry";

/// Contents of .ts-typie.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub registry: Option<String>,
    pub tool: Option<PackageTool>,
    pub exempt: Option<Vec<String>>,
    pub concurrency: Option<usize>,
}

impl FileConfig {
    /// Parse config file content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `<root>/.ts-typie.toml`; a missing file yields the empty config
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("loaded {}", path.display());
        Self::parse(&content, &path)
    }
}

/// Settings taken from outside the project
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// Value of `npm_config_registry`
    pub env_registry: Option<String>,
    /// Path of the user-level .npmrc
    pub user_npmrc: Option<PathBuf>,
}

impl Sources {
    /// Read the process environment
    pub fn from_environment() -> Self {
        Self {
            env_registry: std::env::var(REGISTRY_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty()),
            user_npmrc: dirs::home_dir().map(|home| home.join(".npmrc")),
        }
    }
}

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Project root (directory holding package.json)
    pub root: PathBuf,
    /// Registry base URL, without trailing slash
    pub registry: String,
    /// Explicitly chosen tool; `None` means detect on PATH
    pub tool: Option<PackageTool>,
    /// Dependencies never trusted to be self typed
    pub exempt: Vec<String>,
    /// Maximum number of registry lookups in flight
    pub concurrency: usize,
}

impl Settings {
    /// Resolve settings for the project at `root`
    pub fn resolve(args: &CliArgs, root: &Path, sources: &Sources) -> Result<Self, ConfigError> {
        let file = FileConfig::load(root)?;

        let registry = match args
            .registry
            .clone()
            .or_else(|| sources.env_registry.clone())
            .or_else(|| file.registry.clone())
            .or_else(|| read_npmrc_registry(&root.join(".npmrc")))
            .or_else(|| sources.user_npmrc.as_deref().and_then(read_npmrc_registry))
        {
            Some(value) => normalize_registry(&value)?,
            None => DEFAULT_REGISTRY.to_string(),
        };

        let mut exempt: Vec<String> = match file.exempt {
            Some(list) => list,
            None => DEFAULT_EXEMPT.iter().map(|s| s.to_string()).collect(),
        };
        for name in &args.exempt {
            if !exempt.contains(name) {
                exempt.push(name.clone());
            }
        }

        let concurrency = args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: concurrency });
        }

        let settings = Self {
            root: root.to_path_buf(),
            registry,
            tool: args.tool.or(file.tool),
            exempt,
            concurrency,
        };
        tracing::debug!("resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// The package manager to run: the configured one, else the first found by `detect`
    pub fn package_tool<F>(&self, detect: F) -> Result<PackageTool, ToolError>
    where
        F: FnOnce() -> Option<PackageTool>,
    {
        PackageTool::resolve(self.tool, detect)
    }
}

/// Check that `value` is an http(s) URL and strip any trailing slash
pub fn normalize_registry(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed).map_err(|e| ConfigError::invalid_registry(value, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        scheme => Err(ConfigError::invalid_registry(
            value,
            format!("unsupported scheme '{}'", scheme),
        )),
    }
}

/// Read the registry for @types packages from an .npmrc file
///
/// A `@types:registry` entry wins over the plain `registry` entry.
fn read_npmrc_registry(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;

    let mut scoped = None;
    let mut plain = None;

    for line in content.lines() {
        let line = line.trim();
        // Skip comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        // Handle quoted values
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if value.is_empty() {
            continue;
        }

        match key.trim() {
            "@types:registry" => scoped = Some(value.to_string()),
            "registry" => plain = Some(value.to_string()),
            _ => {}
        }
    }

    scoped.or(plain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["ts-typie"];
        argv.extend(extra);
        CliArgs::parse_from(argv)
    }

    fn resolve(dir: &TempDir, extra: &[&str]) -> Result<Settings, ConfigError> {
        Settings::resolve(&args(extra), dir.path(), &Sources::default())
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = resolve(&dir, &[]).unwrap();

        assert_eq!(settings.root, dir.path());
        assert_eq!(settings.registry, DEFAULT_REGISTRY);
        assert!(settings.tool.is_none());
        assert_eq!(settings.exempt, vec!["jest"]);
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"
registry = "https://npm.example.com/"
tool = "npm"
exempt = ["mocha"]
concurrency = 4
"#,
        )
        .unwrap();

        let settings = resolve(&dir, &[]).unwrap();
        assert_eq!(settings.registry, "https://npm.example.com");
        assert_eq!(settings.tool, Some(PackageTool::Npm));
        assert_eq!(settings.exempt, vec!["mocha"]);
        assert_eq!(settings.concurrency, 4);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "registry = \"https://file.example.com\"\ntool = \"npm\"\nconcurrency = 4\n",
        )
        .unwrap();

        let settings = resolve(
            &dir,
            &[
                "--registry",
                "https://cli.example.com",
                "--tool",
                "yarn",
                "--concurrency",
                "2",
            ],
        )
        .unwrap();
        assert_eq!(settings.registry, "https://cli.example.com");
        assert_eq!(settings.tool, Some(PackageTool::Yarn));
        assert_eq!(settings.concurrency, 2);
    }

    #[test]
    fn test_exempt_flag_appends() {
        let dir = TempDir::new().unwrap();
        let settings = resolve(&dir, &["--exempt", "mocha", "--exempt", "jest"]).unwrap();
        assert_eq!(settings.exempt, vec!["jest", "mocha"]);
    }

    #[test]
    fn test_empty_exempt_in_config_clears_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "exempt = []\n").unwrap();

        let settings = resolve(&dir, &[]).unwrap();
        assert!(settings.exempt.is_empty());
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "registy = \"typo\"\n").unwrap();

        let err = resolve(&dir, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "tool = [").unwrap();

        assert!(resolve(&dir, &[]).is_err());
    }

    #[test]
    fn test_zero_concurrency_in_config_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "concurrency = 0\n").unwrap();

        let err = resolve(&dir, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConcurrency { value: 0 }));
    }

    #[test]
    fn test_env_registry_beats_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "registry = \"https://file.example.com\"\n",
        )
        .unwrap();
        let sources = Sources {
            env_registry: Some("https://env.example.com".to_string()),
            user_npmrc: None,
        };

        let settings = Settings::resolve(&args(&[]), dir.path(), &sources).unwrap();
        assert_eq!(settings.registry, "https://env.example.com");
    }

    #[test]
    fn test_project_npmrc_scoped_registry_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".npmrc"),
            "# company mirror\nregistry=https://mirror.example.com/\n@types:registry = \"https://types.example.com\"\n",
        )
        .unwrap();

        let settings = resolve(&dir, &[]).unwrap();
        assert_eq!(settings.registry, "https://types.example.com");
    }

    #[test]
    fn test_project_npmrc_plain_registry() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".npmrc"),
            "; comment\nregistry=https://mirror.example.com/\n",
        )
        .unwrap();

        let settings = resolve(&dir, &[]).unwrap();
        assert_eq!(settings.registry, "https://mirror.example.com");
    }

    #[test]
    fn test_user_npmrc_is_last_resort() {
        let dir = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let user_npmrc = home.path().join(".npmrc");
        fs::write(&user_npmrc, "registry=https://home.example.com\n").unwrap();
        let sources = Sources {
            env_registry: None,
            user_npmrc: Some(user_npmrc),
        };

        let settings = Settings::resolve(&args(&[]), dir.path(), &sources).unwrap();
        assert_eq!(settings.registry, "https://home.example.com");

        fs::write(dir.path().join(".npmrc"), "registry=https://project.example.com\n").unwrap();
        let settings = Settings::resolve(&args(&[]), dir.path(), &sources).unwrap();
        assert_eq!(settings.registry, "https://project.example.com");
    }

    #[test]
    fn test_invalid_registry_rejected() {
        let dir = TempDir::new().unwrap();

        let err = resolve(&dir, &["--registry", "not a url"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegistry { .. }));

        let err = resolve(&dir, &["--registry", "ftp://npm.example.com"]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_normalize_registry() {
        assert_eq!(
            normalize_registry(" https://registry.npmjs.org/ ").unwrap(),
            "https://registry.npmjs.org"
        );
        assert_eq!(
            normalize_registry("http://localhost:4873").unwrap(),
            "http://localhost:4873"
        );
    }

    #[test]
    fn test_package_tool_explicit() {
        let dir = TempDir::new().unwrap();
        let settings = resolve(&dir, &["--tool", "npm"]).unwrap();
        assert_eq!(settings.package_tool(|| None).unwrap(), PackageTool::Npm);
    }

    #[test]
    fn test_package_tool_detected() {
        let dir = TempDir::new().unwrap();
        let settings = resolve(&dir, &[]).unwrap();

        assert_eq!(
            settings.package_tool(|| Some(PackageTool::Yarn)).unwrap(),
            PackageTool::Yarn
        );
        assert!(matches!(
            settings.package_tool(|| None),
            Err(ToolError::NoneAvailable { .. })
        ));
    }
}
