//! Layered configuration loading.
//!
//! Sources are merged with figment, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Values passed to [`ConfigLoader::merge`]
//! 3. The profile file, e.g. `strand.production.toml`
//! 4. The main file, `strand.toml` or `config.toml`
//! 5. `STRAND_*` environment variables
//!
//! Environment variables nest with `__`:
//! `STRAND_LOGGING__LEVEL=debug` sets `logging.level`, and
//! `STRAND_DISPATCH__TIMEOUT_MS=5000` sets `dispatch.timeout_ms`.
//!
//! TOML files are read with the `toml-config` feature (on by default), YAML
//! files (`strand.yaml`, `strand.yml`, ...) with `yaml-config`.
//!
//! ```rust,ignore
//! use strand_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .with_user_config_dir()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::{self, Format};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::StrandConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "STRAND_";

/// Selects the profile file merged below the main file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// `strand.development.*`. The default.
    #[default]
    Development,
    /// `strand.production.*`.
    Production,
    /// `strand.<name>.*`.
    Custom(String),
}

impl Profile {
    /// The name used in profile file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name. `dev` and `prod` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        let name = name.to_lowercase();
        match name.as_str() {
            "development" | "dev" => Self::Development,
            "production" | "prod" => Self::Production,
            _ => Self::Custom(name),
        }
    }

    /// The profile named by `STRAND_PROFILE`, or [`Profile::Development`].
    pub fn from_env() -> Self {
        std::env::var("STRAND_PROFILE")
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration file format enabled at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    fn enabled() -> Vec<Self> {
        #[allow(unused_mut)]
        let mut formats = Vec::new();
        #[cfg(feature = "toml-config")]
        formats.push(Self::Toml);
        #[cfg(feature = "yaml-config")]
        formats.push(Self::Yaml);
        formats
    }

    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::enabled()
            .into_iter()
            .find(|format| format.extensions().contains(&ext))
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    /// File names searched for, in order of preference.
    fn file_names(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["strand.toml", "config.toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["strand.yaml", "strand.yml", "config.yaml", "config.yml"],
        }
    }

    #[cfg_attr(
        not(any(feature = "toml-config", feature = "yaml-config")),
        allow(unused_variables)
    )]
    fn merge(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(providers::Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(providers::Yaml::file(path)),
        }
    }
}

/// Builds a [`StrandConfig`] from defaults, files and the environment.
///
/// The result is validated before [`load`](Self::load) returns it.
#[derive(Debug)]
pub struct ConfigLoader {
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    env: bool,
    file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader for the `STRAND_PROFILE` profile that reads the
    /// environment and searches the default locations.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            env: true,
            file: None,
        }
    }

    /// Selects the profile by name.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Searches `path` for configuration files.
    ///
    /// Once any search path is given, the default locations (current
    /// directory and user config directory) are no longer searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Searches the current directory.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Searches the user config directory, e.g. `~/.config/strand`.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("strand")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads `STRAND_*` environment variables (the default).
    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    /// Ignores the environment.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Layers `config` right above the built-in defaults.
    ///
    /// Files and environment variables still override it.
    pub fn merge(mut self, config: StrandConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Merges every source, then extracts and validates the result.
    pub fn load(self) -> ConfigResult<StrandConfig> {
        let profile = self.profile.clone();

        let config: StrandConfig = self
            .into_figment()?
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validate_config(&config)?;

        debug!(
            %profile,
            level = %config.logging.level,
            catalog_overrides = config.catalog.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn into_figment(self) -> ConfigResult<Figment> {
        let Self {
            overrides,
            profile,
            search_paths,
            env,
            file,
        } = self;

        let mut figment = Figment::from(Serialized::defaults(StrandConfig::default())).merge(overrides);

        figment = match file {
            Some(path) => merge_file(figment, &path)?,
            None => merge_searched(figment, &profile, &resolve_search_paths(search_paths)),
        };

        if env {
            trace!(prefix = ENV_PREFIX, "Reading environment overrides");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }
}

/// Merges one explicitly named file, picking the format from its extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let format = FileFormat::from_path(path).ok_or_else(|| {
        ConfigError::ParseError(format!(
            "{} has an unsupported extension or its format feature is disabled",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "Loading configuration file");
    Ok(format.merge(figment, path))
}

fn resolve_search_paths(explicit: Vec<PathBuf>) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit;
    }

    std::env::current_dir()
        .ok()
        .into_iter()
        .chain(dirs::config_dir().map(|dir| dir.join("strand")))
        .collect()
}

/// Merges, per enabled format, the first main file found in `search_paths`
/// together with its profile file, which sits below it.
fn merge_searched(mut figment: Figment, profile: &Profile, search_paths: &[PathBuf]) -> Figment {
    let mut found = false;

    for format in FileFormat::enabled() {
        let main = search_paths.iter().find_map(|dir| {
            format
                .file_names()
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.exists())
        });

        let Some(main) = main else {
            continue;
        };

        if let Some(profiled) = profile_file(&main, profile).filter(|path| path.exists()) {
            debug!(path = %profiled.display(), %profile, "Loading profile configuration file");
            figment = format.merge(figment, &profiled);
        }

        info!(path = %main.display(), "Loading configuration file");
        figment = format.merge(figment, &main);
        found = true;
    }

    if !found {
        warn!("No configuration file found, using defaults");
    }
    figment
}

/// `dir/strand.toml` → `dir/strand.<profile>.toml`.
fn profile_file(main: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = main.file_stem()?.to_str()?;
    let ext = main.extension()?.to_str()?;
    Some(main.with_file_name(format!("{stem}.{profile}.{ext}")))
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<StrandConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path`, with environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<StrandConfig> {
    ConfigLoader::new().file(path).load()
}
