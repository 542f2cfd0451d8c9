//! Configuration management.
//!
//! Settings come from an optional TOML file. Every key is optional; anything
//! left out keeps its default.
//!
//! ```toml
//! data_dir = "~/.local/share/promptmenu"
//! store_file = "menus.json"
//! export_dir = "~/Downloads"
//!
//! [import]
//! target_folder_name = "Imported"
//! create_new_folder = true
//! overwrite_existing = false
//!
//! [logging]
//! format = "json"
//! level = "info"
//! file = "/tmp/promptmenu.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::MergeOptions;
use crate::io::merge::DEFAULT_TARGET_FOLDER;
use crate::{Error, Result};

/// Environment variable naming a config file to load.
pub const CONFIG_PATH_ENV: &str = "PROMPTMENU_CONFIG_PATH";

/// Default store file name inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "menus.json";

/// Main configuration for promptmenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMenuConfig {
    /// Directory holding the menu store.
    pub data_dir: PathBuf,
    /// Store file, relative to `data_dir` unless absolute.
    pub store_file: PathBuf,
    /// Directory that exports are written to.
    pub export_dir: PathBuf,
    /// Import defaults.
    pub import: ImportSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Import defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSettings {
    /// Folder that receives imported menus.
    pub target_folder_name: String,
    /// Create the target folder when missing.
    pub create_new_folder: bool,
    /// Import menus whose title already exists in the target folder.
    pub overwrite_existing: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            target_folder_name: DEFAULT_TARGET_FOLDER.to_string(),
            create_new_folder: true,
            overwrite_existing: false,
        }
    }
}

impl ImportSettings {
    /// Builds merge options from these settings.
    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::new(self.target_folder_name.clone())
            .with_create_new_folder(self.create_new_folder)
            .with_overwrite_existing(self.overwrite_existing)
    }
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive such as `info` or `promptmenu=debug`.
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Store file name or path.
    pub store_file: Option<String>,
    /// Export directory.
    pub export_dir: Option<String>,
    /// Import section.
    pub import: Option<ConfigFileImport>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Import section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileImport {
    /// Target folder name.
    pub target_folder_name: Option<String>,
    /// Create missing target folder.
    pub create_new_folder: Option<bool>,
    /// Import duplicate titles.
    pub overwrite_existing: Option<bool>,
}

impl Default for PromptMenuConfig {
    fn default() -> Self {
        let base_dirs = directories::BaseDirs::new();
        let data_dir = base_dirs.as_ref().map_or_else(
            || PathBuf::from(".promptmenu"),
            |d| d.data_dir().join("promptmenu"),
        );
        let export_dir = directories::UserDirs::new()
            .and_then(|d| d.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            store_file: PathBuf::from(DEFAULT_STORE_FILE),
            export_dir,
            import: ImportSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PromptMenuConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/promptmenu/` on macOS)
    /// 2. XDG config dir (`~/.config/promptmenu/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("promptmenu").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("promptmenu")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        Self::default()
    }

    /// Resolves configuration: an explicit path, then [`CONFIG_PATH_ENV`],
    /// then the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Self::load_from_file(Path::new(&path));
            }
        }

        Ok(Self::load_default())
    }

    /// Returns the full path of the store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Sets the export directory.
    #[must_use]
    pub fn with_export_dir(mut self, export_dir: impl Into<PathBuf>) -> Self {
        self.export_dir = export_dir.into();
        self
    }

    /// Converts a `ConfigFile` to `PromptMenuConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = expand_home(&data_dir);
        }
        if let Some(store_file) = file.store_file {
            config.store_file = expand_home(&store_file);
        }
        if let Some(export_dir) = file.export_dir {
            config.export_dir = expand_home(&export_dir);
        }
        if let Some(import) = file.import {
            if let Some(name) = import.target_folder_name {
                config.import.target_folder_name = name;
            }
            if let Some(create) = import.create_new_folder {
                config.import.create_new_folder = create;
            }
            if let Some(overwrite) = import.overwrite_existing {
                config.import.overwrite_existing = overwrite;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
