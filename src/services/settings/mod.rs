// Settings service
// Loads and saves the grid configuration as a TOML file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridConfig;

const CONFIG_FILE: &str = "schedule.toml";
const DATABASE_FILE: &str = "schedule.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "WeekScheduler", "WeekScheduler")
}

/// Where the todo database lives.
///
/// Debug builds keep it in the working directory.
pub fn default_database_path() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from(DATABASE_FILE);
    }
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(DATABASE_FILE),
        None => PathBuf::from(DATABASE_FILE),
    }
}

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the platform config directory, or the working directory when
    /// none is available.
    pub fn from_project_dirs() -> Self {
        match project_dirs() {
            Some(dirs) => Self::new(dirs.config_dir().join(CONFIG_FILE)),
            None => {
                log::warn!("No home directory found; using ./{}", CONFIG_FILE);
                Self::new(CONFIG_FILE)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the configuration. A missing file yields the defaults.
    pub fn load(&self) -> Result<GridConfig> {
        if !self.path.exists() {
            log::debug!("No config at {}; using defaults", self.path.display());
            return Ok(GridConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let config: GridConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        config
            .validate()
            .map_err(|e| anyhow!("Invalid grid configuration: {}", e))?;

        log::info!("Loaded grid configuration from {}", self.path.display());
        Ok(config)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, config: &GridConfig) -> Result<()> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid grid configuration: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(config).context("Failed to serialize grid configuration")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
