//! Persistent settings store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Settings, SettingsPatch, SettingsRecord, SettingsUpdate};
use crate::error::Result;

/// Owns the current [`Settings`] and the file they are persisted to.
///
/// Readers get an `Arc` snapshot. A snapshot never changes after it is
/// handed out; updates replace the store's `Arc` instead.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Arc<Settings>,
}

impl SettingsStore {
    /// Opens the store, loading `path` if it exists.
    ///
    /// An unreadable or malformed file is logged and replaced by defaults.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let current = Arc::new(load_or_default(&path));
        Self { path, current }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self) -> Arc<Settings> {
        Arc::clone(&self.current)
    }

    /// Merges `patch` over the current settings and persists the result.
    ///
    /// The write is attempted once. A failure is logged and the merged
    /// settings are still returned and kept in memory.
    pub fn set(&mut self, patch: &SettingsPatch) -> Arc<Settings> {
        let merged = self.current.merged(patch);
        if merged.enabled != self.current.enabled {
            info!("Translation {}", if merged.enabled { "enabled" } else { "disabled" });
        }

        if let Err(e) = save(&self.path, &merged) {
            warn!("Failed to save settings to {}: {}", self.path.display(), e);
        }

        self.current = Arc::new(merged);
        self.get()
    }

    /// Re-reads the settings file, replacing the in-memory settings.
    pub fn reload(&mut self) -> Arc<Settings> {
        info!("Reloading settings from {}", self.path.display());
        self.current = Arc::new(load_or_default(&self.path));
        self.get()
    }

    pub fn apply(&mut self, update: SettingsUpdate) -> Arc<Settings> {
        match update {
            SettingsUpdate::Patch(patch) => self.set(&patch),
            SettingsUpdate::Reload => self.reload(),
        }
    }
}

fn load_or_default(path: &Path) -> Settings {
    match load(path) {
        Ok(Some(settings)) => {
            debug!("Loaded settings from {}", path.display());
            settings
        }
        Ok(None) => {
            info!("No settings file at {}, using defaults", path.display());
            Settings::default()
        }
        Err(e) => {
            warn!("Failed to load settings from {}, using defaults: {}", path.display(), e);
            Settings::default()
        }
    }
}

fn load(path: &Path) -> Result<Option<Settings>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let record: SettingsRecord = serde_json::from_str(&contents)?;
    Ok(Some(Settings::from_record(&record)))
}

fn save(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&settings.to_record())?;
    fs::write(path, json)?;
    Ok(())
}
