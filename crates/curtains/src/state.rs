use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use personalization::ViewPersonalizationSettings;

/// JSON file holding the persisted [`ViewPersonalizationSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored settings, falling back to defaults when the file is
    /// missing, unreadable or malformed.
    pub fn load(&self) -> ViewPersonalizationSettings {
        self.load_or_keep(ViewPersonalizationSettings::default())
    }

    /// Like [`Self::load`], but keeps `current` instead of the defaults.
    pub fn load_or_keep(&self, current: ViewPersonalizationSettings) -> ViewPersonalizationSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored settings; using defaults");
                return current;
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read settings");
                return current;
            }
        };

        let (settings, error) = ViewPersonalizationSettings::decode_or_keep(current, &bytes);
        if let Some(err) = error {
            tracing::debug!(
                path = %self.path.display(),
                error = %err,
                "stored settings are malformed; keeping current values"
            );
        }
        settings
    }

    pub fn persist(&self, settings: &ViewPersonalizationSettings) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| {
                format!(
                    "failed to prepare directory for settings file at {}",
                    dir.display()
                )
            })?;
        }
        let serialized = settings
            .to_json_string_pretty()
            .context("failed to serialise settings to JSON")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }

    /// Modification time, used to notice edits made by other programs.
    pub fn modified(&self) -> Option<std::time::SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }
}
