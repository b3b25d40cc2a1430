//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use crate::error::{Result, TimelineError};
use crate::model::viewport::{ZoomLevels, DEFAULT_ZOOM_INDEX, DEFAULT_ZOOM_LEVELS};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Days-in-view magnitudes, strictly ascending.
    pub zoom_levels: Vec<u32>,
    /// Zoom level selected at startup.
    pub default_zoom_index: usize,
    /// JSON item store. `None` starts with sample data and no persistence.
    pub data_file: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            default_zoom_index: DEFAULT_ZOOM_INDEX,
            data_file: None,
            log_filter: "info".into(),
        }
    }
}

impl AppSettings {
    /// Check the settings and build the zoom level list they describe.
    pub fn validate(&self) -> Result<ZoomLevels> {
        let levels = ZoomLevels::new(self.zoom_levels.clone())?;
        if self.default_zoom_index >= levels.len() {
            return Err(TimelineError::InvalidSettings(format!(
                "default zoom index {} is out of range for {} levels",
                self.default_zoom_index,
                levels.len()
            )));
        }
        Ok(levels)
    }

    /// Default location of `settings.json`.
    pub fn default_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", "AgencyTimeline") {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from(".").join("settings.json"),
        }
    }

    /// Read and validate settings from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
        let settings: AppSettings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`AppSettings::load_from`], but falls back to defaults. A missing
    /// file is normal on first run; any other failure is handed back so the
    /// caller can report it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<TimelineError>) {
        match Self::load_from(path) {
            Ok(settings) => (settings, None),
            Err(TimelineError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                (Self::default(), None)
            }
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TimelineError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TimelineError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let levels = AppSettings::default().validate().unwrap();
        assert_eq!(levels.as_slice(), &DEFAULT_ZOOM_LEVELS);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "zoom_levels": [7, 31], "default_zoom_index": 1 }"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.zoom_levels, vec![7, 31]);
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.data_file, None);
    }

    #[test]
    fn out_of_range_zoom_index_is_rejected() {
        let settings = AppSettings {
            default_zoom_index: 7,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(TimelineError::InvalidSettings(_))
        ));
    }

    #[test]
    fn invalid_or_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let (settings, problem) = AppSettings::load_or_default(&missing);
        assert_eq!(settings, AppSettings::default());
        assert!(problem.is_none());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{ "zoom_levels": [30, 7] }"#).unwrap();
        let (settings, problem) = AppSettings::load_or_default(&bad);
        assert_eq!(settings, AppSettings::default());
        assert!(matches!(problem, Some(TimelineError::InvalidSettings(_))));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            data_file: Some(dir.path().join("items.json")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }
}
