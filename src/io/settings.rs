//! Settings and scale overrides, stored in the OS config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimelineError};
use crate::model::{ScaleConfig, ScaleKey, ScaleRegistry};

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub active_scale: ScaleKey,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            active_scale: ScaleKey::Week,
        }
    }
}

/// Where settings and scale overrides live.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub settings: PathBuf,
    pub scales: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Self {
        match directories::ProjectDirs::from("", "", "GanttTimeline") {
            Some(proj_dirs) => Self::in_dir(proj_dirs.config_dir()),
            None => Self::in_dir(Path::new(".")),
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            settings: dir.join("settings.json"),
            scales: dir.join("scales.json"),
        }
    }
}

/// Load settings, falling back to defaults when missing or unreadable.
pub fn load_settings(path: &Path) -> AppSettings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppSettings::default(),
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable settings {:?}: {}", path, e);
        AppSettings::default()
    })
}

pub fn save_settings(settings: &AppSettings, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| TimelineError::io(dir, e))?;
    }
    std::fs::write(path, json).map_err(|e| TimelineError::io(path, e))
}

/// Built-in scales with any overrides from `path` applied.
///
/// A missing file just means no overrides. A file that doesn't parse, or
/// overrides that fail validation, are reported back alongside the registry.
pub fn load_scale_registry(path: &Path) -> (ScaleRegistry, Vec<TimelineError>) {
    let mut registry = ScaleRegistry::builtin();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (registry, Vec::new()),
        Err(e) => {
            log::warn!("Could not read scale overrides {:?}: {}", path, e);
            return (registry, vec![TimelineError::io(path, e)]);
        }
    };

    match serde_json::from_str::<BTreeMap<String, ScaleConfig>>(&contents) {
        Ok(overrides) => {
            let rejected = registry.apply_overrides(overrides);
            (registry, rejected)
        }
        Err(e) => {
            log::error!("Malformed scale overrides {:?}: {}", path, e);
            (registry, vec![e.into()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gantt-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn settings_default_when_missing_and_persist() {
        let dir = scratch_dir();
        let paths = ConfigPaths::in_dir(&dir);
        assert_eq!(load_settings(&paths.settings), AppSettings::default());

        let settings = AppSettings {
            active_scale: ScaleKey::Quarter,
        };
        save_settings(&settings, &paths.settings).unwrap();
        assert_eq!(load_settings(&paths.settings), settings);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_overrides_keep_builtins() {
        let dir = scratch_dir();
        let (registry, errors) = load_scale_registry(&ConfigPaths::in_dir(&dir).scales);
        assert!(errors.is_empty());
        assert_eq!(registry.get(ScaleKey::Day).unwrap().base_px_per_drag_step, 40.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn overrides_apply_and_bad_ones_are_reported() {
        let dir = scratch_dir();
        let paths = ConfigPaths::in_dir(&dir);
        std::fs::write(
            &paths.scales,
            r#"{
                "day": {
                    "tickUnit": "day", "unitPerTick": 1, "labelUnit": "week",
                    "basePxPerDragStep": 8.0, "dragStepUnit": "hour", "dragStepAmount": 1.0,
                    "labelFormat": "W%V %G", "tickFormat": "%a"
                },
                "month": {
                    "tickUnit": "month", "unitPerTick": 0, "labelUnit": "year",
                    "basePxPerDragStep": 4.0, "dragStepUnit": "day", "dragStepAmount": 1.0
                }
            }"#,
        )
        .unwrap();

        let (registry, errors) = load_scale_registry(&paths.scales);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TimelineError::InvalidScale { .. }));
        let day = registry.get(ScaleKey::Day).unwrap();
        assert_eq!(day.base_px_per_drag_step, 8.0);
        assert_eq!(registry.get(ScaleKey::Month).unwrap().unit_per_tick, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_overrides_file_is_reported() {
        let dir = scratch_dir();
        let paths = ConfigPaths::in_dir(&dir);
        std::fs::write(&paths.scales, "{ not json").unwrap();
        let (registry, errors) = load_scale_registry(&paths.scales);
        assert!(matches!(errors.as_slice(), [TimelineError::Json(_)]));
        assert!(registry.get(ScaleKey::Week).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
