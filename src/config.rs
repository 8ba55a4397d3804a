use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) tick_ms: u64,
    pub(crate) status_window_ms: u64,
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) log_to_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            status_window_ms: 2000,
            fps_cap: 30,
            enable_color: true,
            log_to_file: false,
        }
    }
}

impl Settings {
    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub(crate) fn status_window(&self) -> Duration {
        Duration::from_millis(self.status_window_ms)
    }

    pub(crate) fn frame_time(&self) -> Duration {
        let fps = self.fps_cap.clamp(10, 240);
        Duration::from_secs_f32(1.0 / fps as f32)
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "cavapet", "Cavapet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data dir {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("cavapet.log"),
    })
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing is not atomic on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cavapet-test-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = scratch_dir("missing");
        assert_eq!(load_settings(&dir.join("nope.json")), Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = scratch_dir("partial");
        let path = dir.join("settings.json");
        fs::write(&path, r#"{ "tick_ms": 250 }"#).unwrap();
        let s = load_settings(&path);
        assert_eq!(s.tick_ms, 250);
        assert_eq!(s.status_window_ms, 2000);
        assert!(s.enable_color);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = scratch_dir("save");
        let path = dir.join("settings.json");
        let s = Settings {
            enable_color: false,
            fps_cap: 60,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn durations_are_sane() {
        let s = Settings {
            tick_ms: 0,
            fps_cap: 1000,
            ..Settings::default()
        };
        assert_eq!(s.tick_period(), Duration::from_millis(1));
        assert!(s.frame_time() >= Duration::from_secs_f32(1.0 / 240.0));
        assert_eq!(Settings::default().status_window(), Duration::from_secs(2));
    }
}
