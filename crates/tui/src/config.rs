use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use folio_protocol::ThemeMode;
use serde::Deserialize;
use tracing::warn;

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG: &str = "folio.toml";
pub const DEFAULT_FPS: u32 = 60;
const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: ThemeMode,
    pub fps: u32,
    /// Portfolio JSON to show instead of the built-in content.
    pub content: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            fps: DEFAULT_FPS,
            content: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    theme: Option<ThemeMode>,
    fps: Option<u32>,
    content: Option<PathBuf>,
}

/// Defaults, then the config file, then `FOLIO_*` environment variables.
/// Command-line flags are applied on top by the caller.
///
/// An explicitly named config file must exist; the default one is optional.
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, raw) = match config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            (path, Some(raw))
        }
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            (path, fs::read_to_string(path).ok())
        }
    };
    if let Some(raw) = raw {
        settings
            .apply_file(&raw)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

impl Settings {
    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileConfig = toml::from_str(raw)?;
        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if let Some(fps) = file.fps {
            self.fps = fps;
        }
        if let Some(content) = file.content {
            self.content = Some(content);
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("FOLIO_THEME") {
            match ThemeMode::parse(&v) {
                Some(theme) => self.theme = theme,
                None => warn!(value = %v, "ignoring FOLIO_THEME"),
            }
        }
        if let Some(v) = var("FOLIO_FPS") {
            match v.trim().parse::<u32>() {
                Ok(fps) => self.fps = fps,
                Err(_) => warn!(value = %v, "ignoring FOLIO_FPS"),
            }
        }
        if let Some(v) = var("FOLIO_CONTENT") {
            self.content = Some(PathBuf::from(v));
        }
    }

    /// Time between frames at the configured rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.clamp(1, MAX_FPS)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn file_overrides_defaults() {
        let mut settings = Settings::default();
        settings
            .apply_file("theme = \"light\"\nfps = 30\ncontent = \"me.json\"\n")
            .unwrap();
        assert_eq!(
            settings,
            Settings {
                theme: ThemeMode::Light,
                fps: 30,
                content: Some(PathBuf::from("me.json")),
            }
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut settings = Settings::default();
        settings.apply_file("fps = 24").unwrap();
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.fps, 24);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut settings = Settings::default();
        assert!(settings.apply_file("colour = \"red\"").is_err());
        assert!(settings.apply_file("theme = \"sepia\"").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut settings = Settings::default();
        settings.apply_file("theme = \"light\"\nfps = 30").unwrap();
        settings.apply_env(env(&[("FOLIO_THEME", "Dark"), ("FOLIO_FPS", "120")]));
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.fps, 120);
    }

    #[test]
    fn malformed_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[("FOLIO_THEME", "sepia"), ("FOLIO_FPS", "fast")]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn frame_interval_is_clamped() {
        let mut settings = Settings::default();
        settings.fps = 0;
        assert_eq!(settings.frame_interval(), Duration::from_secs(1));
        settings.fps = 50;
        assert_eq!(settings.frame_interval(), Duration::from_millis(20));
    }
}
