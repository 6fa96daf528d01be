use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::events::{DisplayGeometry, Geometry, KeyChord, WindowId};
use crate::mappings::{KeyNameToKeysym, ModifierMask};
use crate::services::key_bindings::BindingPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub script: ScriptConfig,
    pub launcher: LauncherConfig,
    pub display: DisplayConfig,
    pub events: EventsConfig,
    pub dry_run: DryRunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub init_file: Option<PathBuf>,
    pub binding_policy: BindingPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub reap_children: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
    pub root_window: WindowId,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub trace: bool,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DryRunConfig {
    pub clients: Vec<DryRunClient>,
    pub key_events: Vec<KeyPressConfig>,
    pub key_event_interval_ms: u64,
    pub failing_tree_queries: Vec<WindowId>,
}

/// Клиент, которого эмулирует dry-run ядро
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DryRunClient {
    pub window: WindowId,
    #[serde(default)]
    pub x: i16,
    #[serde(default)]
    pub y: i16,
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub border_width: u16,
}

impl DryRunClient {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }
}

/// Нажатие клавиши, которое dry-run диспетчер передаёт в таблицу привязок
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyPressConfig {
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl KeyPressConfig {
    pub fn to_chord(&self) -> Result<KeyChord> {
        let keysym = KeyNameToKeysym::translate(&self.key).map_err(anyhow::Error::msg)?;
        let mod_mask = ModifierMask::from_names(&self.modifiers).map_err(anyhow::Error::msg)?;
        Ok(KeyChord::new(mod_mask, keysym))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            init_file: None,
            binding_policy: BindingPolicy::Replace,
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self { reap_children: true }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            root_window: 1,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            trace: false,
            poll_interval_ms: 100,
        }
    }
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            clients: Vec::new(),
            key_events: Vec::new(),
            key_event_interval_ms: 5000,
            failing_tree_queries: Vec::new(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("NWM_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn display_geometry(&self) -> DisplayGeometry {
        DisplayGeometry {
            width: self.display.width,
            height: self.display.height,
            root: self.display.root_window,
        }
    }

    /// Комбинации клавиш dry-run диспетчера в порядке воспроизведения
    pub fn dry_run_chords(&self) -> Result<Vec<KeyChord>> {
        self.dry_run
            .key_events
            .iter()
            .enumerate()
            .map(|(i, press)| {
                press
                    .to_chord()
                    .with_context(|| format!("Неверное нажатие #{} в dry_run.key_events", i + 1))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!(
                "Размер экрана должен быть больше нуля: {}x{}",
                self.display.width,
                self.display.height
            );
        }

        if self.events.poll_interval_ms < 10 {
            anyhow::bail!("poll_interval_ms должно быть минимум 10");
        }

        if !self.dry_run.key_events.is_empty() && self.dry_run.key_event_interval_ms == 0 {
            anyhow::bail!("key_event_interval_ms должно быть больше 0");
        }

        // Окна dry-run клиентов не должны повторяться
        let mut seen = std::collections::HashSet::new();
        for client in &self.dry_run.clients {
            if !seen.insert(client.window) {
                anyhow::bail!("Окно {} указано в dry_run.clients дважды", client.window);
            }
        }

        self.dry_run_chords()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.script.binding_policy, BindingPolicy::Replace);
        assert!(config.launcher.reap_children);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[script]
binding_policy = "accumulate"

[display]
width = 1280
height = 800

[[dry_run.clients]]
window = 10
x = -5
y = 20
width = 300
height = 200
border_width = 2

[[dry_run.key_events]]
key = "q"
modifiers = ["super", "shift"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.script.binding_policy, BindingPolicy::Accumulate);
        assert_eq!(config.display_geometry().width, 1280);
        assert_eq!(config.dry_run.clients[0].geometry(), Geometry::new(-5, 20, 300, 200));
        assert_eq!(config.dry_run.clients[0].border_width, 2);
        assert_eq!(config.dry_run_chords().unwrap(), vec![KeyChord::new(65, 0x71)]);
    }

    #[test]
    fn test_invalid_key_event_rejected() {
        let mut config = Config::default();
        config.dry_run.key_events = vec![KeyPressConfig {
            key: "q".to_string(),
            modifiers: vec!["hyper".to_string()],
        }];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_dry_run_window_rejected() {
        let mut config = Config::default();
        let client = DryRunClient {
            window: 3,
            x: 0,
            y: 0,
            width: 100,
            height: 100,
            border_width: 0,
        };
        config.dry_run.clients = vec![client.clone(), client];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "json".to_string();
        assert!(config.validate().is_err());
    }
}
