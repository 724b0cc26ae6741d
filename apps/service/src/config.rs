use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uptime::notifier::webhook;
use uptime::{MonitoredTarget, ProbeConfig};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read config: {0}")]
    ReadFailed(#[source] io::Error),
    #[error("Failed to write config: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("No config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
    pub notifications: NotificationConfig,
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "uptime.db".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
    pub max_concurrent_checks: usize,
    /// Limit on notifying and regenerating the report within one cycle
    pub step_timeout_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_seconds: 60, max_concurrent_checks: 50, step_timeout_seconds: 30 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Log,
    Webhook,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Log => write!(f, "log"),
            Channel::Webhook => write!(f, "webhook"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub channel: Channel,
    pub webhook_url: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            webhook_url: None,
            timeout_seconds: webhook::DEFAULT_TIMEOUT_SECONDS,
            connect_timeout_seconds: webhook::DEFAULT_CONNECT_TIMEOUT_SECONDS,
        }
    }
}

/// One `[[targets]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub keyword: Option<String>,
    pub owner: String,
    /// Falls back to `[scheduler] interval_seconds`
    #[serde(default)]
    pub interval_seconds: Option<u64>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TargetConfig {
    pub fn to_target(&self) -> MonitoredTarget {
        MonitoredTarget {
            id: self.id.clone(),
            url: self.url.clone(),
            keyword: self.keyword.clone(),
            owner: self.owner.clone(),
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/uptime/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("uptime/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Configuration:")?;
        write_title_1(f, "Probe")?;
        write_1(f, "User Agent", &self.probe.user_agent)?;
        write_1(f, "Connect Timeout (s)", &self.probe.connect_timeout_seconds)?;
        write_1(f, "Read Timeout (s)", &self.probe.read_timeout_seconds)?;
        write_1(f, "Timeout (s)", &self.probe.timeout_seconds)?;
        write_title_1(f, "Database")?;
        write_1(f, "Path", &self.database.path)?;
        write_title_1(f, "Scheduler")?;
        write_1(f, "Interval (s)", &self.scheduler.interval_seconds)?;
        write_1(f, "Max Concurrent Checks", &self.scheduler.max_concurrent_checks)?;
        write_1(f, "Step Timeout (s)", &self.scheduler.step_timeout_seconds)?;
        write_title_1(f, "Notifications")?;
        write_1(f, "Channel", &self.notifications.channel)?;
        write_1(f, "Webhook URL", &self.notifications.webhook_url.as_deref().unwrap_or("-"))?;
        write_1(f, "Timeout (s)", &self.notifications.timeout_seconds)?;
        write_1(f, "Connect Timeout (s)", &self.notifications.connect_timeout_seconds)?;
        write_title_1(f, "Targets")?;
        for target in &self.targets {
            write_1(f, &target.id, &target.url)?;
            write_2(f, "Owner", &target.owner)?;
            write_2(f, "Keyword", &target.keyword.as_deref().unwrap_or("-"))?;
            write_2(f, "Enabled", &target.enabled)?;
        }

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/uptime/config.toml
    ///  or the specified path if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::ReadFailed)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(Error::WriteFailed)
    }

    /// Check interval for a target, falling back to the scheduler default
    pub fn interval_for(&self, target: &TargetConfig) -> u64 {
        target.interval_seconds.unwrap_or(self.scheduler.interval_seconds)
    }
}
