use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VoiceboxError};

/// Top-level configuration for the Voicebox bot.
///
/// Loaded from `~/.voicebox/config.toml` by default. Each section corresponds
/// to one collaborator of the dialogue core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceboxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl VoiceboxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoiceboxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check the settings the bot cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.trim().is_empty() {
            return Err(VoiceboxError::Config(
                "telegram token is required (set TELEGRAM_APITOKEN or [telegram].token)"
                    .to_string(),
            ));
        }
        if self.media.extension.is_empty() || self.media.extension.contains('.') {
            return Err(VoiceboxError::Config(format!(
                "invalid media extension: {:?}",
                self.media.extension
            )));
        }
        Ok(())
    }

    /// Data directory with a leading `~` expanded.
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.general.data_dir)
    }

    /// Absolute location of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        resolve_under(&self.data_dir(), &self.storage.database_file)
    }

    /// Directory downloaded voice files are written to.
    pub fn voices_dir(&self) -> PathBuf {
        resolve_under(&self.data_dir(), &self.media.voices_dir)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base directory for the database and downloaded voices.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.voicebox/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token. Usually supplied through `TELEGRAM_APITOKEN`.
    pub token: String,
    /// Publish the slash-command list to Telegram on startup.
    pub register_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            register_commands: true,
        }
    }
}

/// Relational storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file name, relative to the data directory unless absolute.
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "voicebox.db".to_string(),
        }
    }
}

/// Downloaded audio settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory for audio files, relative to the data directory unless absolute.
    pub voices_dir: String,
    /// File extension appended to the file handle, without the dot.
    pub extension: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            voices_dir: "voices".to_string(),
            extension: "ogg".to_string(),
        }
    }
}

/// Expand `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn resolve_under(base: &Path, path: &str) -> PathBuf {
    let path = expand_home(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = VoiceboxConfig::default();
        assert_eq!(config.general.data_dir, "~/.voicebox/data");
        assert_eq!(config.general.log_level, "info");
        assert!(config.telegram.token.is_empty());
        assert!(config.telegram.register_commands);
        assert_eq!(config.storage.database_file, "voicebox.db");
        assert_eq!(config.media.voices_dir, "voices");
        assert_eq!(config.media.extension, "ogg");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/srv/voicebox"
log_level = "debug"

[telegram]
token = "123:abc"
register_commands = false

[media]
voices_dir = "/var/voices"
"#;
        let file = create_temp_config(content);
        let config = VoiceboxConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/srv/voicebox");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.telegram.token, "123:abc");
        assert!(!config.telegram.register_commands);
        assert_eq!(config.media.voices_dir, "/var/voices");
        // Untouched sections keep their defaults.
        assert_eq!(config.storage.database_file, "voicebox.db");
        assert_eq!(config.media.extension, "ogg");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("[general\nlog_level = ");
        let err = VoiceboxConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, VoiceboxError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = VoiceboxConfig::load_or_default(Path::new("/nonexistent/voicebox.toml"));
        assert_eq!(config.general.data_dir, "~/.voicebox/data");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = VoiceboxConfig::default();
        config.telegram.token = "42:xyz".to_string();
        config.save(&path).unwrap();

        let reloaded = VoiceboxConfig::load(&path).unwrap();
        assert_eq!(reloaded.telegram.token, "42:xyz");
        assert_eq!(reloaded.media.extension, config.media.extension);
    }

    #[test]
    fn test_validate_requires_token() {
        let config = VoiceboxConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token"));

        let mut config = VoiceboxConfig::default();
        config.telegram.token = "123:abc".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = VoiceboxConfig::default();
        config.telegram.token = "123:abc".to_string();
        config.media.extension = ".ogg".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths_resolve_under_data_dir() {
        let mut config = VoiceboxConfig::default();
        config.general.data_dir = "/srv/voicebox".to_string();
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/voicebox/voicebox.db")
        );
        assert_eq!(config.voices_dir(), PathBuf::from("/srv/voicebox/voices"));

        config.media.voices_dir = "/mnt/audio".to_string();
        assert_eq!(config.voices_dir(), PathBuf::from("/mnt/audio"));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("data"), PathBuf::from("data"));
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
    }
}
