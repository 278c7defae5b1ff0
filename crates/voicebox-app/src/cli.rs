//! CLI argument definitions for the Voicebox bot.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use voicebox_core::config::VoiceboxConfig;

/// Voicebox: a Telegram bot that collects, lists, edits and deletes voice notes.
#[derive(Parser, Debug)]
#[command(name = "voicebox", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory for the SQLite database and downloaded voices.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Telegram Bot API token.
    #[arg(short = 't', long = "token")]
    pub token: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VOICEBOX_CONFIG env var > ~/.voicebox/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VOICEBOX_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the bot token.
    ///
    /// Priority: --token flag > TELEGRAM_APITOKEN env var > config file value.
    pub fn resolve_token(&self, config_token: &str) -> String {
        pick(
            self.token.clone(),
            std::env::var("TELEGRAM_APITOKEN").ok(),
            config_token,
        )
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > VOICEBOX_DATA_DIR env var > config file value.
    pub fn resolve_data_dir(&self, config_data_dir: &str) -> String {
        pick(
            self.data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            std::env::var("VOICEBOX_DATA_DIR").ok(),
            config_data_dir,
        )
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Apply every override to a loaded configuration.
    pub fn apply(&self, config: &mut VoiceboxConfig) {
        config.telegram.token = self.resolve_token(&config.telegram.token);
        config.general.data_dir = self.resolve_data_dir(&config.general.data_dir);
        config.general.log_level = self.resolve_log_level(&config.general.log_level);
    }
}

/// First non-empty value of flag, environment, config.
fn pick(flag: Option<String>, env: Option<String>, config: &str) -> String {
    flag.into_iter()
        .chain(env)
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.to_string())
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".voicebox").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".voicebox").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse_from([
            "voicebox",
            "--config",
            "/etc/voicebox.toml",
            "-d",
            "/var/lib/voicebox",
            "--log-level",
            "debug",
            "--token",
            "123:abc",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/voicebox.toml")));
        assert_eq!(args.data_dir, Some(PathBuf::from("/var/lib/voicebox")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.token.as_deref(), Some("123:abc"));
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/voicebox.toml"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from(["voicebox", "-t", "flag-token", "-l", "warn"]);
        let mut config = VoiceboxConfig::default();
        config.telegram.token = "file-token".to_string();
        args.apply(&mut config);

        assert_eq!(config.telegram.token, "flag-token");
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["voicebox"]);
        assert_eq!(args.resolve_log_level("error"), "error");
    }

    #[test]
    fn test_pick_priority() {
        assert_eq!(
            pick(Some("flag".into()), Some("env".into()), "config"),
            "flag"
        );
        assert_eq!(pick(None, Some("env".into()), "config"), "env");
        assert_eq!(pick(None, None, "config"), "config");
        assert_eq!(pick(Some(" ".into()), Some(String::new()), "config"), "config");
    }
}
