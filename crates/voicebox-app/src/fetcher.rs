//! Downloads voice notes from the Telegram Bot API to local disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{debug, warn};

use voicebox_core::error::{Result, VoiceboxError};
use voicebox_core::ports::MediaFetcher;
use voicebox_core::types::VoiceHandle;

/// [`MediaFetcher`] writing each voice note to `<dir>/<file_id>.<extension>`.
pub struct TelegramFetcher {
    bot: Bot,
    dir: PathBuf,
    extension: String,
}

impl TelegramFetcher {
    pub fn new(bot: Bot, dir: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            bot,
            dir,
            extension: extension.into(),
        }
    }
}

/// Local destination of a voice note.
pub fn voice_file_path(dir: &Path, handle: &VoiceHandle, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", handle, extension))
}

/// Create the voices directory if needed and open the destination file.
async fn open_destination(path: &Path) -> Result<tokio::fs::File> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(tokio::fs::File::create(path).await?)
}

#[async_trait]
impl MediaFetcher for TelegramFetcher {
    async fn download(&self, handle: &VoiceHandle) -> Result<PathBuf> {
        let file = self
            .bot
            .get_file(FileId(handle.0.clone()))
            .await
            .map_err(|e| VoiceboxError::Download(format!("get_file failed: {}", e)))?;

        let path = voice_file_path(&self.dir, handle, &self.extension);
        let mut dst = open_destination(&path).await?;

        if let Err(e) = self.bot.download_file(&file.path, &mut dst).await {
            drop(dst);
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %rm, "Failed to remove partial download");
            }
            return Err(VoiceboxError::Download(e.to_string()));
        }

        debug!(handle = %handle, path = %path.display(), "Voice downloaded");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_file_path() {
        let path = voice_file_path(
            Path::new("/data/voices"),
            &VoiceHandle("AwACAgIAAxkB".to_string()),
            "ogg",
        );
        assert_eq!(path, PathBuf::from("/data/voices/AwACAgIAAxkB.ogg"));
    }

    #[tokio::test]
    async fn test_open_destination_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = voice_file_path(
            &tmp.path().join("nested").join("voices"),
            &VoiceHandle("F1".to_string()),
            "ogg",
        );

        open_destination(&path).await.unwrap();
        assert!(path.exists());
    }
}
