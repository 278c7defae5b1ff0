use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Chat-platform identity of the person sending messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Chat the replies are sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Primary key of a persisted voice record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoiceId(pub i64);

/// Opaque handle to an uploaded audio file on the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceHandle(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl VoiceHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Voice records
// =============================================================================

/// A persisted voice recording and its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoiceRecord {
    pub id: VoiceId,
    pub name: String,
    pub description: String,
    /// Lowercase tags in the order the author entered them.
    pub tags: Vec<String>,
    /// Display name typed in by the submitter.
    pub author: String,
    pub author_id: UserId,
    /// Local path of the downloaded audio file.
    pub voice_path: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a new voice record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewVoice {
    pub voice_path: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub author_id: UserId,
}

/// Editable text columns of a voice record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceField {
    Name,
    Description,
}

impl VoiceField {
    /// Column name in the `voices` table.
    pub fn column(self) -> &'static str {
        match self {
            VoiceField::Name => "name",
            VoiceField::Description => "description",
        }
    }
}

impl fmt::Display for VoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Split a raw tag line into lowercase tags.
///
/// The line is lower-cased and split on `", "` exactly; other separators
/// (a bare comma, extra spaces) stay inside the tag text.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.to_lowercase().split(", ").map(str::to_string).collect()
}
