//! User-facing reply texts and record listings.

use std::fmt::Write as _;

use voicebox_core::types::VoiceRecord;

// ---- Add flow ----
pub const SEND_VOICE: &str = "Send a voice message:";
pub const ASK_NAME: &str = "Name:";
pub const ASK_DESCRIPTION: &str = "Description:";
pub const ASK_TAGS: &str = "Tags (comma-separated):";
pub const ASK_AUTHOR: &str = "Author:";
pub const VOICE_SAVED: &str = "Voice saved successfully!";
pub const DOWNLOAD_FAILED: &str = "Error downloading your voice file. Please try again.";
pub const SAVE_FAILED: &str = "Error saving your data. Please try again.";

// ---- Selection ----
pub const ENTER_VALID_NUMBER: &str = "Please enter a valid number.";
pub const INVALID_NUMBER: &str = "Invalid number. Try again.";
pub const RETRIEVE_FAILED: &str = "Error retrieving your recordings.";
pub const NO_RECORDINGS: &str = "You have no recordings.";
pub const NO_RECORDINGS_TO_EDIT: &str = "You have no recordings to edit.";
pub const NO_RECORDINGS_TO_DELETE: &str = "You have no recordings to delete.";

// ---- Edit flow ----
pub const CHOOSE_FIELD: &str = "Please select what you want to change (name/description).";
pub const ASK_NEW_NAME: &str = "Enter a new name:";
pub const ASK_NEW_DESCRIPTION: &str = "Enter a new description:";
pub const NAME_UPDATED: &str = "Name updated successfully!";
pub const DESCRIPTION_UPDATED: &str = "Description updated successfully!";
pub const UPDATE_FAILED: &str = "Error updating your recording. Please try again.";

// ---- Delete flow ----
pub const DELETED: &str = "Deletion successful";
pub const DELETE_CANCELLED: &str = "Cancelled";
pub const DELETE_FAILED: &str = "Error deleting your recording. Please try again.";

// ---- Commands ----
pub const KEYBOARD_OPEN: &str = "Keyboard is open";
pub const KEYBOARD_CLOSED: &str = "Keyboard is closed";
pub const ACTION_CANCELLED: &str = "Action cancelled";
pub const UNKNOWN_COMMAND: &str = "I don't know that command";
pub const UNKNOWN_STATE: &str = "Unknown command or state.";

/// Numbered listing followed by a selection prompt.
///
/// `verb` completes "Enter the number of the recording you want to ...".
pub fn numbered_listing(records: &[VoiceRecord], verb: &str) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Name: {}\nDescription: {}",
            i + 1,
            record.name,
            record.description
        );
    }
    let _ = write!(
        out,
        "\nEnter the number of the recording you want to {}:",
        verb
    );
    out
}

/// Plain listing used by the List menu entry.
pub fn plain_listing(records: &[VoiceRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = write!(
            out,
            "Name: {}\nDescription: {}\n\n",
            record.name, record.description
        );
    }
    out
}

pub fn editing_prompt(record: &VoiceRecord) -> String {
    format!(
        "You are editing the recording: {}. What would you like to change? (name/description)",
        record.name
    )
}

pub fn deleting_prompt(record: &VoiceRecord) -> String {
    format!(
        "You are deleting the recording: {}. Do you want to continue? Yes/No",
        record.name
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use voicebox_core::types::{UserId, VoiceId};

    use super::*;

    fn record(id: i64, name: &str, description: &str) -> VoiceRecord {
        VoiceRecord {
            id: VoiceId(id),
            name: name.to_string(),
            description: description.to_string(),
            tags: vec![],
            author: "Alice".to_string(),
            author_id: UserId(1),
            voice_path: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_numbered_listing() {
        let records = vec![record(10, "Rex", "A loud dog"), record(11, "Tom", "A cat")];
        assert_eq!(
            numbered_listing(&records, "edit"),
            "1. Name: Rex\nDescription: A loud dog\n\
             2. Name: Tom\nDescription: A cat\n\
             \nEnter the number of the recording you want to edit:"
        );
    }

    #[test]
    fn test_plain_listing() {
        let records = vec![record(1, "Rex", "A loud dog")];
        assert_eq!(plain_listing(&records), "Name: Rex\nDescription: A loud dog\n\n");
    }

    #[test]
    fn test_prompts_name_the_record() {
        let rex = record(1, "Rex", "A loud dog");
        assert!(editing_prompt(&rex).contains("Rex"));
        assert!(deleting_prompt(&rex).ends_with("Yes/No"));
    }
}
