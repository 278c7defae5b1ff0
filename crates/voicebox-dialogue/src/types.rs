//! Types shared by the state store, dialogue engine and dispatcher.

use voicebox_core::types::{ChatId, UserId, VoiceHandle, VoiceId};

// =============================================================================
// Conversation state
// =============================================================================

/// The step a user is at within a multi-message dialogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No conversation in progress.
    #[default]
    Idle,
    AwaitingVoice,
    AwaitingName,
    AwaitingDescription,
    AwaitingTags,
    AwaitingAuthor,
    AwaitingEditSelection,
    /// A record is selected; waiting for "name" or "description".
    EditingMenu,
    EditingName,
    EditingDescription,
    AwaitingDeleteSelection,
    ConfirmingDelete,
}

impl Phase {
    pub fn is_idle(self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingVoice => "awaiting_voice",
            Phase::AwaitingName => "awaiting_name",
            Phase::AwaitingDescription => "awaiting_description",
            Phase::AwaitingTags => "awaiting_tags",
            Phase::AwaitingAuthor => "awaiting_author",
            Phase::AwaitingEditSelection => "awaiting_edit_selection",
            Phase::EditingMenu => "editing_menu",
            Phase::EditingName => "editing_name",
            Phase::EditingDescription => "editing_description",
            Phase::AwaitingDeleteSelection => "awaiting_delete_selection",
            Phase::ConfirmingDelete => "confirming_delete",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata collected during the add-voice dialogue, not yet persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub voice: VoiceHandle,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub author_id: Option<UserId>,
}

impl Submission {
    pub fn new(voice: VoiceHandle) -> Self {
        Self {
            voice,
            name: String::new(),
            description: String::new(),
            tags: Vec::new(),
            author: String::new(),
            author_id: None,
        }
    }
}

/// Per-flow payload carried between dialogue steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Draft {
    #[default]
    Empty,
    /// Add flow: an uploaded audio file and its metadata so far.
    Submission(Submission),
    /// Edit and delete flows: the persisted record the user picked.
    Selected(VoiceId),
}

impl Draft {
    pub fn submission_mut(&mut self) -> Option<&mut Submission> {
        match self {
            Draft::Submission(submission) => Some(submission),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<VoiceId> {
        match self {
            Draft::Selected(id) => Some(*id),
            _ => None,
        }
    }
}

/// Everything the bot remembers about one user's conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub phase: Phase,
    pub draft: Draft,
}

// =============================================================================
// Messages
// =============================================================================

/// A transport-neutral incoming chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub text: Option<String>,
    /// Handle of an attached voice note, if any.
    pub voice: Option<VoiceHandle>,
}

impl InboundMessage {
    pub fn text(user_id: UserId, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            text: Some(text.into()),
            voice: None,
        }
    }

    pub fn voice(user_id: UserId, chat_id: ChatId, handle: VoiceHandle) -> Self {
        Self {
            user_id,
            chat_id,
            text: None,
            voice: Some(handle),
        }
    }
}

/// Keyboard change requested alongside a reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplyMarkup {
    /// Leave the client's keyboard as it is.
    #[default]
    Keep,
    /// Show the Add/Edit/Delete/List menu.
    MainMenu,
    /// Hide the reply keyboard.
    RemoveKeyboard,
}

/// One outbound message to the originating chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markup: ReplyMarkup,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Keep,
        }
    }

    pub fn with_markup(text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Self {
            text: text.into(),
            markup,
        }
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Labels of the reply keyboard, row by row.
pub const MAIN_MENU: [&[&str]; 2] = [&["Add", "Edit", "Delete"], &["List"]];

/// Top-level actions reachable from the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Edit,
    Delete,
    List,
}

impl MenuAction {
    /// Match a message against a menu label. Case-sensitive.
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            "Add" => Some(MenuAction::Add),
            "Edit" => Some(MenuAction::Edit),
            "Delete" => Some(MenuAction::Delete),
            "List" => Some(MenuAction::List),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle_and_empty() {
        let state = ConversationState::default();
        assert!(state.phase.is_idle());
        assert_eq!(state.draft, Draft::Empty);
    }

    #[test]
    fn test_draft_accessors() {
        let mut draft = Draft::Submission(Submission::new(VoiceHandle("f1".to_string())));
        assert!(draft.submission_mut().is_some());
        assert_eq!(draft.selected(), None);

        let mut draft = Draft::Selected(VoiceId(4));
        assert!(draft.submission_mut().is_none());
        assert_eq!(draft.selected(), Some(VoiceId(4)));
    }

    #[test]
    fn test_menu_labels_are_exact() {
        assert_eq!(MenuAction::from_label("Add"), Some(MenuAction::Add));
        assert_eq!(MenuAction::from_label("List"), Some(MenuAction::List));
        assert_eq!(MenuAction::from_label("add"), None);
        assert_eq!(MenuAction::from_label(" Edit"), None);
    }

    #[test]
    fn test_every_menu_label_parses() {
        for label in MAIN_MENU.iter().flat_map(|row| row.iter()) {
            assert!(MenuAction::from_label(label).is_some(), "{}", label);
        }
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::AwaitingEditSelection.to_string(), "awaiting_edit_selection");
        assert_eq!(Phase::Idle.to_string(), "idle");
    }
}
