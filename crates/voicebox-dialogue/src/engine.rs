//! Dialogue engine: the per-user finite state machine.
//!
//! Each call handles one message for one user: it reads the draft from the
//! [`StateStore`], talks to the repository or media fetcher with the lock
//! released, then writes the next phase back.
//!
//! ```text
//! Add:    AwaitingVoice -> AwaitingName -> AwaitingDescription
//!         -> AwaitingTags -> AwaitingAuthor -> (persist) -> Idle
//! Edit:   AwaitingEditSelection -> EditingMenu
//!         -> EditingName | EditingDescription -> Idle
//! Delete: AwaitingDeleteSelection -> ConfirmingDelete -> Idle
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use voicebox_core::ports::{MediaFetcher, VoiceRepository};
use voicebox_core::types::{parse_tags, NewVoice, UserId, VoiceField, VoiceRecord};

use crate::response;
use crate::store::StateStore;
use crate::types::{Draft, InboundMessage, Phase, Reply, Submission};

/// Which flow a numeric selection belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPurpose {
    Edit,
    Delete,
}

impl SelectionPurpose {
    fn selection_phase(self) -> Phase {
        match self {
            SelectionPurpose::Edit => Phase::AwaitingEditSelection,
            SelectionPurpose::Delete => Phase::AwaitingDeleteSelection,
        }
    }

    fn next_phase(self) -> Phase {
        match self {
            SelectionPurpose::Edit => Phase::EditingMenu,
            SelectionPurpose::Delete => Phase::ConfirmingDelete,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            SelectionPurpose::Edit => "edit",
            SelectionPurpose::Delete => "delete",
        }
    }

    fn empty_reply(self) -> &'static str {
        match self {
            SelectionPurpose::Edit => response::NO_RECORDINGS_TO_EDIT,
            SelectionPurpose::Delete => response::NO_RECORDINGS_TO_DELETE,
        }
    }

    fn prompt(self, record: &VoiceRecord) -> String {
        match self {
            SelectionPurpose::Edit => response::editing_prompt(record),
            SelectionPurpose::Delete => response::deleting_prompt(record),
        }
    }
}

/// Parse a 1-based list position. Zero, negatives and non-numbers are rejected.
pub fn parse_selection(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|&index| index > 0)
}

/// Drives the add, edit and delete dialogues.
pub struct DialogueEngine {
    store: Arc<StateStore>,
    repository: Arc<dyn VoiceRepository>,
    fetcher: Arc<dyn MediaFetcher>,
}

impl DialogueEngine {
    pub fn new(
        store: Arc<StateStore>,
        repository: Arc<dyn VoiceRepository>,
        fetcher: Arc<dyn MediaFetcher>,
    ) -> Self {
        Self {
            store,
            repository,
            fetcher,
        }
    }

    // =========================================================================
    // Flow starters
    // =========================================================================

    /// Begin the add-voice dialogue.
    pub fn start_add(&self, user: UserId) -> Reply {
        self.store.update(user, |state| {
            state.phase = Phase::AwaitingVoice;
            state.draft = Draft::Empty;
        });
        info!(user_id = %user, "Add-voice dialogue started");
        Reply::text(response::SEND_VOICE)
    }

    /// Show the user's records and wait for a number to edit or delete.
    pub async fn start_selection(&self, user: UserId, purpose: SelectionPurpose) -> Reply {
        let records = match self.repository.list_by_author(user).await {
            Ok(records) => records,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to list voices");
                self.store.reset(user);
                return Reply::text(response::RETRIEVE_FAILED);
            }
        };

        if records.is_empty() {
            return Reply::text(purpose.empty_reply());
        }

        self.store.set_phase(user, purpose.selection_phase());
        Reply::text(response::numbered_listing(&records, purpose.verb()))
    }

    /// Render every record of the user. Leaves the state untouched.
    pub async fn list(&self, user: UserId) -> Reply {
        match self.repository.list_by_author(user).await {
            Ok(records) if records.is_empty() => Reply::text(response::NO_RECORDINGS),
            Ok(records) => Reply::text(response::plain_listing(&records)),
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to list voices");
                Reply::text(response::RETRIEVE_FAILED)
            }
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Advance the dialogue of `msg.user_id`, currently at `phase`.
    ///
    /// Returns `None` when the message is ignored (no voice attachment while
    /// waiting for one, or no text while waiting for text).
    pub async fn step(&self, msg: &InboundMessage, phase: Phase) -> Option<Reply> {
        let user = msg.user_id;
        debug!(user_id = %user, phase = %phase, "Dialogue step");

        if phase == Phase::AwaitingVoice {
            let handle = msg.voice.clone()?;
            self.store.update(user, |state| {
                state.draft = Draft::Submission(Submission::new(handle));
                state.phase = Phase::AwaitingName;
            });
            return Some(Reply::text(response::ASK_NAME));
        }

        let text = msg.text.as_deref()?;

        let reply = match phase {
            Phase::Idle | Phase::AwaitingVoice => Reply::text(response::UNKNOWN_STATE),
            Phase::AwaitingName => self.fill_submission(
                user,
                Phase::AwaitingDescription,
                response::ASK_DESCRIPTION,
                |s| s.name = text.to_string(),
            ),
            Phase::AwaitingDescription => self.fill_submission(
                user,
                Phase::AwaitingTags,
                response::ASK_TAGS,
                |s| s.description = text.to_string(),
            ),
            Phase::AwaitingTags => self.fill_submission(
                user,
                Phase::AwaitingAuthor,
                response::ASK_AUTHOR,
                |s| s.tags = parse_tags(text),
            ),
            Phase::AwaitingAuthor => self.finish_submission(user, text).await,
            Phase::AwaitingEditSelection => {
                self.select(user, text, SelectionPurpose::Edit).await
            }
            Phase::AwaitingDeleteSelection => {
                self.select(user, text, SelectionPurpose::Delete).await
            }
            Phase::EditingMenu => self.choose_field(user, text),
            Phase::EditingName => self.apply_edit(user, VoiceField::Name, text).await,
            Phase::EditingDescription => {
                self.apply_edit(user, VoiceField::Description, text).await
            }
            Phase::ConfirmingDelete => self.confirm_delete(user, text).await,
        };
        Some(reply)
    }

    /// Store one submission field and move to `next`.
    fn fill_submission<F>(&self, user: UserId, next: Phase, prompt: &str, fill: F) -> Reply
    where
        F: FnOnce(&mut Submission),
    {
        let filled = self.store.update(user, |state| match state.draft.submission_mut() {
            Some(submission) => {
                fill(submission);
                state.phase = next;
                true
            }
            None => false,
        });

        if filled {
            Reply::text(prompt)
        } else {
            warn!(user_id = %user, "No submission draft for add-voice step");
            Reply::text(response::UNKNOWN_STATE)
        }
    }

    /// Record the author, then download and persist the voice.
    async fn finish_submission(&self, user: UserId, author: &str) -> Reply {
        let submission = self.store.update(user, |state| {
            let submission = state.draft.submission_mut()?;
            submission.author = author.to_string();
            submission.author_id = Some(user);
            Some(submission.clone())
        });

        let Some(submission) = submission else {
            warn!(user_id = %user, "No submission draft for add-voice step");
            return Reply::text(response::UNKNOWN_STATE);
        };

        let reply = self.persist(user, submission).await;
        self.store.reset(user);
        reply
    }

    async fn persist(&self, user: UserId, submission: Submission) -> Reply {
        let path = match self.fetcher.download(&submission.voice).await {
            Ok(path) => path,
            Err(e) => {
                warn!(user_id = %user, handle = %submission.voice, error = %e, "Voice download failed");
                return Reply::text(response::DOWNLOAD_FAILED);
            }
        };

        let voice = NewVoice {
            voice_path: path.to_string_lossy().into_owned(),
            name: submission.name,
            description: submission.description,
            tags: submission.tags,
            author: submission.author,
            author_id: submission.author_id.unwrap_or(user),
        };

        match self.repository.insert(&voice).await {
            Ok(id) => {
                info!(user_id = %user, voice_id = %id, "Voice saved");
                Reply::text(response::VOICE_SAVED)
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to save voice");
                Reply::text(response::SAVE_FAILED)
            }
        }
    }

    /// Resolve a 1-based index against a fresh fetch and remember the record id.
    async fn select(&self, user: UserId, text: &str, purpose: SelectionPurpose) -> Reply {
        let Some(index) = parse_selection(text) else {
            return Reply::text(response::ENTER_VALID_NUMBER);
        };

        let records = match self.repository.list_by_author(user).await {
            Ok(records) => records,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to list voices");
                self.store.reset(user);
                return Reply::text(response::RETRIEVE_FAILED);
            }
        };

        let Some(record) = records.get(index - 1) else {
            return Reply::text(response::INVALID_NUMBER);
        };

        self.store.update(user, |state| {
            state.draft = Draft::Selected(record.id);
            state.phase = purpose.next_phase();
        });
        debug!(user_id = %user, voice_id = %record.id, "Record selected");
        Reply::text(purpose.prompt(record))
    }

    fn choose_field(&self, user: UserId, text: &str) -> Reply {
        let (next, prompt) = match text.to_lowercase().as_str() {
            "name" => (Phase::EditingName, response::ASK_NEW_NAME),
            "description" => (Phase::EditingDescription, response::ASK_NEW_DESCRIPTION),
            _ => return Reply::text(response::CHOOSE_FIELD),
        };
        self.store.set_phase(user, next);
        Reply::text(prompt)
    }

    async fn apply_edit(&self, user: UserId, field: VoiceField, value: &str) -> Reply {
        let Some(id) = self.store.state(user).draft.selected() else {
            warn!(user_id = %user, "No selected record for edit step");
            return Reply::text(response::UNKNOWN_STATE);
        };

        let reply = match self.repository.update_field(id, field, value).await {
            Ok(()) => {
                info!(user_id = %user, voice_id = %id, field = %field, "Voice updated");
                Reply::text(match field {
                    VoiceField::Name => response::NAME_UPDATED,
                    VoiceField::Description => response::DESCRIPTION_UPDATED,
                })
            }
            Err(e) => {
                warn!(user_id = %user, voice_id = %id, error = %e, "Failed to update voice");
                Reply::text(response::UPDATE_FAILED)
            }
        };
        self.store.reset(user);
        reply
    }

    async fn confirm_delete(&self, user: UserId, text: &str) -> Reply {
        let Some(id) = self.store.state(user).draft.selected() else {
            warn!(user_id = %user, "No selected record for delete step");
            return Reply::text(response::UNKNOWN_STATE);
        };

        let reply = if text == "Yes" {
            match self.repository.delete(id).await {
                Ok(()) => {
                    info!(user_id = %user, voice_id = %id, "Voice deleted");
                    Reply::text(response::DELETED)
                }
                Err(e) => {
                    warn!(user_id = %user, voice_id = %id, error = %e, "Failed to delete voice");
                    Reply::text(response::DELETE_FAILED)
                }
            }
        } else {
            Reply::text(response::DELETE_CANCELLED)
        };
        self.store.reset(user);
        reply
    }
}
