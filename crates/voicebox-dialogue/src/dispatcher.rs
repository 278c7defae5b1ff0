//! Top-level routing of inbound messages.
//!
//! Order of precedence:
//! 1. Slash commands, in any phase.
//! 2. An active dialogue, which owns every non-command message.
//! 3. Main-menu labels while idle.
//!
//! Anything else is ignored.

use std::sync::Arc;

use tracing::{debug, info};

use voicebox_core::ports::{MediaFetcher, VoiceRepository};
use voicebox_core::types::UserId;

use crate::command::SlashCommand;
use crate::engine::{DialogueEngine, SelectionPurpose};
use crate::response;
use crate::store::StateStore;
use crate::types::{InboundMessage, MenuAction, Reply, ReplyMarkup};

/// Routes each message to a command handler, the dialogue engine or a
/// menu action. Produces at most one reply per message.
pub struct Dispatcher {
    store: Arc<StateStore>,
    engine: DialogueEngine,
}

impl Dispatcher {
    pub fn new(
        store: Arc<StateStore>,
        repository: Arc<dyn VoiceRepository>,
        fetcher: Arc<dyn MediaFetcher>,
    ) -> Self {
        let engine = DialogueEngine::new(Arc::clone(&store), repository, fetcher);
        Self { store, engine }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Handle one inbound message.
    pub async fn dispatch(&self, msg: &InboundMessage) -> Option<Reply> {
        let user = msg.user_id;

        if let Some(command) = msg.text.as_deref().and_then(SlashCommand::parse) {
            return Some(self.handle_command(user, command));
        }

        let phase = self.store.phase(user);
        if !phase.is_idle() {
            return self.engine.step(msg, phase).await;
        }

        let action = msg.text.as_deref().and_then(MenuAction::from_label)?;
        Some(self.handle_menu(user, action).await)
    }

    fn handle_command(&self, user: UserId, command: SlashCommand) -> Reply {
        debug!(user_id = %user, command = ?command, "Command received");
        match command {
            SlashCommand::Cancel => {
                self.store.reset(user);
                info!(user_id = %user, "Dialogue cancelled");
                Reply::text(response::ACTION_CANCELLED)
            }
            SlashCommand::Start | SlashCommand::Open => {
                Reply::with_markup(response::KEYBOARD_OPEN, ReplyMarkup::MainMenu)
            }
            SlashCommand::Close => {
                Reply::with_markup(response::KEYBOARD_CLOSED, ReplyMarkup::RemoveKeyboard)
            }
            SlashCommand::Unknown(_) => {
                Reply::with_markup(response::UNKNOWN_COMMAND, ReplyMarkup::MainMenu)
            }
        }
    }

    async fn handle_menu(&self, user: UserId, action: MenuAction) -> Reply {
        debug!(user_id = %user, action = ?action, "Menu action");
        match action {
            MenuAction::Add => self.engine.start_add(user),
            MenuAction::Edit => {
                self.engine
                    .start_selection(user, SelectionPurpose::Edit)
                    .await
            }
            MenuAction::Delete => {
                self.engine
                    .start_selection(user, SelectionPurpose::Delete)
                    .await
            }
            MenuAction::List => self.engine.list(user).await,
        }
    }
}
