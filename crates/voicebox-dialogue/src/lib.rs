//! Conversational core of the Voicebox bot.
//!
//! Tracks each user's position in the add, edit and delete dialogues,
//! recognizes slash commands and main-menu labels, and turns every inbound
//! message into at most one reply.

pub mod command;
pub mod dispatcher;
pub mod engine;
pub mod response;
pub mod store;
pub mod types;

pub use command::SlashCommand;
pub use dispatcher::Dispatcher;
pub use engine::{DialogueEngine, SelectionPurpose};
pub use store::StateStore;
pub use types::{
    ConversationState, Draft, InboundMessage, MenuAction, Phase, Reply, ReplyMarkup, Submission,
    MAIN_MENU,
};
