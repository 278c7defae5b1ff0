//! Telegram transport: long polling, message conversion and reply keyboards.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, KeyboardButton, KeyboardMarkup, KeyboardRemove, Update};
use tracing::{debug, info, warn};

use voicebox_core::types::{ChatId as VoiceChatId, UserId, VoiceHandle};
use voicebox_dialogue::{
    Dispatcher as DialogueDispatcher, InboundMessage, Reply, ReplyMarkup, SlashCommand, MAIN_MENU,
};

/// Build an [`InboundMessage`] from the raw fields of a Telegram message.
///
/// Messages without a sender (channel posts) are dropped.
pub fn inbound_from_parts(
    sender: Option<u64>,
    chat: i64,
    text: Option<&str>,
    voice_file_id: Option<&str>,
) -> Option<InboundMessage> {
    let user_id = UserId(i64::try_from(sender?).ok()?);
    Some(InboundMessage {
        user_id,
        chat_id: VoiceChatId(chat),
        text: text.map(str::to_string),
        voice: voice_file_id.map(|id| VoiceHandle(id.to_string())),
    })
}

pub fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    inbound_from_parts(
        msg.from.as_ref().map(|u| u.id.0),
        msg.chat.id.0,
        msg.text(),
        msg.voice().map(|v| v.file.id.0.as_str()),
    )
}

/// The Add/Edit/Delete/List reply keyboard.
pub fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(
        MAIN_MENU
            .iter()
            .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>()),
    )
}

fn keyboard_for(markup: ReplyMarkup) -> Option<teloxide::types::ReplyMarkup> {
    match markup {
        ReplyMarkup::Keep => None,
        ReplyMarkup::MainMenu => Some(teloxide::types::ReplyMarkup::Keyboard(main_menu_keyboard())),
        ReplyMarkup::RemoveKeyboard => Some(teloxide::types::ReplyMarkup::KeyboardRemove(
            KeyboardRemove::new(),
        )),
    }
}

/// Bot command menu shown by Telegram clients.
pub fn bot_commands() -> Vec<BotCommand> {
    SlashCommand::descriptions()
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect()
}

async fn send_reply(bot: &Bot, chat: ChatId, reply: Reply) -> ResponseResult<()> {
    let request = bot.send_message(chat, reply.text);
    match keyboard_for(reply.markup) {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<DialogueDispatcher>,
) -> ResponseResult<()> {
    let Some(inbound) = to_inbound(&msg) else {
        debug!(chat_id = msg.chat.id.0, "Message without sender ignored");
        return Ok(());
    };

    debug!(
        user_id = %inbound.user_id,
        chat_id = %inbound.chat_id,
        has_text = inbound.text.is_some(),
        has_voice = inbound.voice.is_some(),
        "Message received"
    );

    if let Some(reply) = dispatcher.dispatch(&inbound).await {
        send_reply(&bot, msg.chat.id, reply).await?;
    }
    Ok(())
}

/// Verify the token, optionally publish the command list, then poll for
/// updates until Ctrl-C.
pub async fn run(
    bot: Bot,
    dispatcher: Arc<DialogueDispatcher>,
    register_commands: bool,
) -> Result<(), teloxide::RequestError> {
    let me = bot.get_me().await?;
    info!(username = %me.username(), "Connected to Telegram");

    if register_commands {
        match bot.set_my_commands(bot_commands()).await {
            Ok(_) => info!("Bot commands registered"),
            Err(e) => warn!(error = %e, "Failed to register bot commands"),
        }
    }

    let handler = Update::filter_message().endpoint(handle_message);

    info!("Starting dispatcher with long polling");
    teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
