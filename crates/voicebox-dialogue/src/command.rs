//! Slash-command recognition.

/// Bot commands understood at any point of a dialogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashCommand {
    Start,
    Open,
    Close,
    Cancel,
    /// Any other `/word`; carries the command name without the slash.
    Unknown(String),
}

impl SlashCommand {
    /// Parse `/name`, `/name@bot_username` or `/name args`.
    ///
    /// Returns `None` for text that is not a command at all.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let word = rest.split(char::is_whitespace).next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("");
        if name.is_empty() {
            return None;
        }

        Some(match name {
            "start" => SlashCommand::Start,
            "open" => SlashCommand::Open,
            "close" => SlashCommand::Close,
            "cancel" => SlashCommand::Cancel,
            other => SlashCommand::Unknown(other.to_string()),
        })
    }

    /// Commands advertised in the client's command menu, with descriptions.
    pub fn descriptions() -> &'static [(&'static str, &'static str)] {
        &[
            ("start", "Start the bot"),
            ("open", "Open the keyboard"),
            ("close", "Close the keyboard"),
            ("cancel", "Cancel current action"),
        ]
    }
}
