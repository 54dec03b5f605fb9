//! Responses handed back to the chat platform.

/// Generic failure shown for upstream and internal errors.
pub const GENERIC_FAILURE: &str = "Es gab einen Fehler bei der Verarbeitung des Befehls.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Rich message: title, optional description, fields, optional footer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    /// Plain-text rendering for front ends without rich messages.
    pub fn render_plain(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Embed(embed) => {
                let mut out = format!("== {} ==", embed.title);
                if let Some(description) = &embed.description {
                    out.push('\n');
                    out.push_str(description);
                }
                for field in &embed.fields {
                    out.push_str(&format!("\n  {}: {}", field.name, field.value));
                }
                if let Some(footer) = &embed.footer {
                    out.push_str(&format!("\n({})", footer));
                }
                out
            }
        }
    }
}

/// Result of one command, before it is turned into a message.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Success(Reply),
    /// Item or recipe not in the catalog; carries the guidance message.
    LookupMiss(Reply),
    /// Spreadsheet unreachable and nothing cached to answer from.
    UpstreamError(String),
    /// Anything else that went wrong while handling the command.
    InternalError(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }

    /// Message to send. Error details stay in the log; users get [`GENERIC_FAILURE`].
    pub fn into_reply(self) -> Reply {
        match self {
            CommandOutcome::Success(reply) | CommandOutcome::LookupMiss(reply) => reply,
            CommandOutcome::UpstreamError(_) | CommandOutcome::InternalError(_) => {
                Reply::text(GENERIC_FAILURE)
            }
        }
    }
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: name.to_string(),
        }
    }
}
