//! Line-oriented front end on stdin/stdout.
//!
//! Stands in for a chat platform: every input line is parsed as a slash
//! command, handled by the [`CommandProcessor`], and the rendered reply is
//! written back. `/quit` or end of input stops the loop.
use anyhow::Result;
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::commands::{CommandProcessor, HELP_TEXT};
use super::parser::{CommandParser, ParsedCommand};
use crate::logutil::escape_log;
use crate::sheets::SheetSource;

pub struct ConsoleFrontend<S: SheetSource> {
    processor: CommandProcessor<S>,
    parser: CommandParser,
    author: String,
}

impl<S: SheetSource> ConsoleFrontend<S> {
    pub fn new(processor: CommandProcessor<S>, author: impl Into<String>) -> Self {
        Self {
            processor,
            parser: CommandParser::new(),
            author: author.into(),
        }
    }

    /// Handle one input line and return the text to print, or `None` for blank input.
    pub async fn respond(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        debug!("Input from {}: {}", self.author, escape_log(line));
        let text = match self.parser.parse(line) {
            ParsedCommand::Command(command) => {
                self.processor.handle(command, &self.author).await.into_reply().render_plain()
            }
            ParsedCommand::Autocomplete(partial) => {
                let choices = self.processor.autocomplete(&partial).await;
                if choices.is_empty() {
                    "Keine Treffer".to_string()
                } else {
                    choices
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            ParsedCommand::Invalid(reason) => format!("Ungültige Eingabe: {}", reason),
            ParsedCommand::Unknown => format!("Unbekannter Befehl.\n{}", HELP_TEXT),
        };
        Some(text)
    }

    /// Read commands until `/quit` or end of input.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Console front end ready, author '{}'", self.author);
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().eq_ignore_ascii_case("/quit") {
                break;
            }
            if let Some(text) = self.respond(&line).await {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }
        info!("Console front end stopped");
        Ok(())
    }
}
