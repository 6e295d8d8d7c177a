pub mod create_quiz;
pub mod dashboard;
pub mod login;
pub mod quiz;
pub mod score;

use crate::error::Result;
use std::io::{self, ErrorKind};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};

/// Line-oriented terminal shared by all views. Reads never block the
/// runtime, which is what lets the quiz view keep its countdown ticking
/// while waiting for input. Generic over its streams so views can be
/// driven from scripted input in tests.
pub struct Terminal<R = BufReader<Stdin>, W = Stdout> {
    input: Lines<R>,
    output: W,
}

impl Terminal {
    pub fn new() -> Self {
        Self::with_streams(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn with_streams(input: R, output: W) -> Self {
        Self {
            input: input.lines(),
            output,
        }
    }

    pub async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Next input line, trimmed. EOF is an error: the interactive client
    /// has nothing left to do without a user.
    pub async fn read_line(&mut self) -> Result<String> {
        match self.input.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(io::Error::new(ErrorKind::UnexpectedEof, "stdin closed").into()),
        }
    }

    pub async fn prompt(&mut self, label: &str) -> Result<String> {
        self.write(label).await?;
        self.read_line().await
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-field messages from a failed form validation, for inline display.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .collect();
    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::quiz_dto::CreateQuizPayload;
    use validator::Validate;

    #[test]
    fn collects_form_messages() {
        let payload = CreateQuizPayload {
            title: String::new(),
            total_questions: 0,
            total_score: 5,
            duration: 10,
        };
        let errors = payload.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert!(messages.contains(&"Title is required".to_string()));
        assert!(messages.contains(&"Must have at least 1 question".to_string()));
        assert_eq!(messages.len(), 2);
    }
}
