//! Interactive prompts.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Errors raised while asking the user for input.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The user pressed Ctrl-C or closed the input.
    #[error("input cancelled")]
    Cancelled,

    /// The terminal could not be read.
    #[error("failed to read input: {0}")]
    Readline(#[source] ReadlineError),
}

impl From<ReadlineError> for PromptError {
    fn from(err: ReadlineError) -> Self {
        match err {
            ReadlineError::Interrupted | ReadlineError::Eof => Self::Cancelled,
            other => Self::Readline(other),
        }
    }
}

/// Source of answers to interactive questions.
pub trait Prompt {
    /// Asks a free-form question and returns the raw answer.
    fn ask(&mut self, question: &str) -> Result<String, PromptError>;

    /// Asks a yes/no question; an empty answer means yes.
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        let question = format!("{question} [Y/n] ");
        loop {
            match self.ask(&question)?.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => {}
            }
        }
    }
}

/// Line editor backed prompt, created on first use.
#[derive(Default)]
pub struct Terminal {
    editor: Option<DefaultEditor>,
}

impl Terminal {
    /// Creates a terminal prompt without touching the terminal yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> Result<&mut DefaultEditor, PromptError> {
        let editor = match self.editor.take() {
            Some(editor) => editor,
            None => DefaultEditor::new()?,
        };
        Ok(self.editor.insert(editor))
    }
}

impl Prompt for Terminal {
    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        Ok(self.editor()?.readline(question)?)
    }
}

/// Prompt replaying canned answers; runs out as a cancellation.
#[cfg(test)]
pub struct Scripted {
    answers: std::collections::VecDeque<String>,
    asked: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: 0,
        }
    }

    pub fn asked(&self) -> usize {
        self.asked
    }
}

#[cfg(test)]
impl Prompt for Scripted {
    fn ask(&mut self, _question: &str) -> Result<String, PromptError> {
        self.asked += 1;
        self.answers.pop_front().ok_or(PromptError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_accepts_default_and_yes() {
        assert!(Scripted::new([""]).confirm("Good to go?").unwrap());
        assert!(Scripted::new(["Y"]).confirm("Good to go?").unwrap());
        assert!(Scripted::new(["yes"]).confirm("Good to go?").unwrap());
    }

    #[test]
    fn confirm_reasks_until_clear_answer() {
        let mut prompt = Scripted::new(["maybe", "n"]);
        assert!(!prompt.confirm("Good to go?").unwrap());
        assert_eq!(prompt.asked(), 2);
    }

    #[test]
    fn readline_interrupt_is_cancellation() {
        assert!(matches!(
            PromptError::from(ReadlineError::Interrupted),
            PromptError::Cancelled
        ));
        assert!(matches!(
            PromptError::from(ReadlineError::Eof),
            PromptError::Cancelled
        ));
    }
}
