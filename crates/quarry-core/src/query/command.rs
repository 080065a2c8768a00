use crate::{
    args::{Arguments, Parameter},
    query::facet::Buffering,
};
use std::time::Duration;

///
/// CommandKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    StoredProcedure,
    Text,
}

impl CommandKind {
    /// Classify SQL text.
    ///
    /// Text without any whitespace once trimmed is taken to be a stored
    /// procedure name. This is a heuristic, not a parser: `"GetUser"` and
    /// `"dbo.GetUser"` are procedures, `"select 1"` is text.
    #[must_use]
    pub fn infer(sql: &str) -> Self {
        if sql.trim().contains(char::is_whitespace) {
            Self::Text
        } else {
            Self::StoredProcedure
        }
    }
}

///
/// Command
///
/// Fully resolved instruction handed to the executor.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub text: String,
    pub kind: CommandKind,
    pub arguments: Arguments,
    pub timeout: Option<Duration>,
    pub buffering: Buffering,
}

impl Command {
    /// Build a command, inferring its kind from the text.
    #[must_use]
    pub fn new(text: impl Into<String>, arguments: Arguments) -> Self {
        let text = text.into();

        Self {
            kind: CommandKind::infer(&text),
            text,
            arguments,
            timeout: None,
            buffering: Buffering::Buffered,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_buffering(mut self, buffering: Buffering) -> Self {
        self.buffering = buffering;
        self
    }

    /// Named parameters reflected from the argument record.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        self.arguments.parameters()
    }
}
