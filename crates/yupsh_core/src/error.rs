use std::{io, path::PathBuf};

use thiserror::Error;

use crate::status;

/// Specialized result type for commands.
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Errors returned by a command while it runs.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command's options are invalid or cannot be combined.
    ///
    /// Always detected before the command writes any output.
    #[error("{0}")]
    Configuration(String),

    /// A named input could not be opened or read.
    #[error("{}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The command processed all of its inputs, but some of them could not
    /// be read. Each failure has already been reported as a diagnostic.
    #[error("{failed} input(s) could not be read")]
    PartialInput { failed: usize },

    /// The command ran to completion and reports a negative result, such as
    /// input that is not in order when checking a sort.
    #[error("{0}")]
    Unsuccessful(String),

    /// Reading from, or writing to, a connected stream failed.
    #[error("input/output error: {0}")]
    Io(#[from] io::Error),

    /// The shared cancellation signal fired.
    #[error("cancelled")]
    Cancelled,
}

impl CommandError {
    /// Constructs a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Constructs an input error for a named path.
    pub fn input<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error should stop all other stages in a pipeline.
    ///
    /// Partial input failures and unsuccessful results only affect the
    /// terminal status.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CommandError::PartialInput { .. } | CommandError::Unsuccessful(_)
        )
    }

    /// Returns `true` if the command stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CommandError::Cancelled)
    }

    /// Returns `true` if the error is caused by a closed downstream reader.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            CommandError::Io(error) => error.kind() == io::ErrorKind::BrokenPipe,
            _ => false,
        }
    }

    /// Returns the exit code that represents this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Configuration(_) => status::USAGE_ERROR,
            CommandError::Cancelled => status::CANCELLED,
            _ => status::GENERAL_ERROR,
        }
    }
}
