use std::io;

use thiserror::Error;
use yupsh_core::{status, CommandError};

/// Terminal error of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage failed.
    #[error("{name}: {source}")]
    Stage {
        /// Zero-based position of the stage.
        index: usize,
        /// Name of the stage's command.
        name: String,
        #[source]
        source: CommandError,
    },

    #[error("failed to create pipe: {0}")]
    CreatePipeFailed(#[source] io::Error),
}

impl PipelineError {
    /// Returns the error of the failed stage, if a stage failed.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            PipelineError::Stage { source, .. } => Some(source),
            PipelineError::CreatePipeFailed(_) => None,
        }
    }

    /// Returns `true` if the run stopped early because it was cancelled
    /// externally.
    pub fn is_cancelled(&self) -> bool {
        self.command_error().map_or(false, CommandError::is_cancelled)
    }

    /// Returns `true` if the error has not been reported as a diagnostic by
    /// the failed stage itself.
    pub fn is_fatal(&self) -> bool {
        self.command_error().map_or(true, CommandError::is_fatal)
    }

    /// Returns the exit code that represents this error.
    pub fn exit_code(&self) -> i32 {
        self.command_error()
            .map_or(status::GENERAL_ERROR, CommandError::exit_code)
    }
}
