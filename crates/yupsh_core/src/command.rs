use crate::{CommandResult, Io, StageContext};

/// A command is something that can be executed as a pipeline stage.
pub trait Command: Send + Sync {
    /// Returns the command's name.
    fn name(&self) -> &str;

    /// Checks the command's configuration without reading or writing anything.
    ///
    /// Pipelines validate every stage before starting any of them, so a
    /// configuration error never leaves partial output behind.
    fn validate(&self) -> CommandResult {
        Ok(())
    }

    /// Runs the command, reading from and writing to `io`.
    ///
    /// Implementations should check [`StageContext::checkpoint`] between
    /// records so that cancellation is observed promptly.
    fn run(&self, context: StageContext<'_>, io: &mut Io) -> CommandResult;
}
