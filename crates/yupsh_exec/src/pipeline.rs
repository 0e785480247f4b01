use std::{
    io::{self, Read, Write},
    thread,
};

use parking_lot::Mutex;
use yupsh_core::{
    Command as _, CommandError, CommandResult, ExecutionContext, Io, SharedWriter,
};

use crate::{Command, PipelineError};

/// An ordered sequence of commands, each reading the output of the previous.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    commands: Vec<Command>,
}

/// Constructs a pipeline of a single command.
pub fn exec<C: Into<Command>>(command: C) -> Pipeline {
    Pipeline::default().pipe(command)
}

/// Constructs a pipeline that connects the given commands in order.
pub fn pipe<I: IntoIterator<Item = Command>>(commands: I) -> Pipeline {
    Pipeline {
        commands: commands.into_iter().collect(),
    }
}

impl Pipeline {
    /// Appends a command that reads the output of the current last stage.
    pub fn pipe<C: Into<Command>>(mut self, command: C) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs every stage to completion and returns the terminal result.
    ///
    /// The first stage reads `input` and the last stage writes `output`.
    /// Stages in between are connected by pipes, and all stages share
    /// `diagnostics`. Stages run concurrently, one thread each, except for
    /// a single-stage pipeline which runs on the calling thread.
    ///
    /// Every stage's configuration is validated first. An invalid stage fails
    /// the pipeline before any stage runs.
    ///
    /// The first stage to fail fatally cancels `context`, and its error is
    /// returned. Fatal errors of other stages that are not caused by the
    /// cancellation are written to `diagnostics`. Without a fatal error, the
    /// first non-fatal stage error is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(stages = self.commands.len()))]
    pub fn execute(
        self,
        context: &ExecutionContext,
        input: Box<dyn Read + Send>,
        output: Box<dyn Write + Send>,
        diagnostics: Box<dyn Write + Send>,
    ) -> Result<(), PipelineError> {
        if self.commands.is_empty() {
            return Ok(());
        }

        for (index, command) in self.commands.iter().enumerate() {
            command.validate().map_err(|source| PipelineError::Stage {
                index,
                name: command.name().to_owned(),
                source,
            })?;
        }

        let diagnostics = SharedWriter::new(diagnostics);
        let ios = connect(self.commands.len(), input, output, &diagnostics)?;
        let first_failure = Mutex::new(None);

        let results: Vec<CommandResult> = match self.commands.as_slice() {
            [command] => ios
                .into_iter()
                .map(|io| run_stage(context, 0, command, io, &first_failure))
                .collect(),
            commands => thread::scope(|scope| {
                let first_failure = &first_failure;
                let handles: Vec<_> = commands
                    .iter()
                    .zip(ios)
                    .enumerate()
                    .map(|(index, (command, io))| {
                        scope.spawn(move || run_stage(context, index, command, io, first_failure))
                    })
                    .collect();

                handles
                    .into_iter()
                    .zip(commands)
                    .map(|(handle, command)| {
                        handle.join().unwrap_or_else(|_| {
                            context.cancel();
                            Err(CommandError::Io(io::Error::new(
                                io::ErrorKind::Other,
                                format!("{} panicked", command.name()),
                            )))
                        })
                    })
                    .collect()
            }),
        };

        terminal_result(
            &self.commands,
            results,
            first_failure.into_inner(),
            diagnostics,
        )
    }
}

/// Returns the streams of each stage, connecting consecutive stages by pipes.
fn connect(
    stages: usize,
    input: Box<dyn Read + Send>,
    output: Box<dyn Write + Send>,
    diagnostics: &SharedWriter,
) -> Result<Vec<Io>, PipelineError> {
    let mut readers: Vec<Box<dyn Read + Send>> = vec![input];
    let mut writers: Vec<Box<dyn Write + Send>> = Vec::with_capacity(stages);
    for stage in 1..stages {
        let (reader, writer) = os_pipe::pipe().map_err(PipelineError::CreatePipeFailed)?;
        tracing::trace!(from = stage - 1, to = stage, "created pipe");
        writers.push(Box::new(writer));
        readers.push(Box::new(reader));
    }
    writers.push(output);

    Ok(readers
        .into_iter()
        .zip(writers)
        .map(|(stdin, stdout)| Io::new(stdin, stdout, Box::new(diagnostics.clone())))
        .collect())
}

/// Runs a single stage and releases its streams.
///
/// A fatal failure cancels the run before the stage's streams are closed, so
/// that neighbouring stages observe the cancellation rather than a regular
/// end of input.
fn run_stage(
    context: &ExecutionContext,
    index: usize,
    command: &Command,
    mut io: Io,
    first_failure: &Mutex<Option<usize>>,
) -> CommandResult {
    tracing::debug!(stage = index, command = command.name(), "starting stage");
    let result = match command.run(context.stage(index), &mut io) {
        Err(error) if error.is_broken_pipe() => match context.is_cancelled() {
            true => Err(CommandError::Cancelled),
            false => {
                tracing::debug!(stage = index, "output closed, stopping stage");
                Ok(())
            }
        },
        result => result,
    };

    if let Err(error) = &result {
        if error.is_fatal() && !error.is_cancelled() {
            first_failure.lock().get_or_insert(index);
            context.cancel();
        }
    }
    drop(io);

    tracing::debug!(stage = index, ok = result.is_ok(), "finished stage");
    result
}

/// Reduces the results of all stages to the pipeline's result.
fn terminal_result(
    commands: &[Command],
    results: Vec<CommandResult>,
    first_failure: Option<usize>,
    mut diagnostics: SharedWriter,
) -> Result<(), PipelineError> {
    let mut errors: Vec<(usize, CommandError)> = results
        .into_iter()
        .enumerate()
        .filter_map(|(index, result)| result.err().map(|error| (index, error)))
        .collect();

    let position = first_failure
        .and_then(|failed| errors.iter().position(|(index, _)| *index == failed))
        .or_else(|| errors.iter().position(|(_, error)| error.is_cancelled()))
        .or_else(|| errors.iter().position(|(_, error)| !error.is_fatal()));

    let Some(position) = position else {
        return Ok(());
    };
    let (index, source) = errors.remove(position);

    for (other, error) in &errors {
        if error.is_fatal() && !error.is_cancelled() {
            let name = commands[*other].name();
            let line = format!("{name}: {error}\n");
            if let Err(write_error) = diagnostics.write_all(line.as_bytes()) {
                tracing::warn!(%write_error, "failed to report stage error");
            }
        }
    }

    Err(PipelineError::Stage {
        index,
        name: commands[index].name().to_owned(),
        source,
    })
}
