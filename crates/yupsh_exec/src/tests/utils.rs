use std::{
    io::{self, Cursor, Write},
    sync::Arc,
};

use parking_lot::Mutex;
use yupsh_core::ExecutionContext;

use crate::{Pipeline, PipelineError};

/// In-memory stream that can be inspected after being handed to a pipeline.
#[derive(Clone, Default)]
pub(crate) struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Output of a pipeline run.
pub(crate) struct Run {
    pub result: Result<(), PipelineError>,
    pub stdout: String,
    pub stderr: String,
}

pub(crate) fn execute(pipeline: Pipeline, input: &str) -> Run {
    execute_with(pipeline, input, &ExecutionContext::new())
}

pub(crate) fn execute_seeded(pipeline: Pipeline, input: &str, seed: u64) -> Run {
    execute_with(pipeline, input, &ExecutionContext::new().with_seed(seed))
}

pub(crate) fn execute_with(pipeline: Pipeline, input: &str, context: &ExecutionContext) -> Run {
    let stdout = Buffer::default();
    let stderr = Buffer::default();
    let result = pipeline.execute(
        context,
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(stdout.clone()),
        Box::new(stderr.clone()),
    );
    Run {
        result,
        stdout: stdout.contents(),
        stderr: stderr.contents(),
    }
}

/// Returns the stage error of a failed run.
pub(crate) fn stage_error(run: &Run) -> (usize, &yupsh_core::CommandError) {
    match &run.result {
        Err(PipelineError::Stage { index, source, .. }) => (*index, source),
        other => panic!("expected a stage error, got {other:?}"),
    }
}
