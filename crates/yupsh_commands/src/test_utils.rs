use std::{
    fs::File,
    io::{Cursor, Read, Seek},
};

use tempfile::tempfile;
use yupsh_core::{Command, CommandResult, ExecutionContext, Io};

/// Constructs a new Io instance reading `input` and backed by temporary files.
pub(crate) fn mock_io(input: &str) -> (Io, File, File) {
    let stdout = tempfile().unwrap();
    let stderr = tempfile().unwrap();
    let io = Io::new(
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(stdout.try_clone().unwrap()),
        Box::new(stderr.try_clone().unwrap()),
    );
    (io, stdout, stderr)
}

/// Reads the entire contents of a file from start to end.
///
/// Note that this will change the current position in the file.
pub(crate) fn file_contents(file: &mut File) -> Vec<u8> {
    let mut contents = Vec::new();
    let _ = file.rewind();
    let _ = file.read_to_end(&mut contents);
    contents
}

/// Output of a single command run.
pub(crate) struct Output {
    pub result: CommandResult,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a command as the only stage of a seeded run.
pub(crate) fn run_seeded<C: Command>(command: &C, input: &str, seed: u64) -> Output {
    run_with(command, input, &ExecutionContext::new().with_seed(seed))
}

/// Runs a command as the only stage of a run.
pub(crate) fn run<C: Command>(command: &C, input: &str) -> Output {
    run_with(command, input, &ExecutionContext::new())
}

fn run_with<C: Command>(command: &C, input: &str, context: &ExecutionContext) -> Output {
    let (mut io, mut stdout, mut stderr) = mock_io(input);
    let result = command.run(context.stage(0), &mut io);
    drop(io);
    Output {
        result,
        stdout: String::from_utf8_lossy(&file_contents(&mut stdout)).into_owned(),
        stderr: String::from_utf8_lossy(&file_contents(&mut stderr)).into_owned(),
    }
}

/// Returns the lines of some output.
pub(crate) fn lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}
