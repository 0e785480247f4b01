use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::PathBuf,
};

use crate::CommandError;

/// Argument naming the standard input stream.
const STDIN_ARG: &str = "-";

/// An input that a command reads records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The command's input stream.
    Stdin,
    /// A file path. Opened when the source is read.
    File(PathBuf),
}

impl Source {
    /// Returns the sources named by a command's positional arguments.
    ///
    /// Commands without arguments read their input stream, and `-` names the
    /// input stream explicitly.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Vec<Source> {
        if args.is_empty() {
            return vec![Source::Stdin];
        }

        args.iter()
            .map(|arg| match arg.as_ref() {
                STDIN_ARG => Source::Stdin,
                path => Source::File(PathBuf::from(path)),
            })
            .collect()
    }

    /// Returns a printable name for the source.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Source::Stdin => Cow::Borrowed(STDIN_ARG),
            Source::File(path) => path.to_string_lossy(),
        }
    }

    /// Opens the source for buffered reading.
    ///
    /// `stdin` is borrowed for [`Source::Stdin`] and left open afterwards.
    pub fn open<'a>(
        &self,
        stdin: &'a mut (dyn Read + Send),
    ) -> Result<Box<dyn BufRead + 'a>, CommandError> {
        match self {
            Source::Stdin => Ok(Box::new(BufReader::new(stdin))),
            Source::File(path) => match File::open(path) {
                Ok(file) => Ok(Box::new(BufReader::new(file))),
                Err(error) => Err(CommandError::input(path.clone(), error)),
            },
        }
    }

    /// Wraps a read error with the source's name.
    pub fn read_error(&self, error: std::io::Error) -> CommandError {
        match self {
            Source::Stdin => CommandError::Io(error),
            Source::File(path) => CommandError::input(path.clone(), error),
        }
    }
}
