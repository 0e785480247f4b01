use std::{
    io::{self, Read, Write},
    sync::Arc,
};

use parking_lot::Mutex;

/// Streams connected to a running command.
///
/// Holds the three streams of one pipeline stage:
///  - Input, either the pipeline's input or the previous stage's output.
///  - Output, either the next stage's input or the pipeline's output.
///  - Diagnostic output, shared by all stages in a pipeline.
///
/// # Examples
///
/// Output can be written using the standard [`write!`] and [`writeln!`] macros.
/// ```
/// use std::io::Write;
/// use yupsh_core::Io;
///
/// let mut io = Io::new(
///     Box::new(std::io::empty()),
///     Box::new(std::io::sink()),
///     Box::new(std::io::sink()),
/// );
/// writeln!(io.stdout, "This line is printed to the output stream.").unwrap();
/// writeln!(io.stderr, "This line is printed to the diagnostic stream.").unwrap();
/// ```
pub struct Io {
    /// Input stream.
    pub stdin: Box<dyn Read + Send>,
    /// Output stream.
    pub stdout: Box<dyn Write + Send>,
    /// Diagnostic output stream.
    pub stderr: Box<dyn Write + Send>,
}

impl Io {
    /// Constructs a new stream wrapper for a command.
    pub fn new(
        stdin: Box<dyn Read + Send>,
        stdout: Box<dyn Write + Send>,
        stderr: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }

    /// Constructs a stream wrapper that reads nothing and discards all output.
    pub fn empty() -> Self {
        Self::new(
            Box::new(io::empty()),
            Box::new(io::sink()),
            Box::new(io::sink()),
        )
    }
}

/// A writer that can be cloned and handed to several threads.
///
/// Each call to [`Write::write`] holds the lock for its full duration, so
/// complete diagnostic lines written with a single `write_all` never
/// interleave with lines from other stages.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
