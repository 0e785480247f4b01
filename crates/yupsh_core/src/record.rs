use std::io::{self, BufRead, BufWriter, Write};

/// Byte separating records in a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Records are lines ended by `\n`.
    #[default]
    Newline,
    /// Records are ended by a NUL byte.
    Nul,
}

impl Delimiter {
    /// Returns the delimiter's byte value.
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Newline => b'\n',
            Delimiter::Nul => b'\0',
        }
    }

    /// Returns the NUL delimiter if `zero_terminated` is set, or newline otherwise.
    pub fn zero_terminated(zero_terminated: bool) -> Self {
        match zero_terminated {
            true => Delimiter::Nul,
            false => Delimiter::Newline,
        }
    }
}

/// A single record read from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record contents, excluding the delimiter.
    pub data: Vec<u8>,

    /// Whether the record was followed by a delimiter in the input.
    ///
    /// Only the final record of a stream can be unterminated.
    pub terminated: bool,
}

impl Record {
    /// Returns `true` if the record contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Iterator over the delimited records of a buffered reader.
///
/// Records are produced lazily. A trailing delimiter does not produce an
/// additional empty record.
pub struct Records<R> {
    reader: R,
    delimiter: u8,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R, delimiter: Delimiter) -> Self {
        Self {
            reader,
            delimiter: delimiter.as_byte(),
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut data = Vec::new();
        match self.reader.read_until(self.delimiter, &mut data) {
            Ok(0) => None,
            Ok(_) => {
                let terminated = data.last() == Some(&self.delimiter);
                if terminated {
                    data.pop();
                }
                Some(Ok(Record { data, terminated }))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Buffered writer for delimited records.
///
/// Buffered records reach the underlying writer through [`RecordWriter::finish`],
/// or whenever the buffer fills up. A writer that is dropped without being
/// finished discards what it still buffers, so a stage that fails or is
/// cancelled writes nothing after it returns.
pub struct RecordWriter<W: Write> {
    writer: BufWriter<Gate<W>>,
    delimiter: u8,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W, delimiter: Delimiter) -> Self {
        Self {
            writer: BufWriter::new(Gate {
                inner: writer,
                open: true,
            }),
            delimiter: delimiter.as_byte(),
        }
    }

    /// Writes a record followed by the delimiter.
    pub fn write_record(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.writer.write_all(&[self.delimiter])
    }

    /// Writes bytes as-is, without a delimiter.
    pub fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)
    }

    /// Writes the delimiter on its own.
    pub fn write_delimiter(&mut self) -> io::Result<()> {
        self.writer.write_all(&[self.delimiter])
    }

    /// Flushes all buffered records to the underlying writer.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> Drop for RecordWriter<W> {
    fn drop(&mut self) {
        self.writer.get_mut().open = false;
    }
}

/// Writer that silently discards everything once closed.
struct Gate<W> {
    inner: W,
    open: bool,
}

impl<W: Write> Write for Gate<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.open {
            true => self.inner.write(buf),
            false => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.open {
            true => self.inner.flush(),
            false => Ok(()),
        }
    }
}
