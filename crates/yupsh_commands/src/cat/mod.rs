//! Concatenation and formatting of text files.

mod opt;

use std::io::Write;

use yupsh_core::{
    Command, CommandError, CommandResult, Delimiter, Io, Record, RecordWriter, Records, Source,
    StageContext,
};

use crate::{arg, Arg};

pub use opt::Opt;

/// Command name.
const NAME: &str = "cat";

/// Width of the right-aligned line counter.
const NUMBER_WIDTH: usize = 6;

/// Configuration for [`Cat`], built from [`Opt`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatConfig {
    pub number_lines: bool,
    pub number_nonblank: bool,
    pub show_ends: bool,
    pub show_tabs: bool,
    pub show_nonprinting: bool,
    pub squeeze_blank: bool,
}

impl CatConfig {
    fn is_numbered(&self, record: &Record) -> bool {
        match self.number_nonblank {
            true => !record.is_empty(),
            false => self.number_lines,
        }
    }
}

/// Implementation for the "cat" command.
///
/// Reads every operand in order, or the input stream if there are none, and
/// writes one formatted line per input line. Files that cannot be read are
/// reported and skipped.
#[derive(Debug, Clone, Default)]
pub struct Cat {
    operands: Vec<String>,
    config: CatConfig,
}

/// Formatting state carried across lines and files.
#[derive(Default)]
struct LineState {
    /// Number of the last numbered line.
    number: usize,
    /// Whether the previous emitted line was empty.
    last_blank: bool,
    /// Whether the previous record ended without a newline, so the next
    /// record continues its line.
    continues_line: bool,
}

impl Cat {
    pub fn new<I: IntoIterator<Item = Arg<Opt>>>(args: I) -> Self {
        let (operands, config) = arg::fold(args);
        Self { operands, config }
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn config(&self) -> &CatConfig {
        &self.config
    }

    /// Formats a single line, or nothing if the line is squeezed.
    ///
    /// A record that continues an unterminated line is neither numbered nor
    /// squeezed, since the joined line is never blank.
    fn format_line(&self, state: &mut LineState, record: &Record, line: &mut Vec<u8>) {
        if state.continues_line {
            state.last_blank = false;
        } else {
            let blank = record.is_empty();
            if self.config.squeeze_blank && blank && state.last_blank {
                return;
            }
            state.last_blank = blank;

            if self.config.is_numbered(record) {
                state.number += 1;
                line.extend_from_slice(format!("{:>NUMBER_WIDTH$}\t", state.number).as_bytes());
            }
        }
        state.continues_line = !record.terminated;

        for &byte in &record.data {
            self.push_visible(byte, line);
        }

        if record.terminated {
            if self.config.show_ends {
                line.push(b'$');
            }
            line.push(b'\n');
        }
    }

    /// Appends a byte, rendered visibly if requested.
    fn push_visible(&self, byte: u8, line: &mut Vec<u8>) {
        if byte == b'\t' {
            match self.config.show_tabs {
                true => line.extend_from_slice(b"^I"),
                false => line.push(byte),
            }
            return;
        }

        if !self.config.show_nonprinting {
            line.push(byte);
            return;
        }

        let mut byte = byte;
        if byte >= 128 {
            line.extend_from_slice(b"M-");
            byte -= 128;
        }
        match byte {
            0..=31 => line.extend_from_slice(&[b'^', byte + 64]),
            127 => line.extend_from_slice(b"^?"),
            _ => line.push(byte),
        }
    }
}

impl Command for Cat {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self, context: StageContext<'_>, io: &mut Io) -> CommandResult {
        let Io {
            stdin,
            stdout,
            stderr,
        } = io;
        let mut writer = RecordWriter::new(stdout, Delimiter::Newline);
        let mut state = LineState::default();
        let mut line = Vec::new();
        let mut failed = 0;

        for source in Source::from_args(&self.operands) {
            context.checkpoint()?;
            let reader = match source.open(stdin.as_mut()) {
                Ok(reader) => reader,
                Err(error) => {
                    report(stderr, &error)?;
                    failed += 1;
                    continue;
                }
            };

            for record in Records::new(reader, Delimiter::Newline) {
                context.checkpoint()?;
                let record = match record {
                    Ok(record) => record,
                    Err(error) => {
                        report(stderr, &source.read_error(error))?;
                        failed += 1;
                        break;
                    }
                };

                line.clear();
                self.format_line(&mut state, &record, &mut line);
                writer.write_raw(&line)?;
            }
        }

        writer.finish()?;

        match failed {
            0 => Ok(()),
            failed => Err(CommandError::PartialInput { failed }),
        }
    }
}

/// Writes a single diagnostic line.
fn report<W: Write + ?Sized>(stderr: &mut W, error: &CommandError) -> CommandResult {
    tracing::debug!(command = NAME, %error, "skipping unreadable input");
    stderr.write_all(format!("{NAME}: {error}\n").as_bytes())?;
    Ok(())
}
