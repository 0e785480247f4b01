use std::path::PathBuf;

use crate::{Arg, CommandOption};

use super::ShufConfig;

/// Options for the `shuf` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// Output at most this many items.
    Count(usize),
    /// Draw items with replacement.
    Repeat,
    /// Treat operands as the input items.
    Echo,
    /// Records end with NUL instead of newline, both in input and output.
    Zero,
    /// Use the integers of an inclusive range `LO-HI` as the input items.
    InputRange(String),
    /// Get random bytes from a file.
    RandomSource(PathBuf),
}

impl CommandOption<ShufConfig> for Opt {
    fn apply(&self, config: &mut ShufConfig) {
        match self {
            Opt::Count(count) => config.count = Some(*count),
            Opt::Repeat => config.repeat = true,
            Opt::Echo => config.echo = true,
            Opt::Zero => config.zero_terminated = true,
            Opt::InputRange(range) => config.input_range = Some(range.clone()),
            Opt::RandomSource(path) => config.random_source = Some(path.clone()),
        }
    }
}

impl From<Opt> for Arg<Opt> {
    fn from(opt: Opt) -> Self {
        Arg::Opt(opt)
    }
}
