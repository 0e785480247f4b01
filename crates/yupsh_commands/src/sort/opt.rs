use std::path::PathBuf;

use crate::{Arg, CommandOption};

use super::SortConfig;

/// Options for the `sort` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// Reverse the result of comparisons.
    Reverse,
    /// Compare according to the leading numeric value.
    Numeric,
    /// Compare numbers with SI suffixes, such as `2K` or `1G`.
    HumanNumeric,
    /// Natural sort of version numbers within text.
    VersionSort,
    /// Shuffle the input instead of sorting it.
    Random,
    /// Output only the first of an equal run.
    Unique,
    /// Fold lower case to upper case characters when comparing.
    IgnoreCase,
    /// Ignore leading blanks when comparing.
    IgnoreLeadingBlanks,
    /// Compare using a 1-indexed field instead of the whole line.
    Field(usize),
    /// Separate fields with this string instead of runs of blanks.
    Delimiter(String),
    /// Records end with NUL instead of newline.
    ZeroTerminated,
    /// Keep equal records in input order. Sorting is always stable.
    Stable,
    /// Check whether the input is sorted instead of sorting it.
    Check,
    /// Get random bytes for [`Opt::Random`] from a file.
    RandomSource(PathBuf),
}

impl CommandOption<SortConfig> for Opt {
    fn apply(&self, config: &mut SortConfig) {
        match self {
            Opt::Reverse => config.reverse = true,
            Opt::Numeric => config.numeric = true,
            Opt::HumanNumeric => config.human_numeric = true,
            Opt::VersionSort => config.version = true,
            Opt::Random => config.random = true,
            Opt::Unique => config.unique = true,
            Opt::IgnoreCase => config.ignore_case = true,
            Opt::IgnoreLeadingBlanks => config.ignore_leading_blanks = true,
            Opt::Field(field) => config.field = Some(*field),
            Opt::Delimiter(delimiter) => config.delimiter = Some(delimiter.clone()),
            Opt::ZeroTerminated => config.zero_terminated = true,
            Opt::Stable => config.stable = true,
            Opt::Check => config.check = true,
            Opt::RandomSource(path) => config.random_source = Some(path.clone()),
        }
    }
}

impl From<Opt> for Arg<Opt> {
    fn from(opt: Opt) -> Self {
        Arg::Opt(opt)
    }
}
