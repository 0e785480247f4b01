use lazy_static::lazy_static;
use regex::Regex;
use yupsh_core::{CommandError, CommandResult};

/// A non-empty, inclusive range of unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InputRange {
    low: u64,
    len: usize,
}

impl InputRange {
    /// Parses a range of the form `LO-HI`.
    pub fn parse(text: &str) -> CommandResult<Self> {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^(\d+)-(\d+)$").expect("Compile regex");
        }

        let invalid = || CommandError::config(format!("invalid input range: '{text}'"));

        let captures = RE.captures(text).ok_or_else(invalid)?;
        let (Ok(low), Ok(high)) = (captures[1].parse::<u64>(), captures[2].parse::<u64>()) else {
            return Err(invalid());
        };

        if low > high {
            return Err(invalid());
        }

        let len = (high - low)
            .checked_add(1)
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(|| CommandError::config(format!("input range is too large: '{text}'")))?;

        Ok(Self { low, len })
    }

    /// Returns the number of integers in the range.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the integer at a zero-based offset into the range.
    pub fn get(&self, index: usize) -> u64 {
        self.low + index as u64
    }
}
