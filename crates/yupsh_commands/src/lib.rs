//! Text-processing commands that run as pipeline stages.
//!
//! Every command is constructed from a mixed list of operands and options.
//! Options are folded into the command's configuration once, at
//! construction, and validated when the command runs.

mod arg;
pub mod cat;
pub mod shuf;
pub mod sort;

#[cfg(test)]
pub(crate) mod test_utils;

pub use arg::{Arg, CommandOption};

/// Constructs a [`cat::Cat`] from operands and [`cat::Opt`] values.
///
/// ```
/// use yupsh_commands::{cat, cat::Opt};
///
/// let command = cat!["notes.txt", Opt::NumberLines, Opt::ShowEnds];
/// assert_eq!(command.operands(), ["notes.txt"]);
/// ```
#[macro_export]
macro_rules! cat {
    ($($arg:expr),* $(,)?) => {
        $crate::cat::Cat::new(vec![$($crate::Arg::<$crate::cat::Opt>::from($arg)),*])
    };
}

/// Constructs a [`sort::Sort`] from operands and [`sort::Opt`] values.
#[macro_export]
macro_rules! sort {
    ($($arg:expr),* $(,)?) => {
        $crate::sort::Sort::new(vec![$($crate::Arg::<$crate::sort::Opt>::from($arg)),*])
    };
}

/// Constructs a [`shuf::Shuf`] from operands and [`shuf::Opt`] values.
#[macro_export]
macro_rules! shuf {
    ($($arg:expr),* $(,)?) => {
        $crate::shuf::Shuf::new(vec![$($crate::Arg::<$crate::shuf::Opt>::from($arg)),*])
    };
}
