use crate::{Arg, CommandOption};

use super::CatConfig;

/// Options for the `cat` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opt {
    /// Number all output lines.
    NumberLines,
    /// Number non-empty output lines. Overrides [`Opt::NumberLines`].
    NumberNonBlank,
    /// Display `$` at the end of each line.
    ShowEnds,
    /// Display tab characters as `^I`.
    ShowTabs,
    /// Use `^` and `M-` notation for non-printing bytes, except tabs.
    ShowNonPrinting,
    /// Equivalent to [`Opt::ShowNonPrinting`], [`Opt::ShowEnds`] and [`Opt::ShowTabs`].
    ShowAll,
    /// Suppress repeated empty output lines.
    SqueezeBlank,
}

impl CommandOption<CatConfig> for Opt {
    fn apply(&self, config: &mut CatConfig) {
        match self {
            Opt::NumberLines => config.number_lines = true,
            Opt::NumberNonBlank => config.number_nonblank = true,
            Opt::ShowEnds => config.show_ends = true,
            Opt::ShowTabs => config.show_tabs = true,
            Opt::ShowNonPrinting => config.show_nonprinting = true,
            Opt::ShowAll => {
                config.show_nonprinting = true;
                config.show_ends = true;
                config.show_tabs = true;
            }
            Opt::SqueezeBlank => config.squeeze_blank = true,
        }
    }
}

impl From<Opt> for Arg<Opt> {
    fn from(opt: Opt) -> Self {
        Arg::Opt(opt)
    }
}
