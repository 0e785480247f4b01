use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use yupsh_commands::{
    cat::{self, Cat},
    shuf::{self, Shuf},
    sort::{self, Sort},
    Arg,
};
use yupsh_exec::{Command, Pipeline};

/// Argument separating pipeline stages.
const STAGE_SEPARATOR: &str = "::";

#[derive(Debug, Error)]
pub enum StageError {
    #[error("empty pipeline stage")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

/// Concatenate files and print them.
#[derive(Debug, Parser)]
#[command(name = "cat", version)]
struct CatOpts {
    /// Number all output lines
    #[arg(short = 'n', long = "number")]
    number: bool,

    /// Number nonempty output lines, overrides -n
    #[arg(short = 'b', long = "number-nonblank")]
    number_nonblank: bool,

    /// Display $ at end of each line
    #[arg(short = 'E', long)]
    show_ends: bool,

    /// Display TAB characters as ^I
    #[arg(short = 'T', long)]
    show_tabs: bool,

    /// Use ^ and M- notation, except for line feeds and tabs
    #[arg(short = 'v', long)]
    show_nonprinting: bool,

    /// Equivalent to -vET
    #[arg(short = 'A', long)]
    show_all: bool,

    /// Suppress repeated empty output lines
    #[arg(short = 's', long)]
    squeeze_blank: bool,

    /// Files to read, or "-" for standard input
    files: Vec<String>,
}

/// Write sorted concatenation of all files to standard output.
///
/// `-h` selects human-numeric comparison, so help is only available as
/// `--help`.
#[derive(Debug, Parser)]
#[command(name = "sort", disable_help_flag = true)]
struct SortOpts {
    /// Print help
    #[arg(long = "help", action = clap::ArgAction::Help)]
    _help: Option<bool>,

    /// Reverse the result of comparisons
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Compare according to string numerical value
    #[arg(short = 'n', long)]
    numeric_sort: bool,

    /// Compare human readable numbers (e.g., 2K 1G)
    #[arg(short = 'h', long)]
    human_numeric_sort: bool,

    /// Natural sort of (version) numbers within text
    #[arg(short = 'V', long)]
    version_sort: bool,

    /// Shuffle the input lines
    #[arg(short = 'R', long)]
    random_sort: bool,

    /// Output only the first of an equal run
    #[arg(short = 'u', long)]
    unique: bool,

    /// Fold lower case to upper case characters
    #[arg(short = 'f', long)]
    ignore_case: bool,

    /// Ignore leading blanks
    #[arg(short = 'b', long)]
    ignore_leading_blanks: bool,

    /// Sort via a key field, such as 2 or 2,2
    #[arg(short = 'k', long = "key", value_parser = parse_key)]
    key: Option<usize>,

    /// Use SEP instead of runs of blanks as the field separator
    #[arg(short = 't', long = "field-separator", value_name = "SEP")]
    separator: Option<String>,

    /// Line delimiter is NUL, not newline
    #[arg(short = 'z', long)]
    zero_terminated: bool,

    /// Keep equal lines in input order
    #[arg(short = 's', long)]
    stable: bool,

    /// Check for sorted input, do not sort
    #[arg(short = 'c', long)]
    check: bool,

    /// Get random bytes from FILE
    #[arg(long, value_name = "FILE")]
    random_source: Option<PathBuf>,

    /// Files to read, or "-" for standard input
    files: Vec<String>,
}

/// Write a random permutation of the input lines to standard output.
#[derive(Debug, Parser)]
#[command(name = "shuf", version)]
struct ShufOpts {
    /// Output at most COUNT lines
    #[arg(short = 'n', long = "head-count", value_name = "COUNT")]
    count: Option<usize>,

    /// Output lines can be repeated
    #[arg(short = 'r', long)]
    repeat: bool,

    /// Treat each operand as an input line
    #[arg(short = 'e', long)]
    echo: bool,

    /// Line delimiter is NUL, not newline
    #[arg(short = 'z', long)]
    zero_terminated: bool,

    /// Treat each number LO through HI as an input line
    #[arg(short = 'i', long, value_name = "LO-HI")]
    input_range: Option<String>,

    /// Get random bytes from FILE
    #[arg(long, value_name = "FILE")]
    random_source: Option<PathBuf>,

    /// Input lines with -e, otherwise files to read
    operands: Vec<String>,
}

/// Parses command line arguments into a pipeline.
///
/// Stages are separated by `::`, and the first argument of each stage names
/// its command.
pub fn parse_pipeline<S: AsRef<str>>(args: &[S]) -> Result<Pipeline, StageError> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let mut pipeline = Pipeline::default();
    for stage in args.split(|arg| *arg == STAGE_SEPARATOR) {
        pipeline = pipeline.pipe(parse_stage(stage)?);
    }
    Ok(pipeline)
}

/// Parses the arguments of a single stage, starting with the command name.
fn parse_stage(args: &[&str]) -> Result<Command, StageError> {
    let Some(name) = args.first() else {
        return Err(StageError::Empty);
    };

    let command = match *name {
        "cat" => cat_command(CatOpts::try_parse_from(args)?),
        "sort" => sort_command(SortOpts::try_parse_from(args)?),
        "shuf" => shuf_command(ShufOpts::try_parse_from(args)?),
        unknown => return Err(StageError::UnknownCommand(unknown.to_owned())),
    };
    tracing::trace!(command = *name, "parsed stage");
    Ok(command)
}

/// Parses a key definition of a single field, `N` or `N,N`.
fn parse_key(key: &str) -> Result<usize, String> {
    let field = |text: &str| {
        text.parse::<usize>()
            .map_err(|_| format!("invalid number at field start: '{key}'"))
    };

    match key.split_once(',') {
        None => field(key),
        Some((start, end)) if field(start)? == field(end)? => field(start),
        Some(_) => Err(format!("only single-field keys are supported: '{key}'")),
    }
}

/// Returns the options whose flag is set.
fn enabled<O, const N: usize>(flags: [(bool, O); N]) -> impl Iterator<Item = Arg<O>>
where
    Arg<O>: From<O>,
{
    flags
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, opt)| Arg::from(opt))
}

fn cat_command(opts: CatOpts) -> Command {
    use cat::Opt;

    let mut args: Vec<Arg<Opt>> = opts.files.into_iter().map(Arg::from).collect();
    args.extend(enabled([
        (opts.number, Opt::NumberLines),
        (opts.number_nonblank, Opt::NumberNonBlank),
        (opts.show_ends, Opt::ShowEnds),
        (opts.show_tabs, Opt::ShowTabs),
        (opts.show_nonprinting, Opt::ShowNonPrinting),
        (opts.show_all, Opt::ShowAll),
        (opts.squeeze_blank, Opt::SqueezeBlank),
    ]));
    Cat::new(args).into()
}

fn sort_command(opts: SortOpts) -> Command {
    use sort::Opt;

    let mut args: Vec<Arg<Opt>> = opts.files.into_iter().map(Arg::from).collect();
    args.extend(enabled([
        (opts.reverse, Opt::Reverse),
        (opts.numeric_sort, Opt::Numeric),
        (opts.human_numeric_sort, Opt::HumanNumeric),
        (opts.version_sort, Opt::VersionSort),
        (opts.random_sort, Opt::Random),
        (opts.unique, Opt::Unique),
        (opts.ignore_case, Opt::IgnoreCase),
        (opts.ignore_leading_blanks, Opt::IgnoreLeadingBlanks),
        (opts.zero_terminated, Opt::ZeroTerminated),
        (opts.stable, Opt::Stable),
        (opts.check, Opt::Check),
    ]));
    args.extend(opts.key.map(|field| Arg::from(Opt::Field(field))));
    args.extend(opts.separator.map(|separator| Arg::from(Opt::Delimiter(separator))));
    args.extend(opts.random_source.map(|path| Arg::from(Opt::RandomSource(path))));
    Sort::new(args).into()
}

fn shuf_command(opts: ShufOpts) -> Command {
    use shuf::Opt;

    let mut args: Vec<Arg<Opt>> = opts.operands.into_iter().map(Arg::from).collect();
    args.extend(enabled([
        (opts.repeat, Opt::Repeat),
        (opts.echo, Opt::Echo),
        (opts.zero_terminated, Opt::Zero),
    ]));
    args.extend(opts.count.map(|count| Arg::from(Opt::Count(count))));
    args.extend(opts.input_range.map(|range| Arg::from(Opt::InputRange(range))));
    args.extend(opts.random_source.map(|path| Arg::from(Opt::RandomSource(path))));
    Shuf::new(args).into()
}
