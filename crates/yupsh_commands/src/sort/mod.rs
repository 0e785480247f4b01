//! Sorting of text records.
//!
//! All records are collected before any output is written, since the first
//! output record depends on every input record.

mod compare;
mod key;
mod opt;

use std::{cmp::Ordering, collections::HashSet, io::Write, path::PathBuf};

use itertools::Itertools;
use rand::seq::SliceRandom;
use yupsh_core::{
    Command, CommandError, CommandResult, Delimiter, Io, RecordWriter, Records, Source,
    StageContext,
};

use crate::{arg, Arg};
use compare::{Key, Strategy};
use key::KeySpec;

pub use opt::Opt;

/// Command name.
const NAME: &str = "sort";

/// Configuration for [`Sort`], built from [`Opt`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub reverse: bool,
    pub numeric: bool,
    pub human_numeric: bool,
    pub version: bool,
    pub random: bool,
    pub unique: bool,
    pub ignore_case: bool,
    pub ignore_leading_blanks: bool,
    pub field: Option<usize>,
    pub delimiter: Option<String>,
    pub zero_terminated: bool,
    pub stable: bool,
    pub check: bool,
    pub random_source: Option<PathBuf>,
}

impl SortConfig {
    /// Returns the effective strategy.
    ///
    /// Strategies take precedence in the order: random, version,
    /// human-numeric, numeric, lexical.
    fn strategy(&self) -> Strategy {
        let requested = [
            (self.random, Strategy::Random),
            (self.version, Strategy::Version),
            (self.human_numeric, Strategy::HumanNumeric),
            (self.numeric, Strategy::Numeric),
        ];
        let mut enabled = requested
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, strategy)| *strategy);

        let strategy = enabled.next().unwrap_or(Strategy::Lexical);
        for overridden in enabled {
            tracing::warn!(
                command = NAME,
                ?strategy,
                ?overridden,
                "conflicting sort strategies, using the one with higher precedence"
            );
        }
        strategy
    }

    /// Validates the configuration and resolves it into a plan.
    fn plan(&self) -> CommandResult<Plan> {
        if self.field == Some(0) {
            return Err(CommandError::config("field number is zero: fields are 1-indexed"));
        }

        if matches!(&self.delimiter, Some(delimiter) if delimiter.is_empty()) {
            return Err(CommandError::config("empty field delimiter"));
        }

        if self.delimiter.is_some() && self.field.is_none() {
            tracing::debug!(
                command = NAME,
                "delimiter set without a field, comparing whole records"
            );
        }

        let strategy = self.strategy();
        if self.check && strategy == Strategy::Random {
            return Err(CommandError::config("options '-cR' are incompatible"));
        }

        tracing::debug!(
            command = NAME,
            ?strategy,
            reverse = self.reverse,
            unique = self.unique,
            "resolved sort plan"
        );
        Ok(Plan {
            strategy,
            key: KeySpec {
                field: self.field,
                delimiter: self.delimiter.as_ref().map(|d| d.as_bytes().to_vec()),
                ignore_leading_blanks: self.ignore_leading_blanks,
                ignore_case: self.ignore_case,
            },
            reverse: self.reverse,
            unique: self.unique,
            delimiter: Delimiter::zero_terminated(self.zero_terminated),
        })
    }
}

/// A validated sort configuration.
struct Plan {
    strategy: Strategy,
    key: KeySpec,
    reverse: bool,
    unique: bool,
    delimiter: Delimiter,
}

impl Plan {
    fn key(&self, record: &[u8]) -> Key {
        self.strategy.key(&self.key.extract(record))
    }

    fn compare(&self, a: &Key, b: &Key) -> Ordering {
        match self.reverse {
            true => b.cmp(a),
            false => a.cmp(b),
        }
    }

    /// Returns `true` if `next` may not follow `previous` in sorted output.
    fn is_disorder(&self, previous: &Key, next: &Key) -> bool {
        match self.compare(previous, next) {
            Ordering::Greater => true,
            Ordering::Equal => self.unique,
            Ordering::Less => false,
        }
    }
}

/// A record and its comparison key.
struct Line {
    key: Key,
    data: Vec<u8>,
}

/// Implementation for the "sort" command.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    operands: Vec<String>,
    config: SortConfig,
}

impl Sort {
    pub fn new<I: IntoIterator<Item = Arg<Opt>>>(args: I) -> Self {
        let (operands, config) = arg::fold(args);
        Self { operands, config }
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    fn plan(&self) -> CommandResult<Plan> {
        if self.config.check && self.operands.len() > 1 {
            return Err(CommandError::config(format!(
                "extra operand '{}' not allowed with -c",
                self.operands[1]
            )));
        }
        self.config.plan()
    }

    /// Reads every record from every source.
    fn collect(
        &self,
        plan: &Plan,
        context: StageContext<'_>,
        stdin: &mut Box<dyn std::io::Read + Send>,
    ) -> CommandResult<Vec<Line>> {
        let mut lines = Vec::new();
        for source in Source::from_args(&self.operands) {
            let reader = source.open(stdin.as_mut())?;
            for record in Records::new(reader, plan.delimiter) {
                context.checkpoint()?;
                let record = record.map_err(|error| source.read_error(error))?;
                lines.push(Line {
                    key: plan.key(&record.data),
                    data: record.data,
                });
            }
        }
        Ok(lines)
    }

    /// Verifies that the input is sorted without writing any output.
    fn check(&self, plan: &Plan, context: StageContext<'_>, io: &mut Io) -> CommandResult {
        let source = Source::from_args(&self.operands)
            .into_iter()
            .next()
            .unwrap_or(Source::Stdin);
        let reader = source.open(io.stdin.as_mut())?;

        let mut previous: Option<Key> = None;
        for (index, record) in Records::new(reader, plan.delimiter).enumerate() {
            context.checkpoint()?;
            let record = record.map_err(|error| source.read_error(error))?;
            let key = plan.key(&record.data);

            if let Some(previous) = &previous {
                if plan.is_disorder(previous, &key) {
                    let line = format!(
                        "{NAME}: {}:{}: disorder: {}\n",
                        source.name(),
                        index + 1,
                        String::from_utf8_lossy(&record.data)
                    );
                    io.stderr.write_all(line.as_bytes())?;
                    return Err(CommandError::Unsuccessful(format!(
                        "{}:{}: disorder",
                        source.name(),
                        index + 1
                    )));
                }
            }
            previous = Some(key);
        }

        Ok(())
    }
}

impl Command for Sort {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self) -> CommandResult {
        self.plan().map(drop)
    }

    fn run(&self, context: StageContext<'_>, io: &mut Io) -> CommandResult {
        let plan = self.plan()?;
        if self.config.check {
            return self.check(&plan, context, io);
        }

        let mut rng = match plan.strategy {
            Strategy::Random => Some(context.random(self.config.random_source.as_deref())?),
            _ => None,
        };

        let mut lines = self.collect(&plan, context, &mut io.stdin)?;
        context.checkpoint()?;

        match rng.as_mut() {
            Some(rng) => {
                if plan.unique {
                    let mut seen = HashSet::new();
                    lines.retain(|line| seen.insert(line.key.clone()));
                }
                lines.shuffle(rng);
            }
            None => lines.sort_by(|a, b| plan.compare(&a.key, &b.key)),
        }

        let mut writer = RecordWriter::new(&mut io.stdout, plan.delimiter);
        let deduplicate = plan.unique && rng.is_none();
        for line in lines
            .iter()
            .dedup_by(|a, b| deduplicate && a.key == b.key)
        {
            writer.write_record(&line.data)?;
        }
        writer.finish()?;

        Ok(())
    }
}
