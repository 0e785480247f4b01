//! Random permutations and samples of input items.
//!
//! Items come from one of three places: the records of the input sources,
//! the command's operands ([`Opt::Echo`]) or an integer range
//! ([`Opt::InputRange`]).

mod opt;
mod range;
mod sample;

use std::{borrow::Cow, io::Read, path::PathBuf};

use rand::{rngs::StdRng, Rng};
use yupsh_core::{
    Command, CommandError, CommandResult, Delimiter, Io, RecordWriter, Records, Source,
    StageContext,
};

use crate::{arg, Arg};
use range::InputRange;

pub use opt::Opt;

/// Command name.
const NAME: &str = "shuf";

/// Configuration for [`Shuf`], built from [`Opt`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShufConfig {
    pub count: Option<usize>,
    pub repeat: bool,
    pub echo: bool,
    pub zero_terminated: bool,
    pub input_range: Option<String>,
    pub random_source: Option<PathBuf>,
}

/// Where the items to shuffle come from.
enum Mode {
    Records,
    Echo,
    Range(InputRange),
}

/// How items are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    /// Every item exactly once.
    Permutation,
    /// At most `n` distinct items.
    Sample(usize),
    /// Exactly `n` independent draws, or unbounded draws.
    Draws(Option<usize>),
}

/// A validated shuf configuration.
struct Plan {
    mode: Mode,
    selection: Selection,
    delimiter: Delimiter,
}

/// Items that have been read or synthesized.
enum Items {
    Records(Vec<Vec<u8>>),
    Range(InputRange),
}

impl Items {
    fn len(&self) -> usize {
        match self {
            Items::Records(records) => records.len(),
            Items::Range(range) => range.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Cow<'_, [u8]> {
        match self {
            Items::Records(records) => Cow::Borrowed(&records[index]),
            Items::Range(range) => Cow::Owned(range.get(index).to_string().into_bytes()),
        }
    }
}

/// Implementation for the "shuf" command.
#[derive(Debug, Clone, Default)]
pub struct Shuf {
    operands: Vec<String>,
    config: ShufConfig,
}

impl Shuf {
    pub fn new<I: IntoIterator<Item = Arg<Opt>>>(args: I) -> Self {
        let (operands, config) = arg::fold(args);
        Self { operands, config }
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn config(&self) -> &ShufConfig {
        &self.config
    }

    fn plan(&self) -> CommandResult<Plan> {
        let mode = match (&self.config.input_range, self.config.echo) {
            (Some(_), true) => {
                return Err(CommandError::config("cannot combine -e and -i options"));
            }
            (Some(range), false) => {
                if let Some(operand) = self.operands.first() {
                    return Err(CommandError::config(format!("extra operand '{operand}'")));
                }
                Mode::Range(InputRange::parse(range)?)
            }
            (None, true) => Mode::Echo,
            (None, false) => Mode::Records,
        };

        let selection = match (self.config.repeat, self.config.count) {
            (true, count) => Selection::Draws(count),
            (false, Some(count)) => Selection::Sample(count),
            (false, None) => Selection::Permutation,
        };

        tracing::debug!(command = NAME, ?selection, "resolved shuf plan");
        Ok(Plan {
            mode,
            selection,
            delimiter: Delimiter::zero_terminated(self.config.zero_terminated),
        })
    }

    /// Reads or synthesizes the items to select from.
    fn items(
        &self,
        plan: &Plan,
        context: StageContext<'_>,
        stdin: &mut (dyn Read + Send),
        rng: &mut StdRng,
    ) -> CommandResult<Items> {
        let sources = match plan.mode {
            Mode::Range(range) => return Ok(Items::Range(range)),
            Mode::Echo => {
                let operands = self.operands.iter().map(|item| item.as_bytes().to_vec());
                return Ok(Items::Records(operands.collect()));
            }
            Mode::Records => Source::from_args(&self.operands),
        };

        let mut records = Vec::new();
        let mut reservoir = match plan.selection {
            Selection::Sample(count) => Some(sample::Reservoir::new(count)),
            _ => None,
        };

        for source in &sources {
            let reader = source.open(&mut *stdin)?;
            for record in Records::new(reader, plan.delimiter) {
                context.checkpoint()?;
                let record = record.map_err(|error| source.read_error(error))?;
                match reservoir.as_mut() {
                    Some(reservoir) => reservoir.offer(record.data, rng),
                    None => records.push(record.data),
                }
            }
        }

        if let Some(reservoir) = reservoir {
            records = reservoir.into_shuffled(rng);
        }

        Ok(Items::Records(records))
    }
}

impl Command for Shuf {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self) -> CommandResult {
        self.plan().map(drop)
    }

    fn run(&self, context: StageContext<'_>, io: &mut Io) -> CommandResult {
        let plan = self.plan()?;
        if matches!(
            plan.selection,
            Selection::Sample(0) | Selection::Draws(Some(0))
        ) {
            return Ok(());
        }

        let mut rng = context.random(self.config.random_source.as_deref())?;
        let items = self.items(&plan, context, io.stdin.as_mut(), &mut rng)?;
        let mut writer = RecordWriter::new(&mut io.stdout, plan.delimiter);

        match plan.selection {
            Selection::Permutation => {
                for index in sample::permutation(items.len(), &mut rng) {
                    context.checkpoint()?;
                    writer.write_record(&items.get(index))?;
                }
            }
            Selection::Sample(count) => {
                let indices = match plan.mode {
                    // Stream records are already sampled and in random order.
                    Mode::Records => (0..items.len()).collect(),
                    _ => sample::choose(items.len(), count, &mut rng),
                };
                for index in indices {
                    context.checkpoint()?;
                    writer.write_record(&items.get(index))?;
                }
            }
            Selection::Draws(count) => {
                if items.is_empty() {
                    return Err(CommandError::config("no lines to repeat"));
                }
                let mut remaining = count;
                while remaining != Some(0) {
                    context.checkpoint()?;
                    writer.write_record(&items.get(rng.gen_range(0..items.len())))?;
                    remaining = remaining.map(|n| n - 1);
                }
            }
        }

        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        io::{self, Write},
    };

    use proptest::prelude::*;
    use tempfile::NamedTempFile;
    use yupsh_core::{CancellationToken, ExecutionContext};

    use super::*;
    use crate::{
        shuf,
        test_utils::{lines, mock_io, run, run_seeded},
    };

    fn sorted(output: &str) -> Vec<&str> {
        let mut lines = lines(output);
        lines.sort_unstable();
        lines
    }

    fn numbers(output: &str) -> Vec<u64> {
        let mut numbers: Vec<u64> = output.lines().map(|n| n.parse().unwrap()).collect();
        numbers.sort_unstable();
        numbers
    }

    #[test]
    fn it_permutes_input() {
        let input = "apple\nbanana\ncherry\ndate\nelderberry\n";
        let output = run_seeded(&shuf![], input, 42);
        assert!(output.result.is_ok());
        assert_eq!(sorted(&output.stdout), lines(input));
    }

    #[test]
    fn equal_seeds_produce_equal_output() {
        let input = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let first = run_seeded(&shuf![], input, 9);
        let second = run_seeded(&shuf![], input, 9);
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn it_limits_output() {
        let output = run_seeded(&shuf![Opt::Count(2)], "a\nb\nc\nd\ne\n", 1);
        let emitted = lines(&output.stdout);
        assert_eq!(emitted.len(), 2);
        assert_ne!(emitted[0], emitted[1]);
    }

    #[test]
    fn count_is_capped_at_the_input_size() {
        let output = run_seeded(&shuf![Opt::Count(10)], "a\nb\nc\n", 1);
        assert!(output.result.is_ok());
        assert_eq!(sorted(&output.stdout), vec!["a", "b", "c"]);
    }

    #[test]
    fn count_zero_emits_nothing() {
        let output = run(&shuf![Opt::Count(0)], "a\nb\n");
        assert!(output.result.is_ok());
        assert_eq!(output.stdout, "");

        let output = run(&shuf![Opt::Count(0), Opt::Repeat], "");
        assert!(output.result.is_ok());
        assert_eq!(output.stdout, "");
    }

    #[test]
    fn it_echoes_operands() {
        let output = run_seeded(&shuf!["red", "green", "blue", Opt::Echo], "ignored\n", 5);
        assert_eq!(sorted(&output.stdout), vec!["blue", "green", "red"]);
    }

    #[test]
    fn it_samples_echoed_operands() {
        let output = run_seeded(&shuf!["a", "b", "c", "d", Opt::Echo, Opt::Count(2)], "", 5);
        let emitted = lines(&output.stdout);
        assert_eq!(emitted.len(), 2);
        assert_ne!(emitted[0], emitted[1]);
    }

    #[test]
    fn it_permutes_ranges() {
        let output = run_seeded(&shuf![Opt::InputRange("1-10".into())], "", 3);
        assert!(output.result.is_ok());
        assert_eq!(numbers(&output.stdout), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn it_samples_ranges() {
        let output = run_seeded(
            &shuf![Opt::InputRange("1-100".into()), Opt::Count(5)],
            "",
            3,
        );
        let emitted = numbers(&output.stdout);
        assert_eq!(emitted.len(), 5);
        assert!(emitted.iter().all(|n| (1..=100).contains(n)));
        assert_eq!(emitted.iter().collect::<HashSet<_>>().len(), 5);
    }

    #[test]
    fn it_repeats_draws() {
        let output = run_seeded(&shuf![Opt::Repeat, Opt::Count(20)], "x\ny\n", 8);
        let emitted = lines(&output.stdout);
        assert_eq!(emitted.len(), 20);
        assert!(emitted.iter().all(|item| *item == "x" || *item == "y"));
    }

    #[test]
    fn it_writes_nul_terminated_records() {
        let output = run_seeded(&shuf![Opt::Zero], "a\nb\0c\0", 2);
        let mut records: Vec<&str> = output.stdout.split_terminator('\0').collect();
        records.sort_unstable();
        assert_eq!(records, vec!["a\nb", "c"]);
        assert!(output.stdout.ends_with('\0'));

        let output = run_seeded(&shuf!["x", Opt::Echo, Opt::Zero], "", 2);
        assert_eq!(output.stdout, "x\0");
    }

    #[test]
    fn it_uses_a_random_source_file() {
        let mut source = NamedTempFile::new().unwrap();
        source.write_all(&[3u8; 32]).unwrap();
        let command = shuf![
            Opt::InputRange("1-50".into()),
            Opt::RandomSource(source.path().to_path_buf())
        ];
        assert_eq!(run(&command, "").stdout, run(&command, "").stdout);
    }

    #[test]
    fn short_random_sources_are_rejected() {
        let mut source = NamedTempFile::new().unwrap();
        source.write_all(b"tiny").unwrap();
        let output = run(&shuf![Opt::RandomSource(source.path().to_path_buf())], "a\n");
        assert!(matches!(output.result, Err(CommandError::Input { .. })));
        assert_eq!(output.stdout, "");
    }

    #[test]
    fn malformed_ranges_are_configuration_errors() {
        for range in ["5-1", "a-b", "1-", "-1-5"] {
            let output = run(&shuf![Opt::InputRange(range.into())], "");
            assert!(matches!(output.result, Err(CommandError::Configuration(_))));
            assert_eq!(output.stdout, "");
        }
    }

    #[test]
    fn validation_rejects_invalid_configurations() {
        assert!(shuf![Opt::InputRange("1-3".into()), Opt::Count(2)].validate().is_ok());
        for command in [
            shuf![Opt::InputRange("3-1".into())],
            shuf![Opt::Echo, Opt::InputRange("1-3".into())],
            shuf!["file.txt", Opt::InputRange("1-3".into())],
        ] {
            assert!(matches!(
                command.validate(),
                Err(CommandError::Configuration(_))
            ));
        }
    }

    #[test]
    fn echo_and_range_are_exclusive() {
        let output = run(&shuf![Opt::Echo, Opt::InputRange("1-3".into())], "");
        assert!(matches!(output.result, Err(CommandError::Configuration(_))));
    }

    #[test]
    fn ranges_do_not_take_operands() {
        let output = run(&shuf!["file.txt", Opt::InputRange("1-3".into())], "");
        assert!(matches!(output.result, Err(CommandError::Configuration(_))));
    }

    #[test]
    fn repeating_nothing_is_an_error() {
        let output = run(&shuf![Opt::Repeat], "");
        assert!(matches!(output.result, Err(CommandError::Configuration(_))));
    }

    #[test]
    fn missing_files_are_fatal() {
        let output = run(&shuf!["/no/such/file2.txt"], "");
        assert!(matches!(output.result, Err(CommandError::Input { .. })));
    }

    #[test]
    fn it_samples_across_files() {
        let mut first = NamedTempFile::new().unwrap();
        first.write_all(b"a\nb\n").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        second.write_all(b"c\nd\n").unwrap();
        let command = shuf![
            first.path().to_str().unwrap(),
            second.path().to_str().unwrap(),
            Opt::Count(3)
        ];

        let output = run_seeded(&command, "", 11);
        let emitted = sorted(&output.stdout);
        assert_eq!(emitted.len(), 3);
        assert_eq!(emitted.iter().collect::<HashSet<_>>().len(), 3);
    }

    #[test]
    fn every_item_can_be_selected() {
        let mut selected = HashSet::new();
        for seed in 0..100 {
            let output = run_seeded(&shuf![Opt::Count(1)], "a\nb\nc\n", seed);
            selected.insert(output.stdout);
        }
        assert_eq!(selected.len(), 3);
    }

    /// Writer that fails once `limit` bytes have been written.
    struct ClosingWriter {
        written: usize,
        limit: usize,
    }

    impl Write for ClosingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= self.limit {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unbounded_repeat_stops_when_the_output_closes() {
        let (mut io, _, _) = mock_io("");
        io.stdout = Box::new(ClosingWriter {
            written: 0,
            limit: 1 << 16,
        });

        let context = ExecutionContext::new().with_seed(1);
        let result = shuf!["y", Opt::Echo, Opt::Repeat].run(context.stage(0), &mut io);
        assert!(matches!(&result, Err(error) if error.is_broken_pipe()));
    }

    /// Writer that cancels a run once `limit` bytes have been written.
    struct CancellingWriter {
        token: CancellationToken,
        written: usize,
        limit: usize,
    }

    impl Write for CancellingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written += buf.len();
            if self.written >= self.limit {
                self.token.cancel();
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unbounded_repeat_stops_on_cancellation() {
        let token = CancellationToken::new();
        let (mut io, _, _) = mock_io("");
        io.stdout = Box::new(CancellingWriter {
            token: token.clone(),
            written: 0,
            limit: 1 << 16,
        });

        let context = ExecutionContext::new().with_cancellation(token);
        let command = shuf![Opt::InputRange("1-9".into()), Opt::Repeat];
        let result = command.run(context.stage(0), &mut io);
        assert!(matches!(result, Err(CommandError::Cancelled)));
    }

    proptest! {
        #[test]
        fn samples_are_distinct_input_items(count in 0usize..12, size in 0usize..12, seed: u64) {
            let input: String = (0..size).map(|n| format!("item{n}\n")).collect();
            let output = run_seeded(&shuf![Opt::Count(count)], &input, seed);
            let emitted = lines(&output.stdout);

            prop_assert_eq!(emitted.len(), count.min(size));
            prop_assert_eq!(emitted.iter().collect::<HashSet<_>>().len(), emitted.len());
            prop_assert!(emitted.iter().all(|item| input.lines().any(|line| line == *item)));
        }

        #[test]
        fn repeated_draws_have_the_exact_count(count in 0usize..40, size in 1u64..6, seed: u64) {
            let range = format!("1-{size}");
            let command = shuf![Opt::InputRange(range), Opt::Repeat, Opt::Count(count)];
            let output = run_seeded(&command, "", seed);
            let emitted = numbers(&output.stdout);

            prop_assert_eq!(emitted.len(), count);
            prop_assert!(emitted.iter().all(|n| (1..=size).contains(n)));
        }

        #[test]
        fn permutations_keep_duplicates(
            records in prop::collection::vec("[ab]{0,2}", 0..16),
            seed: u64,
        ) {
            let input: String = records.iter().map(|r| format!("{r}\n")).collect();
            let output = run_seeded(&shuf![], &input, seed);
            prop_assert_eq!(sorted(&output.stdout), sorted(&input));
        }
    }
}
