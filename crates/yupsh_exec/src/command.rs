use yupsh_commands::{cat::Cat, shuf::Shuf, sort::Sort};
use yupsh_core::{Command as _, CommandResult, Io, StageContext};

/// A command that can run as a pipeline stage.
#[derive(Debug, Clone)]
pub enum Command {
    Cat(Cat),
    Sort(Sort),
    Shuf(Shuf),
}

impl yupsh_core::Command for Command {
    fn name(&self) -> &str {
        match self {
            Command::Cat(cat) => cat.name(),
            Command::Sort(sort) => sort.name(),
            Command::Shuf(shuf) => shuf.name(),
        }
    }

    fn validate(&self) -> CommandResult {
        match self {
            Command::Cat(cat) => cat.validate(),
            Command::Sort(sort) => sort.validate(),
            Command::Shuf(shuf) => shuf.validate(),
        }
    }

    fn run(&self, context: StageContext<'_>, io: &mut Io) -> CommandResult {
        match self {
            Command::Cat(cat) => cat.run(context, io),
            Command::Sort(sort) => sort.run(context, io),
            Command::Shuf(shuf) => shuf.run(context, io),
        }
    }
}

impl From<Cat> for Command {
    fn from(cat: Cat) -> Self {
        Command::Cat(cat)
    }
}

impl From<Sort> for Command {
    fn from(sort: Sort) -> Self {
        Command::Sort(sort)
    }
}

impl From<Shuf> for Command {
    fn from(shuf: Shuf) -> Self {
        Command::Shuf(shuf)
    }
}
