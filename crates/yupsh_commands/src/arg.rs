/// An option that configures one kind of command.
///
/// Applying an option sets exactly one concern of the configuration, so
/// applying the same option twice has no further effect.
pub trait CommandOption<C> {
    fn apply(&self, config: &mut C);
}

/// A single construction argument: either an operand or an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<O> {
    /// Positional argument, such as a file path or an echoed item.
    Operand(String),
    /// Option value for the command.
    Opt(O),
}

impl<O> From<&str> for Arg<O> {
    fn from(operand: &str) -> Self {
        Arg::Operand(operand.to_owned())
    }
}

impl<O> From<String> for Arg<O> {
    fn from(operand: String) -> Self {
        Arg::Operand(operand)
    }
}

/// Splits arguments into operands and a configuration with all options applied.
///
/// Operands keep their relative order. Options are applied in the order
/// given, which only matters for options that carry different values.
pub(crate) fn fold<O, C, I>(args: I) -> (Vec<String>, C)
where
    O: CommandOption<C>,
    C: Default,
    I: IntoIterator<Item = Arg<O>>,
{
    let mut operands = Vec::new();
    let mut config = C::default();
    for arg in args {
        match arg {
            Arg::Operand(operand) => operands.push(operand),
            Arg::Opt(opt) => opt.apply(&mut config),
        }
    }
    (operands, config)
}
