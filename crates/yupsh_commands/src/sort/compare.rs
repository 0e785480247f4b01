use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use super::key::is_blank;

/// SI suffixes recognized by human-numeric comparison, in increasing order.
const SI_SUFFIXES: &[u8] = b"KMGTPEZY";

/// Effective comparison strategy of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Strategy {
    Lexical,
    Numeric,
    HumanNumeric,
    Version,
    Random,
}

impl Strategy {
    /// Returns the comparable key for an extracted record key.
    pub fn key(self, bytes: &[u8]) -> Key {
        match self {
            Strategy::Lexical | Strategy::Random => Key::Bytes(bytes.to_vec()),
            Strategy::Numeric => {
                Key::Number(Decimal::parse_prefix(bytes).map(|(number, _)| number))
            }
            Strategy::HumanNumeric => Key::Human(Human::parse_prefix(bytes)),
            Strategy::Version => Key::Version(version_components(bytes)),
        }
    }
}

/// A comparable key.
///
/// All keys of one sort share a variant. Keys without a numeric value
/// (`None`) order before all numeric keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) enum Key {
    Bytes(Vec<u8>),
    Number(Option<Decimal>),
    Human(Option<Human>),
    Version(Vec<Component>),
}

/// An arbitrary-precision decimal number.
///
/// Stored normalized: no leading zeros in the integer part, no trailing zeros
/// in the fraction, and zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct Decimal {
    negative: bool,
    integer: Vec<u8>,
    fraction: Vec<u8>,
}

impl Decimal {
    /// Parses a number at the start of `bytes`, after optional blanks.
    ///
    /// Returns the number and the number of bytes consumed, or `None` if
    /// `bytes` does not start with a number.
    pub fn parse_prefix(bytes: &[u8]) -> Option<(Decimal, usize)> {
        let mut position = bytes.iter().take_while(|&&byte| is_blank(byte)).count();

        let mut negative = false;
        match bytes.get(position) {
            Some(b'-') => {
                negative = true;
                position += 1;
            }
            Some(b'+') => position += 1,
            _ => (),
        }

        let integer = digits(&bytes[position..]);
        position += integer.len();

        let mut fraction: &[u8] = &[];
        if bytes.get(position) == Some(&b'.') {
            fraction = digits(&bytes[position + 1..]);
            if !fraction.is_empty() || !integer.is_empty() {
                position += 1 + fraction.len();
            }
        }

        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let integer = trim_start(integer, b'0').to_vec();
        let fraction = trim_end(fraction, b'0').to_vec();
        let negative = negative && !(integer.is_empty() && fraction.is_empty());

        Some((
            Decimal {
                negative,
                integer,
                fraction,
            },
            position,
        ))
    }

    /// Returns the closest floating point value.
    pub fn to_f64(&self) -> f64 {
        let sign = if self.negative { "-" } else { "" };
        let integer = String::from_utf8_lossy(&self.integer);
        let fraction = String::from_utf8_lossy(&self.fraction);
        format!("{sign}0{integer}.{fraction}0")
            .parse()
            .unwrap_or(0.0)
    }

    /// Compares absolute values.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| self.fraction.cmp(&other.fraction))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A number scaled by an optional SI suffix, in powers of 1000.
#[derive(Debug, Clone, Copy)]
pub(super) struct Human(f64);

impl Human {
    /// Parses a number with an optional, case-insensitive, SI suffix.
    pub fn parse_prefix(bytes: &[u8]) -> Option<Human> {
        let (number, consumed) = Decimal::parse_prefix(bytes)?;
        let power = bytes
            .get(consumed)
            .and_then(|suffix| {
                SI_SUFFIXES
                    .iter()
                    .position(|&known| known == suffix.to_ascii_uppercase())
            })
            .map_or(0, |index| index as i32 + 1);

        Some(Human(number.to_f64() * 1000f64.powi(power)))
    }
}

impl PartialEq for Human {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Human {}

impl Ord for Human {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Human {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Human {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A run of digits or non-digits within a version string.
///
/// Numeric runs compare as integers and order before text runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum Component {
    /// Digits without leading zeros.
    Number(Vec<u8>),
    Text(Vec<u8>),
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            (Component::Number(_), Component::Text(_)) => Ordering::Less,
            (Component::Text(_), Component::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Splits a version string into alternating numeric and text runs.
///
/// Comparing the resulting vectors compares component-wise, and a version
/// that is a prefix of another orders first.
pub(super) fn version_components(bytes: &[u8]) -> Vec<Component> {
    let mut components = Vec::new();
    let mut rest = bytes;
    while let Some(&first) = rest.first() {
        let numeric = first.is_ascii_digit();
        let len = rest
            .iter()
            .position(|byte| byte.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(len);
        components.push(match numeric {
            true => Component::Number(trim_start(run, b'0').to_vec()),
            false => Component::Text(run.to_vec()),
        });
        rest = tail;
    }
    components
}

fn digits(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
    &bytes[..len]
}

fn trim_start(bytes: &[u8], byte: u8) -> &[u8] {
    let start = bytes.iter().position(|&b| b != byte).unwrap_or(bytes.len());
    &bytes[start..]
}

fn trim_end(bytes: &[u8], byte: u8) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != byte).map_or(0, |end| end + 1);
    &bytes[..end]
}
