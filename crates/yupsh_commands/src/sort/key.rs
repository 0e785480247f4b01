use std::borrow::Cow;

/// Rules for deriving a comparison key from a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct KeySpec {
    /// 1-indexed field to compare, or the whole record.
    pub field: Option<usize>,
    /// Field separator. Fields are separated by runs of blanks if unset.
    pub delimiter: Option<Vec<u8>>,
    pub ignore_leading_blanks: bool,
    pub ignore_case: bool,
}

impl KeySpec {
    /// Returns the part of a record that is compared.
    pub fn extract<'a>(&self, record: &'a [u8]) -> Cow<'a, [u8]> {
        let mut key = match (self.field, &self.delimiter) {
            (None, _) => record,
            (Some(field), Some(delimiter)) => delimited_field(record, delimiter, field),
            (Some(field), None) => blank_separated_field(record, field),
        };

        if self.ignore_leading_blanks {
            key = trim_leading_blanks(key);
        }

        match self.ignore_case {
            true => Cow::Owned(key.to_ascii_uppercase()),
            false => Cow::Borrowed(key),
        }
    }
}

pub(super) fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

pub(super) fn trim_leading_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&byte| !is_blank(byte))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Returns a 1-indexed field separated by `delimiter`, or an empty slice if
/// the record has fewer fields.
fn delimited_field<'a>(record: &'a [u8], delimiter: &[u8], field: usize) -> &'a [u8] {
    let mut rest = record;
    for _ in 1..field {
        match find(rest, delimiter) {
            Some(position) => rest = &rest[position + delimiter.len()..],
            None => return &[],
        }
    }

    match find(rest, delimiter) {
        Some(position) => &rest[..position],
        None => rest,
    }
}

/// Returns a 1-indexed field separated by runs of blanks, or an empty slice if
/// the record has fewer fields.
fn blank_separated_field(record: &[u8], field: usize) -> &[u8] {
    record
        .split(|&byte| is_blank(byte))
        .filter(|field| !field.is_empty())
        .nth(field - 1)
        .unwrap_or(&[])
}

/// Returns the position of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
