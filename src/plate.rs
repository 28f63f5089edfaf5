//! License plate normalisation.
//!
//! Raw input is reduced to ASCII letters and digits, uppercased, and then
//! matched against [`PLATE_FORMATS`] in order. The first format whose
//! letter/digit runs fit the cleaned string decides where the dashes go.

/// One run of a plate format: a fixed number of letters or digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run {
    Letters(usize),
    Digits(usize),
}

impl Run {
    fn len(self) -> usize {
        match self {
            Run::Letters(n) | Run::Digits(n) => n,
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Run::Letters(_) => c.is_ascii_uppercase(),
            Run::Digits(_) => c.is_ascii_digit(),
        }
    }
}

use Run::{Digits as D, Letters as L};

/// Known plate groupings, in priority order. The first match wins.
///
/// | #  | Format    | Example    |
/// |----|-----------|------------|
/// | 1  | XX-99-99  | AB-12-34   |
/// | 2  | 99-99-XX  | 12-34-AB   |
/// | 3  | 99-XX-99  | 12-AB-34   |
/// | 4  | XX-99-XX  | AB-12-CD   |
/// | 5  | XX-XX-99  | AB-CD-12   |
/// | 6  | XX-999-X  | AB-123-C   |
/// | 7  | X-999-XX  | A-123-BC   |
/// | 8  | 999-XX-X  | 123-AB-C   |
/// | 9  | X-99-XXX  | A-12-BCD   |
pub static PLATE_FORMATS: &[[Run; 3]] = &[
    [L(2), D(2), D(2)],
    [D(2), D(2), L(2)],
    [D(2), L(2), D(2)],
    [L(2), D(2), L(2)],
    [L(2), L(2), D(2)],
    [L(2), D(3), L(1)],
    [L(1), D(3), L(2)],
    [D(3), L(2), L(1)],
    [L(1), D(2), L(3)],
];

/// Strips everything except ASCII letters and digits and uppercases the rest.
pub fn clean_plate(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Formats user input as a dashed license plate.
///
/// Never fails: input that fits none of the known formats comes back
/// cleaned but without dashes.
pub fn format_license_plate(input: &str) -> String {
    let cleaned = clean_plate(input);

    PLATE_FORMATS
        .iter()
        .find_map(|format| split_runs(&cleaned, format))
        .map(|groups| groups.join("-"))
        .unwrap_or(cleaned)
}

/// Splits `cleaned` into the runs of `format`, or `None` if it does not fit.
fn split_runs<'a>(cleaned: &'a str, format: &[Run]) -> Option<Vec<&'a str>> {
    let total: usize = format.iter().map(|run| run.len()).sum();
    if cleaned.len() != total {
        return None;
    }

    let mut groups = Vec::with_capacity(format.len());
    let mut rest = cleaned;
    for run in format {
        let (group, tail) = rest.split_at(run.len());
        if !group.chars().all(|c| run.accepts(c)) {
            return None;
        }
        groups.push(group);
        rest = tail;
    }
    Some(groups)
}
