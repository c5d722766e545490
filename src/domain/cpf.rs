//! CPF (Cadastro de Pessoas Físicas) validation and formatting.
//!
//! A CPF is an 11-digit Brazilian taxpayer identifier whose last two digits
//! are check digits computed from the first nine. Inputs arrive either raw
//! (`"52998224725"`) or masked (`"529.982.247-25"`); all entry points strip
//! non-digit characters first.

use std::fmt;
use std::str::FromStr;

/// Number of digits in a CPF.
pub const CPF_LEN: usize = 11;

/// Strip every non-digit character from `input`. No length validation.
#[must_use]
pub fn clean(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Progressively apply the `000.000.000-00` mask while the user types.
///
/// Accepts partial input of any length, caps at 11 digits and never fails.
#[must_use]
pub fn format(input: &str) -> String {
    let digits = clean(input);
    let digits = &digits[..digits.len().min(CPF_LEN)];

    match digits.len() {
        0..=3 => digits.to_string(),
        4..=6 => format!("{}.{}", &digits[..3], &digits[3..]),
        7..=9 => format!("{}.{}.{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
    }
}

fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let digit = 11 - (sum % 11);
    if digit >= 10 { 0 } else { digit }
}

/// Validate a CPF checksum.
///
/// The input may be masked or raw. Rejects anything that is not exactly 11
/// digits after cleaning, the ten degenerate repeated-digit sequences, and
/// any string whose check digits do not match.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    let cleaned = clean(input);
    if cleaned.len() != CPF_LEN {
        return false;
    }

    let digits: Vec<u32> = cleaned.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9], 10) == digits[9] && check_digit(&digits[..10], 11) == digits[10]
}

/// Validator-crate hook used by request payloads.
pub fn validate(value: &str) -> Result<(), validator::ValidationError> {
    if is_valid(value) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("cpf");
        err.message = Some("CPF inválido".into());
        Err(err)
    }
}

/// A validated CPF, stored as its 11 raw digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Raw 11-digit form, the representation sent over the wire.
    #[must_use]
    pub fn as_digits(&self) -> &str {
        &self.0
    }

    /// Masked `000.000.000-00` form for display.
    #[must_use]
    pub fn formatted(&self) -> String {
        format(&self.0)
    }
}

impl FromStr for Cpf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid(s) {
            Ok(Self(clean(s)))
        } else {
            Err(format!("Invalid CPF: {s}"))
        }
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}
