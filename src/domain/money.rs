//! Fixed-point monetary amounts.
//!
//! Amounts are held as an integer count of centavos so client-side checks
//! never touch binary floating point. The remote API exchanges amounts as
//! numbers in reais; conversion happens only at the serde boundary.
//!
//! Formatting follows the pt-BR convention: `,` as the decimal separator
//! and `.` as the thousands separator (`123456` centavos → `"1.234,56"`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound for any user-entered amount: R$ 1.000.000,00.
pub const MAX_ENTRY_CENTAVOS: u64 = 100_000_000;

/// A non-negative monetary amount in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u64);

impl Amount {
    #[must_use]
    pub const fn from_centavos(centavos: u64) -> Self {
        Self(centavos)
    }

    #[must_use]
    pub const fn centavos(&self) -> u64 {
        self.0
    }

    /// Value in reais, for the wire and for display math only.
    #[must_use]
    pub fn as_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Interpret free-form digit entry as centavos.
    ///
    /// Each typed digit shifts the decimal point: `"1234"` is R$ 12,34.
    /// Non-digit characters are ignored; empty or digit-free input parses
    /// to zero. Never fails.
    #[must_use]
    pub fn parse_input(input: &str) -> Self {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self(0);
        }
        // A digit string longer than u64 can only mean garbage entry; pin
        // it at the maximum rather than failing.
        Self(digits.parse().unwrap_or(u64::MAX))
    }

    /// Entry bounds shared by the deposit and transfer forms.
    #[must_use]
    pub fn is_valid_entry(&self) -> bool {
        self.0 > 0 && self.0 <= MAX_ENTRY_CENTAVOS
    }

    /// Bare `1.234,56` rendering, no currency symbol.
    #[must_use]
    pub fn to_input_string(&self) -> String {
        let reais = self.0 / 100;
        let centavos = self.0 % 100;
        format!("{},{:02}", group_thousands(reais), centavos)
    }

    /// Full `R$ 1.234,56` rendering for display-only contexts.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {}", self.to_input_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

// Wire representation is a number in reais.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_reais())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let reais = f64::deserialize(deserializer)?;
        if !reais.is_finite() || reais < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "amount must be a non-negative number, got {reais}"
            )));
        }
        Ok(Self((reais * 100.0).round() as u64))
    }
}

/// Re-render a digit-entry string with the mask applied.
///
/// Empty (or digit-free) input renders to the empty string so a cleared
/// form field stays cleared.
#[must_use]
pub fn format_input(input: &str) -> String {
    if input.chars().any(|c| c.is_ascii_digit()) {
        Amount::parse_input(input).to_input_string()
    } else {
        String::new()
    }
}

/// Validator-crate hook for the amount field of deposit and transfer forms.
pub fn validate_entry(amount: &Amount) -> Result<(), validator::ValidationError> {
    if amount.is_valid_entry() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("amount");
        err.message = Some(if amount.centavos() == 0 {
            "Valor deve ser maior que zero".into()
        } else {
            "Valor máximo: R$ 1.000.000,00".into()
        });
        Err(err)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_digit_entry() {
        assert_eq!(Amount::parse_input("150").centavos(), 150);
        assert_eq!(Amount::parse_input("1234").centavos(), 1_234);
        assert_eq!(Amount::parse_input("1,50").centavos(), 150);
        assert_eq!(Amount::parse_input("R$ 1.234,56").centavos(), 123_456);
        assert_eq!(Amount::parse_input("").centavos(), 0);
        assert_eq!(Amount::parse_input("abc").centavos(), 0);
    }

    #[test]
    fn test_format_input() {
        assert_eq!(format_input("150"), "1,50");
        assert_eq!(format_input("1234"), "12,34");
        assert_eq!(format_input("123456"), "1.234,56");
        assert_eq!(format_input("100000000"), "1.000.000,00");
        assert_eq!(format_input(""), "");
        assert_eq!(format_input("abc"), "");
        assert_eq!(format_input("5"), "0,05");
    }

    #[test]
    fn test_format_is_idempotent_under_parse() {
        for input in ["150", "1234", "1.234,56", "0", "007", "100000001"] {
            assert_eq!(
                Amount::parse_input(&format_input(input)),
                Amount::parse_input(input),
                "parse(format({input})) should equal parse({input})"
            );
        }
    }

    #[test]
    fn test_entry_bounds() {
        assert!(!Amount::from_centavos(0).is_valid_entry());
        assert!(Amount::from_centavos(1).is_valid_entry());
        assert!(Amount::from_centavos(100_000_000).is_valid_entry());
        assert!(!Amount::from_centavos(100_000_001).is_valid_entry());
    }

    #[test]
    fn test_validate_entry_messages() {
        assert!(validate_entry(&Amount::from_centavos(150)).is_ok());

        let zero = validate_entry(&Amount::from_centavos(0)).unwrap_err();
        assert_eq!(zero.message.unwrap(), "Valor deve ser maior que zero");

        let too_big = validate_entry(&Amount::from_centavos(100_000_001)).unwrap_err();
        assert_eq!(too_big.message.unwrap(), "Valor máximo: R$ 1.000.000,00");
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_centavos(150).display(), "R$ 1,50");
        assert_eq!(Amount::from_centavos(123_456).display(), "R$ 1.234,56");
        assert_eq!(Amount::from_centavos(0).display(), "R$ 0,00");
        assert_eq!(
            Amount::from_centavos(100_000_000).to_string(),
            "R$ 1.000.000,00"
        );
    }

    #[test]
    fn test_wire_representation_is_reais() {
        let json = serde_json::to_string(&Amount::from_centavos(150)).unwrap();
        assert_eq!(json, "1.5");

        let amount: Amount = serde_json::from_str("12.34").unwrap();
        assert_eq!(amount.centavos(), 1_234);

        let amount: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(amount.centavos(), 10_000);

        assert!(serde_json::from_str::<Amount>("-1.0").is_err());
    }
}
