//! Raw form boundary.
//!
//! The web tools post every field as free text (`"30,000"`, `"4.5%"`), while API
//! callers may send pre-parsed numbers. Everything is read through [`FormReader`],
//! which strips formatting, converts units and collects one message per field so
//! the formulas only ever see typed, validated inputs.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValidationErrors};
use crate::types::{man_won, Money, MAX_AMOUNT};

/// A flat mapping of form field name to raw value
pub type FormFields = BTreeMap<String, FieldValue>;

/// One raw form value: either a number already parsed by the caller or the text
/// exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    pub fn to_number(&self) -> Result<Decimal, ParseError> {
        match self {
            FieldValue::Number(n) => Ok(*n),
            FieldValue::Text(s) => parse_number(s),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Decimal> for FieldValue {
    fn from(n: Decimal) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(Decimal::from(n))
    }
}

/// Build a [`FormFields`] map from `(name, value)` pairs.
pub fn form_fields<I, K, V>(pairs: I) -> FormFields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parse a free-text numeric field.
///
/// A leading `-` is kept so range checks can reject it; every other character
/// that is not an ASCII digit or `.` is discarded, so thousands separators and
/// unit suffixes never reach the parser.
pub fn parse_number(raw: &str) -> Result<Decimal, ParseError> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let value =
        Decimal::from_str(&cleaned).map_err(|_| ParseError::Malformed(raw.to_string()))?;
    Ok(if negative { -value } else { value })
}

/// Record an error when a won amount is out of the range the calculators carry:
/// above [`MAX_AMOUNT`], or positive but under one won.
pub fn check_amount(errors: &mut ValidationErrors, field: &str, label: &str, value: Money) {
    if value > MAX_AMOUNT {
        errors.add(field, format!("{label} must be at most 1,000조원"));
    } else if value > Decimal::ZERO && value < Decimal::ONE {
        errors.add(field, format!("{label} must be at least 1 won"));
    }
}

/// Reads typed values out of a [`FormFields`] map, accumulating field errors.
pub struct FormReader<'a> {
    fields: &'a FormFields,
    errors: ValidationErrors,
}

impl<'a> FormReader<'a> {
    pub fn new(fields: &'a FormFields) -> Self {
        Self {
            fields,
            errors: ValidationErrors::new(),
        }
    }

    fn raw(&self, name: &str) -> Option<&'a FieldValue> {
        self.fields.get(name).filter(|v| !v.is_blank())
    }

    /// A number that must be present. Missing or unreadable values record an
    /// error and yield zero so later range checks stay quiet.
    pub fn required_number(&mut self, name: &str, label: &str) -> Decimal {
        match self.raw(name).map(FieldValue::to_number) {
            Some(Ok(n)) => n,
            Some(Err(ParseError::Malformed(_))) => {
                self.errors.add(name, format!("{label} must be a number"));
                Decimal::ZERO
            }
            Some(Err(ParseError::Empty)) | None => {
                self.errors.add(name, format!("{label} is required"));
                Decimal::ZERO
            }
        }
    }

    /// A number that falls back to `default` when left blank.
    pub fn optional_number(&mut self, name: &str, label: &str, default: Decimal) -> Decimal {
        match self.raw(name).map(FieldValue::to_number) {
            Some(Ok(n)) => n,
            Some(Err(ParseError::Malformed(_))) => {
                self.errors.add(name, format!("{label} must be a number"));
                default
            }
            Some(Err(ParseError::Empty)) | None => default,
        }
    }

    /// A required 만원 amount, converted to won.
    pub fn required_amount(&mut self, name: &str, label: &str) -> Money {
        let value = self.required_number(name, label);
        self.to_won(name, label, value)
    }

    /// A 만원 amount converted to won, zero when left blank.
    pub fn optional_amount(&mut self, name: &str, label: &str) -> Money {
        let value = self.optional_number(name, label, Decimal::ZERO);
        self.to_won(name, label, value)
    }

    fn to_won(&mut self, name: &str, label: &str, value: Decimal) -> Money {
        match man_won(value) {
            Some(won) => won,
            None => {
                self.errors.add(name, format!("{label} is too large"));
                Decimal::ZERO
            }
        }
    }

    /// A non-negative whole number, truncating any fractional part.
    pub fn whole_number(&mut self, name: &str, label: &str, default: u32) -> u32 {
        let value = self.optional_number(name, label, Decimal::from(default));
        match value.trunc().to_u32() {
            Some(n) => n,
            None => {
                self.errors
                    .add(name, format!("{label} must be a whole number of at least 0"));
                default
            }
        }
    }

    /// Trimmed text, `None` when blank or absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.raw(name).map(|v| v.as_text().trim().to_string())
    }

    pub fn required_text(&mut self, name: &str, label: &str) -> String {
        match self.text(name) {
            Some(s) => s,
            None => {
                self.errors.add(name, format!("{label} is required"));
                String::new()
            }
        }
    }

    /// A value parsed with `FromStr`, falling back to `default` when blank.
    pub fn choice<T: FromStr>(&mut self, name: &str, label: &str, default: T) -> T {
        match self.text(name) {
            Some(s) => match s.parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    self.errors.add(name, format!("Unknown {label} '{s}'"));
                    default
                }
            },
            None => default,
        }
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_number_strips_formatting() {
        assert_eq!(parse_number("30,000").unwrap(), dec!(30000));
        assert_eq!(parse_number("4.5%").unwrap(), dec!(4.5));
        assert_eq!(parse_number(" 84㎡ ").unwrap(), dec!(84));
    }

    #[test]
    fn test_parse_number_empty_and_malformed() {
        assert_eq!(parse_number(""), Err(ParseError::Empty));
        assert_eq!(parse_number("만원"), Err(ParseError::Empty));
        assert!(matches!(parse_number("1.2.3"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_number_keeps_leading_minus() {
        assert_eq!(parse_number("-5,000").unwrap(), dec!(-5000));
        assert_eq!(parse_number(" -1%").unwrap(), dec!(-1));
        assert_eq!(parse_number("-"), Err(ParseError::Empty));
    }

    #[test]
    fn test_reader_amount_converts_and_bounds() {
        let fields = form_fields([
            ("price", "30,000"),
            ("huge", "12345678901234567890123456"),
        ]);
        let mut reader = FormReader::new(&fields);
        assert_eq!(reader.required_amount("price", "Price"), dec!(300000000));
        assert_eq!(reader.required_amount("huge", "Huge"), Decimal::ZERO);
        assert_eq!(reader.optional_amount("fee", "Fee"), Decimal::ZERO);
        let errors = reader.into_errors();
        assert_eq!(errors.get("huge"), Some("Huge is too large"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_check_amount_range() {
        let mut errors = ValidationErrors::new();
        check_amount(&mut errors, "ok", "Ok", MAX_AMOUNT);
        check_amount(&mut errors, "zero", "Zero", Decimal::ZERO);
        check_amount(&mut errors, "big", "Big", MAX_AMOUNT + Decimal::ONE);
        check_amount(&mut errors, "tiny", "Tiny", dec!(0.5));
        assert!(!errors.contains("ok"));
        assert!(!errors.contains("zero"));
        assert_eq!(errors.get("big"), Some("Big must be at most 1,000조원"));
        assert_eq!(errors.get("tiny"), Some("Tiny must be at least 1 won"));
    }

    #[test]
    fn test_field_value_deserializes_numbers_and_text() {
        let fields: FormFields =
            serde_json::from_str(r#"{"a": 5, "b": "30,000", "c": "4.5"}"#).unwrap();
        assert_eq!(fields["a"].to_number().unwrap(), dec!(5));
        assert_eq!(fields["b"].to_number().unwrap(), dec!(30000));
        assert_eq!(fields["c"].to_number().unwrap(), dec!(4.5));
    }

    #[test]
    fn test_reader_collects_errors() {
        let fields = form_fields([("amount", ""), ("rate", "abc"), ("years", "1.2.3")]);
        let mut reader = FormReader::new(&fields);
        assert_eq!(reader.required_number("amount", "Amount"), Decimal::ZERO);
        assert_eq!(reader.required_number("rate", "Rate"), Decimal::ZERO);
        assert_eq!(reader.whole_number("years", "Years", 3), 3);
        let errors = reader.into_errors();
        assert_eq!(errors.get("amount"), Some("Amount is required"));
        assert_eq!(errors.get("rate"), Some("Rate is required"));
        assert_eq!(errors.get("years"), Some("Years must be a number"));
    }

    #[test]
    fn test_reader_whole_number_truncates() {
        let fields = form_fields([("floor", "7.9")]);
        let mut reader = FormReader::new(&fields);
        assert_eq!(reader.whole_number("floor", "Floor", 5), 7);
        assert!(reader.into_errors().is_empty());
    }
}
