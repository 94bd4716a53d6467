use std::{str::FromStr, sync::LazyLock};

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use regex::Regex;
use serde::Serializer;
use serde_json::Value;

/// A body field as received: `None` when absent, `Some(Value::Null)` when
/// explicitly null.
pub type RawField = Option<Option<Value>>;

static NULL: Value = Value::Null;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static STATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").unwrap());

pub const INVALID_IDENTIFIER: &str = "Identificador inválido.";

/// Money columns are `NUMERIC(12, 2)`.
const MONEY_SCALE: i64 = 2;
const MONEY_INTEGER_DIGITS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0}")]
    InvalidIdentifier(&'static str),
    #[error("{0}")]
    MissingRequiredField(&'static str),
    #[error("{0}")]
    InvalidEnumValue(&'static str),
    #[error("{0}")]
    InvalidNumber(&'static str),
    #[error("{0}")]
    InvalidDate(&'static str),
}

pub trait RawFieldExt {
    fn is_present(&self) -> bool;

    /// The submitted value, with explicit `null` mapped to `Value::Null`.
    fn present(&self) -> Option<&Value>;

    /// The submitted value, treating absent and `null` alike.
    fn value(&self) -> Option<&Value>;
}

impl RawFieldExt for RawField {
    fn is_present(&self) -> bool {
        self.is_some()
    }

    fn present(&self) -> Option<&Value> {
        self.as_ref().map(|inner| inner.as_ref().unwrap_or(&NULL))
    }

    fn value(&self) -> Option<&Value> {
        self.as_ref().and_then(Option::as_ref)
    }
}

// -- ids

fn integral(number: f64) -> Option<i64> {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Some(number as i64)
    } else {
        None
    }
}

/// Parses an identifier from text, accepting anything that reads as a
/// positive integer (`"7"`, `" 7 "`, `"7.0"`).
pub fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let id = trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))?;
    (id > 0).then_some(id)
}

pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral))
            .filter(|id| *id > 0),
        Value::String(text) => parse_id(text),
        _ => None,
    }
}

pub fn path_id(raw: &str) -> Result<i64, FieldError> {
    parse_id(raw).ok_or(FieldError::InvalidIdentifier(INVALID_IDENTIFIER))
}

/// Optional foreign key: `null` and `""` clear the reference, anything else
/// must be an identifier.
pub fn optional_reference(
    value: &Value,
    message: &'static str,
) -> Result<Option<i64>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        other => coerce_id(other)
            .map(Some)
            .ok_or(FieldError::InvalidIdentifier(message)),
    }
}

/// Query-string identifier filter: blank means "no filter".
pub fn optional_id_filter(
    raw: Option<&str>,
    message: &'static str,
) -> Result<Option<i64>, FieldError> {
    match raw {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => parse_id(text)
            .map(Some)
            .ok_or(FieldError::InvalidIdentifier(message)),
    }
}

// -- strings

pub fn required_string(value: Option<&Value>, message: &'static str) -> Result<String, FieldError> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(FieldError::MissingRequiredField(message)),
    }
}

/// Strings pass through untouched, every other JSON value becomes `None`.
pub fn optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

// -- enums

/// Lower-cased string content of a value, or `None` for non-strings.
fn enum_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_lowercase)
}

pub fn enum_value<T: FromStr>(value: Option<&Value>, message: &'static str) -> Result<T, FieldError> {
    value
        .and_then(enum_text)
        .and_then(|text| text.parse().ok())
        .ok_or(FieldError::InvalidEnumValue(message))
}

/// Enum with a default: non-string or missing input yields `None`, a string
/// outside the allowed set is rejected.
pub fn optional_enum<T: FromStr>(
    value: Option<&Value>,
    message: &'static str,
) -> Result<Option<T>, FieldError> {
    match value.and_then(enum_text) {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| FieldError::InvalidEnumValue(message)),
    }
}

/// Lenient parse used by partial updates; the caller decides the fallback.
pub fn lenient_enum<T: FromStr>(value: &Value) -> Option<T> {
    enum_text(value).and_then(|text| text.parse().ok())
}

pub fn enum_filter<T: FromStr>(
    raw: Option<&str>,
    message: &'static str,
) -> Result<Option<T>, FieldError> {
    match raw.map(str::to_lowercase) {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| FieldError::InvalidEnumValue(message)),
    }
}

// -- money

/// Rounds to cents, rejecting amounts whose integer part cannot fit the
/// money columns.
fn to_money(amount: BigDecimal) -> Option<BigDecimal> {
    let (_, scale) = amount.as_bigint_and_exponent();
    let integer_digits = amount.digits() as i64 - scale;
    if integer_digits > MONEY_INTEGER_DIGITS {
        return None;
    }
    Some(amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp))
}

fn decimal_from_text(text: &str) -> Option<BigDecimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    BigDecimal::from_str(trimmed).ok().and_then(to_money)
}

/// Coerces a JSON number or numeric string into a decimal amount. Empty
/// strings and `null` count as missing.
pub fn parse_money(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(number) => BigDecimal::from_str(&number.to_string())
            .ok()
            .and_then(to_money),
        Value::String(text) => decimal_from_text(text),
        _ => None,
    }
}

pub fn money(value: Option<&Value>, message: &'static str) -> Result<BigDecimal, FieldError> {
    value
        .and_then(parse_money)
        .filter(|amount| amount >= &BigDecimal::zero())
        .ok_or(FieldError::InvalidNumber(message))
}

/// Numeric query filter; unparsable input is ignored.
pub fn money_filter(raw: Option<&str>) -> Option<BigDecimal> {
    raw.and_then(decimal_from_text)
}

/// Writes an amount as a plain decimal string with two places.
pub fn serialize_money<S: Serializer>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(
        &amount
            .with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
            .to_plain_string(),
    )
}

// -- dates

pub fn is_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

/// `YYYY-MM-DD` literal check only; falsy input (`null`, `""`) clears the date.
pub fn optional_date(value: Option<&Value>, message: &'static str) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) if is_date(text) => Ok(Some(text.clone())),
        Some(_) => Err(FieldError::InvalidDate(message)),
    }
}

// -- state codes

pub fn is_state_code(text: &str) -> bool {
    STATE_PATTERN.is_match(text)
}

pub fn normalize_state(text: &str) -> String {
    text.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    impl FromStr for Color {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "red" => Ok(Self::Red),
                "blue" => Ok(Self::Blue),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id(" 3 "), Some(3));
        assert_eq!(parse_id("4.0"), Some(4));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);

        assert_eq!(coerce_id(&json!(9)), Some(9));
        assert_eq!(coerce_id(&json!("9")), Some(9));
        assert_eq!(coerce_id(&json!(2.5)), None);
        assert_eq!(coerce_id(&json!(true)), None);
        assert_eq!(coerce_id(&Value::Null), None);
    }

    #[test]
    fn path_id_reports_invalid_identifier() {
        assert_eq!(path_id("x"), Err(FieldError::InvalidIdentifier(INVALID_IDENTIFIER)));
        assert_eq!(path_id("0").unwrap_err().to_string(), "Identificador inválido.");
    }

    #[test]
    fn raw_fields_distinguish_absent_from_null() {
        let absent: RawField = None;
        let null: RawField = Some(None);
        let set: RawField = Some(Some(json!("x")));

        assert!(!absent.is_present());
        assert_eq!(null.present(), Some(&Value::Null));
        assert_eq!(null.value(), None);
        assert_eq!(set.value(), Some(&json!("x")));
    }

    #[test]
    fn references_accept_blank_as_cleared() {
        let message = "ref";
        assert_eq!(optional_reference(&Value::Null, message), Ok(None));
        assert_eq!(optional_reference(&json!(""), message), Ok(None));
        assert_eq!(optional_reference(&json!("5"), message), Ok(Some(5)));
        assert_eq!(
            optional_reference(&json!("cinco"), message),
            Err(FieldError::InvalidIdentifier(message))
        );
    }

    #[test]
    fn required_strings_are_trimmed() {
        assert_eq!(required_string(Some(&json!("  Casa  ")), "m"), Ok("Casa".to_string()));
        assert!(required_string(Some(&json!("   ")), "m").is_err());
        assert!(required_string(Some(&json!(5)), "m").is_err());
        assert!(required_string(None, "m").is_err());
    }

    #[test]
    fn optional_strings_drop_non_strings() {
        assert_eq!(optional_string(Some(&json!(" a "))), Some(" a ".to_string()));
        assert_eq!(optional_string(Some(&json!(1))), None);
        assert_eq!(optional_string(None), None);
    }

    #[test]
    fn enums_are_case_insensitive() {
        assert_eq!(enum_value::<Color>(Some(&json!("RED")), "m"), Ok(Color::Red));
        assert!(enum_value::<Color>(Some(&json!("green")), "m").is_err());
        assert!(enum_value::<Color>(None, "m").is_err());

        assert_eq!(optional_enum::<Color>(Some(&json!(3)), "m"), Ok(None));
        assert_eq!(optional_enum::<Color>(Some(&json!("Blue")), "m"), Ok(Some(Color::Blue)));
        assert!(optional_enum::<Color>(Some(&json!("green")), "m").is_err());

        assert_eq!(lenient_enum::<Color>(&json!("green")), None);
        assert_eq!(enum_filter::<Color>(Some("BLUE"), "m"), Ok(Some(Color::Blue)));
        assert_eq!(enum_filter::<Color>(Some(""), "m"), Ok(None));
        assert!(enum_filter::<Color>(Some("x"), "m").is_err());
    }

    #[test]
    fn money_keeps_precision_and_rejects_negatives() {
        assert_eq!(
            money(Some(&json!(1500.50)), "m").unwrap(),
            BigDecimal::from_str("1500.5").unwrap()
        );
        assert_eq!(
            money(Some(&json!("1500.50")), "m").unwrap(),
            BigDecimal::from_str("1500.50").unwrap()
        );
        assert_eq!(money(Some(&json!(0)), "m").unwrap(), BigDecimal::zero());
        assert!(money(Some(&json!(-1)), "m").is_err());
        assert!(money(Some(&json!("")), "m").is_err());
        assert!(money(Some(&json!("abc")), "m").is_err());
        assert!(money(Some(&Value::Null), "m").is_err());
        assert!(money(None, "m").is_err());
    }

    #[test]
    fn money_outside_the_column_range_is_rejected() {
        assert!(money(Some(&json!("1e200000")), "m").is_err());
        assert!(money(Some(&json!(1e300)), "m").is_err());
        assert!(money(Some(&json!("10000000000")), "m").is_err());
        assert_eq!(
            money(Some(&json!("9999999999.99")), "m").unwrap(),
            BigDecimal::from_str("9999999999.99").unwrap()
        );
        assert_eq!(
            money(Some(&json!("1e-200000")), "m").unwrap(),
            BigDecimal::zero()
        );

        assert_eq!(money_filter(Some("1e200000")), None);
        assert_eq!(
            money_filter(Some("250.5")),
            Some(BigDecimal::from_str("250.50").unwrap())
        );
    }

    #[test]
    fn money_serialises_with_two_places() {
        #[derive(serde::Serialize)]
        struct Priced {
            #[serde(serialize_with = "serialize_money")]
            valor: BigDecimal,
        }

        for (stored, expected) in [("1500.5000", "1500.50"), ("0", "0.00"), ("2500", "2500.00")] {
            let priced = Priced {
                valor: BigDecimal::from_str(stored).unwrap(),
            };
            assert_eq!(serde_json::to_value(&priced).unwrap(), json!({ "valor": expected }));
        }
    }

    #[test]
    fn dates_are_pattern_checked_only() {
        assert_eq!(
            optional_date(Some(&json!("2024-02-30")), "m"),
            Ok(Some("2024-02-30".to_string()))
        );
        assert_eq!(optional_date(Some(&json!("")), "m"), Ok(None));
        assert_eq!(optional_date(Some(&Value::Null), "m"), Ok(None));
        assert_eq!(
            optional_date(Some(&json!("30/01/2024")), "m"),
            Err(FieldError::InvalidDate("m"))
        );
        assert!(optional_date(Some(&json!(20240101)), "m").is_err());
    }

    #[test]
    fn state_codes_are_two_letters() {
        assert!(is_state_code("sp"));
        assert!(is_state_code("RJ"));
        assert!(!is_state_code("XYZ"));
        assert!(!is_state_code("S1"));
        assert_eq!(normalize_state("sp"), "SP");
    }
}
