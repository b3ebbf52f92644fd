/*!
Pure functions that turn a raw token into a typed [`Value`].

Number coercion is an ordered list of fallible parsers: decimal integer,
then float, then complex. The first one that succeeds wins, so a token
always becomes the narrowest numeric type that can represent it. Only
decimal syntax is recognized: `077` is the integer 77, and `0xdeadbeef` is
not a number at all.
 */

use crate::{
    errors::ConversionError,
    value::{Complex, Value},
};

/// The outcome of running a token through an ordered list of parsers.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// One of the parsers accepted the token
    Converted(Value),

    /// Every parser rejected the token; here it is, untouched
    Unconverted(String),
}

impl Conversion {
    /// Keep the original token as a string if nothing converted it.
    #[must_use]
    pub fn or_keep(self) -> Value {
        match self {
            Conversion::Converted(value) => value,
            Conversion::Unconverted(token) => Value::Str(token),
        }
    }
}

/// A single fallible parser in a chain
pub type Attempt = fn(&str) -> Option<Value>;

/// The number parsers, in priority order
pub const NUMBER_ATTEMPTS: [Attempt; 3] = [
    |token| parse_int(token).map(Value::Int),
    |token| parse_float(token).map(Value::Float),
    |token| parse_complex(token).map(Value::Complex),
];

/// Try each parser in turn; the first success wins.
pub fn attempt_in_order(token: &str, attempts: &[Attempt]) -> Conversion {
    attempts
        .iter()
        .find_map(|attempt| attempt(token))
        .map(Conversion::Converted)
        .unwrap_or_else(|| Conversion::Unconverted(token.to_owned()))
}

/// Convert a token to an integer, float, or complex number, in that order
/// of preference.
pub fn coerce_number(token: &str) -> Result<Value, ConversionError> {
    match attempt_in_order(token, &NUMBER_ATTEMPTS) {
        Conversion::Converted(value) => Ok(value),
        Conversion::Unconverted(token) => Err(ConversionError::new("number", token)),
    }
}

/**
Wrap a conversion function so that failure returns the original token as a
string, rather than an error. This is what makes unannotated parameters
"opportunistic": tokens that look like numbers become numbers, and
everything else stays a string.
*/
pub fn opportunistic<F>(convert: F) -> impl Fn(&str) -> Value
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    move |token: &str| match convert(token) {
        Ok(value) => Conversion::Converted(value),
        Err(_) => Conversion::Unconverted(token.to_owned()),
    }
    .or_keep()
}

const TRUE_TOKENS: [&str; 4] = ["y", "yes", "1", "true"];
const FALSE_TOKENS: [&str; 4] = ["n", "no", "0", "false"];

/// Case-insensitive `y`/`yes`/`1`/`true` or `n`/`no`/`0`/`false`.
pub fn coerce_boolean(token: &str) -> Result<bool, ConversionError> {
    let matches = |set: &[&str]| set.iter().any(|t| t.eq_ignore_ascii_case(token));

    if matches(&TRUE_TOKENS) {
        Ok(true)
    } else if matches(&FALSE_TOKENS) {
        Ok(false)
    } else {
        Err(ConversionError::new("bool", token))
    }
}

/// Remove `_` digit separators, which are only allowed between two digits.
fn strip_separators(body: &str) -> Option<String> {
    let bytes = body.as_bytes();

    bytes
        .iter()
        .enumerate()
        .all(|(i, &b)| {
            b != b'_'
                || (i > 0
                    && bytes[i - 1].is_ascii_digit()
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        })
        .then(|| body.replace('_', ""))
}

fn split_sign(token: &str) -> (&str, &str) {
    match token.as_bytes().first() {
        Some(b'+') => ("", &token[1..]),
        Some(b'-') => ("-", &token[1..]),
        _ => ("", token),
    }
}

/// Decimal integers only: optional sign, digits, `_` separators.
pub fn parse_int(token: &str) -> Option<i64> {
    let (sign, body) = split_sign(token.trim());

    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return None;
    }

    let digits = strip_separators(body)?;
    format!("{sign}{digits}").parse().ok()
}

/// Decimal floats, exponents, and the `inf` / `nan` spellings.
pub fn parse_float(token: &str) -> Option<f64> {
    parse_float_exact(token.trim())
}

fn parse_float_exact(token: &str) -> Option<f64> {
    let (sign, body) = split_sign(token);

    let special = match body.to_ascii_lowercase().as_str() {
        "inf" | "infinity" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    };

    if let Some(value) = special {
        return Some(if sign == "-" { -value } else { value });
    }

    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || !body
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-' | b'_'))
    {
        return None;
    }

    let body = strip_separators(body)?;
    format!("{sign}{body}").parse().ok()
}

/// `3j`, `-2.5J`, `1+2j`, `(1-2j)`, `j`, or a plain real number.
pub fn parse_complex(token: &str) -> Option<Complex> {
    let token = token.trim();
    let token = match token.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')')?.trim(),
        None => token,
    };

    let Some(body) = token.strip_suffix(['j', 'J']) else {
        return parse_float_exact(token).map(|re| Complex::new(re, 0.0));
    };

    // The split between the real and imaginary parts is the last sign that
    // isn't leading and isn't part of an exponent
    let split = body
        .char_indices()
        .rev()
        .find(|&(i, c)| {
            matches!(c, '+' | '-') && i > 0 && !body[..i].ends_with(['e', 'E'])
        })
        .map(|(i, _)| i);

    let (real, imaginary) = match split {
        Some(i) => (parse_float_exact(&body[..i])?, &body[i..]),
        None => (0.0, body),
    };

    let imaginary = match imaginary {
        "" | "+" => 1.0,
        "-" => -1.0,
        imaginary => parse_float_exact(imaginary)?,
    };

    Some(Complex::new(real, imaginary))
}
