/*!
Dynamically typed values that flow between the command line and a
[`Function`][crate::Function]. Every converted token, every default, and
every return value is a [`Value`].
 */

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use joinery::JoinableIterator;

use crate::{coerce, errors::ConversionError};

/// A complex number, as produced by the `3j` / `1+2j` number syntax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline]
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// `3j` when purely imaginary, `(1+2j)` otherwise
impl Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.re == 0.0 && self.re.is_sign_positive() {
            write!(f, "{}j", self.im)
        } else {
            let sign = if self.im.is_sign_negative() { '-' } else { '+' };
            write!(f, "({}{sign}{}j)", self.re, self.im.abs())
        }
    }
}

impl FromStr for Complex {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        coerce::parse_complex(s).ok_or_else(|| ConversionError::new("complex", s))
    }
}

/// The runtime type of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Complex,
    Bool,
    Str,
    List,
}

impl ValueKind {
    /// The short name used in conversion error messages (`invalid int value`)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Complex => "complex",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
            ValueKind::List => "list",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single argument or return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Complex(Complex),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Complex(_) => ValueKind::Complex,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Zero, empty strings, and empty lists are false; everything else is
    /// true.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Complex(c) => c.re != 0.0 || c.im != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /**
    A representation suitable for error messages and help text: strings are
    quoted (`'xkcd'`), everything else looks like its [`Display`] form.
    */
    #[inline]
    #[must_use]
    pub fn repr(&self) -> Repr<'_> {
        Repr(self)
    }
}

/// See [`Value::repr`]
#[derive(Debug, Clone, Copy)]
pub struct Repr<'a>(&'a Value);

impl Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Str(s) => write!(f, "'{s}'"),
            value => Display::fmt(value, f),
        }
    }
}

/// `2.0`, `1e+20`, `1.5e-07`, `inf`, `nan`: integral floats keep their
/// `.0`, and exponents are signed and at least two digits.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }

    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    // Debug keeps the `.0`, and switches to exponent form for very large or
    // small magnitudes
    let text = format!("{x:?}");

    match text.split_once('e') {
        None => f.write_str(&text),
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };

            write!(f, "{mantissa}e{sign}{digits:0>2}")
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write_float(f, *x),
            Value::Complex(c) => write!(f, "{c}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{}]", items.iter().map(Value::repr).join_with(", ")),
        }
    }
}

macro_rules! from_primitive {
    ($($variant:ident: $($type:ty),*;)*) => {
        $($(
            impl From<$type> for Value {
                #[inline]
                fn from(value: $type) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*)*
    };
}

from_primitive! {
    Int: i8, i16, i32, i64, u8, u16, u32;
    Float: f32, f64;
    Complex: Complex;
    Bool: bool;
    Str: String, &str;
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_textual_forms() {
        assert_eq!(Value::Int(1).to_string(), "1");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(-1e6).to_string(), "-1000000.0");
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Value::Float(-1e100).to_string(), "-1e+100");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Complex(Complex::new(0.0, 3.0)).to_string(), "3j");
        assert_eq!(Value::Complex(Complex::new(1.0, -2.5)).to_string(), "(1-2.5j)");
        assert_eq!(Value::from("xkcd").to_string(), "xkcd");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "['a', 'b']");
    }

    #[test]
    fn repr_quotes_strings() {
        assert_eq!(Value::from("xkcd").repr().to_string(), "'xkcd'");
        assert_eq!(Value::Int(70).repr().to_string(), "70");
    }
}
