use core::{
    fmt::{self, Debug, Display},
    str::FromStr,
};
use std::{borrow::Cow, sync::Arc};

use crate::{
    coerce::{self, coerce_boolean, coerce_number},
    errors::ConversionError,
    value::{Value, ValueKind},
};

type ConvertFn = dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync;

/**
A named, cloneable conversion from a raw token to a [`Value`].

The name appears in error messages (`invalid int value: 'abc'`), so it
should describe the expected type rather than the implementation.
*/
#[derive(Clone)]
pub struct Converter {
    name: Cow<'static, str>,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn convert(&self, token: &str) -> Result<Value, ConversionError> {
        (self.func)(token)
    }

    /// Keep the token exactly as it is, as a string.
    #[must_use]
    pub fn raw() -> Self {
        Self::new("str", |token| Ok(Value::from(token)))
    }

    /// Integer, float, or complex; see [`coerce_number`].
    #[must_use]
    pub fn number() -> Self {
        Self::new("number", coerce_number)
    }

    /// `yes`/`no` style booleans; see [`coerce_boolean`].
    #[must_use]
    pub fn boolean() -> Self {
        Self::new("bool", |token| coerce_boolean(token).map(Value::Bool))
    }

    /// Any type with a [`FromStr`] implementation that can become a
    /// [`Value`]. The converter is named after `name`.
    #[must_use]
    pub fn parsed<T>(name: &'static str) -> Self
    where
        T: FromStr + Into<Value> + 'static,
    {
        Self::new(name, move |token| {
            token
                .parse::<T>()
                .map(Into::into)
                .map_err(|_| ConversionError::new(name, token))
        })
    }

    /**
    The strict conversion for a runtime value type. This is how a token is
    converted when the target type is known, such as for a
    [`Choice`][crate::Choice] or an explicitly typed parameter.

    Unlike opportunistic coercion these never fall back: `int` rejects
    `2.0`, and `float` accepts `2` (as `2.0`) but rejects `3j`.
    */
    #[must_use]
    pub fn of_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int => Self::new("int", |token| {
                coerce::parse_int(token)
                    .map(Value::Int)
                    .ok_or_else(|| ConversionError::new("int", token))
            }),
            ValueKind::Float => Self::new("float", |token| {
                coerce::parse_float(token)
                    .map(Value::Float)
                    .ok_or_else(|| ConversionError::new("float", token))
            }),
            ValueKind::Complex => Self::new("complex", |token| {
                coerce::parse_complex(token)
                    .map(Value::Complex)
                    .ok_or_else(|| ConversionError::new("complex", token))
            }),
            ValueKind::Bool => Self::boolean(),
            ValueKind::Str => Self::raw(),
            // A single token can't meaningfully become a list; keep it whole
            ValueKind::List => Self::new("list", |token| Ok(Value::List(vec![Value::from(token)]))),
        }
    }

    /// Wrap this converter so that failures keep the raw token as a string
    /// instead of reporting an error. See [`coerce::opportunistic`].
    #[must_use]
    pub fn opportunistic(self) -> Self {
        let name = self.name.clone();
        let convert = coerce::opportunistic(move |token| self.convert(token));

        Self::new(name, move |token| Ok(convert(token)))
    }
}

impl Default for Converter {
    /// The default converter for unannotated parameters: opportunistic
    /// number coercion.
    fn default() -> Self {
        Self::number().opportunistic()
    }
}

impl Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}

impl Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_kinds_do_not_fall_back() {
        let int = Converter::of_kind(ValueKind::Int);
        assert_eq!(int.convert("12"), Ok(Value::Int(12)));
        assert_eq!(
            int.convert("2.0").unwrap_err().to_string(),
            "invalid int value: '2.0'"
        );

        let float = Converter::of_kind(ValueKind::Float);
        assert_eq!(float.convert("2"), Ok(Value::Float(2.0)));
        assert!(float.convert("3j").is_err());
    }

    #[test]
    fn opportunistic_never_fails() {
        let convert = Converter::number().opportunistic();
        assert_eq!(convert.convert("abc"), Ok(Value::from("abc")));
        assert_eq!(convert.convert("4"), Ok(Value::Int(4)));
        assert_eq!(convert.name(), "number");
    }

    #[test]
    fn default_is_opportunistic_numbers() {
        assert_eq!(Converter::default().convert("2.5"), Ok(Value::Float(2.5)));
        assert_eq!(Converter::default().convert("xkcd"), Ok(Value::from("xkcd")));
    }

    #[test]
    fn parsed_uses_from_str() {
        let convert = Converter::parsed::<u16>("u16");
        assert_eq!(convert.convert("80"), Ok(Value::Int(80)));
        assert_eq!(
            convert.convert("-1"),
            Err(ConversionError::new("u16", "-1"))
        );
    }
}
