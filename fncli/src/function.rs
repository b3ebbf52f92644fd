/*!
Functions as values: a name, documentation, a [`Signature`], and a body
that takes a [`BoundCall`].

The [`#[fncli::command]`][crate::command] attribute builds these from
ordinary Rust functions, using [`Argument`] to pick each parameter's
annotation and read its value back, and [`IntoOutput`] to turn the return
value into something printable.
 */

use core::fmt::{self, Debug};
use std::{path::PathBuf, sync::Arc};

use crate::{
    bind::BoundCall,
    coerce,
    convert::Converter,
    errors::{BindError, CallError, ConversionError},
    signature::{Annotation, Signature},
    value::{Complex, Value, ValueKind},
};

type Body = dyn Fn(BoundCall) -> Result<Option<Value>, CallError> + Send + Sync;

/**
A callable that can be mapped to a command line interface.

```
use fncli::{BoundCall, Function, Parameter, Signature, Value};

let signature = Signature::new([Parameter::positional("sides").with_default(6)]).unwrap();

let roll = Function::new("roll", signature, |call: BoundCall| {
    let sides: i64 = call.reader().positional()?;
    Ok(Some(Value::Int(sides)))
})
.with_description("Roll a die.\n\nAlways rolls the maximum.");

assert_eq!(roll.summary(), Some("Roll a die."));
```
*/
#[derive(Clone)]
pub struct Function {
    name: String,
    description: Option<String>,
    signature: Signature,
    body: Arc<Body>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(BoundCall) -> Result<Option<Value>, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            signature,
            body: Arc::new(body),
        }
    }

    /// Documentation for the help text. The first line doubles as the
    /// summary in multi-command listings.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = match description.trim() {
            "" => None,
            trimmed => Some(trimmed.to_owned()),
        };
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The first line of the description
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|description| description.lines().next())
    }

    #[inline]
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn call(&self, call: BoundCall) -> Result<Option<Value>, CallError> {
        (self.body)(call)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/**
A Rust type that can be a parameter of a [`Function`].
*/
pub trait Argument: Sized {
    /// How tokens for this parameter are converted. `None` means the
    /// mapper's default converter is used.
    fn annotation() -> Option<Annotation>;

    /// Read this type back out of a parsed value.
    fn from_value(value: Value) -> Result<Self, BindError>;
}

fn wrong_type<T>(expected: &'static str, value: &Value) -> Result<T, BindError> {
    Err(BindError::WrongType {
        expected,
        found: value.kind(),
    })
}

impl Argument for Value {
    fn annotation() -> Option<Annotation> {
        None
    }

    fn from_value(value: Value) -> Result<Self, BindError> {
        Ok(value)
    }
}

impl Argument for bool {
    fn annotation() -> Option<Annotation> {
        Some(Annotation::Bool)
    }

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => wrong_type("bool", &other),
        }
    }
}

macro_rules! integer_argument {
    ($($type:ident)*) => {$(
        impl Argument for $type {
            fn annotation() -> Option<Annotation> {
                Some(Annotation::Type(Converter::new(stringify!($type), |token| {
                    coerce::parse_int(token)
                        .filter(|&i| $type::try_from(i).is_ok())
                        .map(Value::Int)
                        .ok_or_else(|| ConversionError::new(stringify!($type), token))
                })))
            }

            fn from_value(value: Value) -> Result<Self, BindError> {
                match value {
                    Value::Int(i) => $type::try_from(i).map_err(|_| BindError::OutOfRange {
                        value: i,
                        expected: stringify!($type),
                    }),
                    other => wrong_type(stringify!($type), &other),
                }
            }
        }
    )*};
}

integer_argument! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize }

macro_rules! float_argument {
    ($($type:ident)*) => {$(
        impl Argument for $type {
            fn annotation() -> Option<Annotation> {
                Some(Annotation::Type(Converter::of_kind(ValueKind::Float)))
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            fn from_value(value: Value) -> Result<Self, BindError> {
                match value {
                    Value::Float(x) => Ok(x as $type),
                    // Integer defaults for float parameters
                    Value::Int(i) => Ok(i as $type),
                    other => wrong_type(stringify!($type), &other),
                }
            }
        }
    )*};
}

float_argument! { f32 f64 }

impl Argument for Complex {
    fn annotation() -> Option<Annotation> {
        Some(Annotation::Type(Converter::of_kind(ValueKind::Complex)))
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Complex(c) => Ok(c),
            Value::Float(x) => Ok(Complex::new(x, 0.0)),
            Value::Int(i) => Ok(Complex::new(i as f64, 0.0)),
            other => wrong_type("complex", &other),
        }
    }
}

impl Argument for String {
    fn annotation() -> Option<Annotation> {
        Some(Annotation::Type(Converter::raw()))
    }

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Str(s) => Ok(s),
            other => wrong_type("str", &other),
        }
    }
}

impl Argument for PathBuf {
    fn annotation() -> Option<Annotation> {
        Some(Annotation::Type(Converter::new("path", |token| Ok(Value::from(token)))))
    }

    fn from_value(value: Value) -> Result<Self, BindError> {
        String::from_value(value).map(PathBuf::from)
    }
}

/// For variadic parameters; each element is converted as a `T`
impl<T: Argument> Argument for Vec<T> {
    fn annotation() -> Option<Annotation> {
        T::annotation()
    }

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => wrong_type("list", &other),
        }
    }
}

/**
A Rust type that a [`Function`] can return. `None` means there's nothing
to print; errors are application errors, passed through untouched.
*/
pub trait IntoOutput {
    fn into_output(self) -> anyhow::Result<Option<Value>>;
}

impl IntoOutput for () {
    fn into_output(self) -> anyhow::Result<Option<Value>> {
        Ok(None)
    }
}

macro_rules! value_output {
    ($($type:ty),* $(,)?) => {$(
        impl IntoOutput for $type {
            fn into_output(self) -> anyhow::Result<Option<Value>> {
                Ok(Some(self.into()))
            }
        }
    )*};
}

value_output! {
    Value, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, Complex, String, &'static str,
}

impl<T: Into<Value>> IntoOutput for Vec<T> {
    fn into_output(self) -> anyhow::Result<Option<Value>> {
        Ok(Some(self.into()))
    }
}

impl<T: IntoOutput> IntoOutput for Option<T> {
    fn into_output(self) -> anyhow::Result<Option<Value>> {
        match self {
            Some(output) => output.into_output(),
            None => Ok(None),
        }
    }
}

impl<T, E> IntoOutput for Result<T, E>
where
    T: IntoOutput,
    E: Into<anyhow::Error>,
{
    fn into_output(self) -> anyhow::Result<Option<Value>> {
        self.map_err(Into::into)?.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation_converter<T: Argument>() -> Converter {
        match T::annotation() {
            Some(Annotation::Type(converter)) => converter,
            other => panic!("expected a type annotation, got {other:?}"),
        }
    }

    #[test]
    fn integer_annotations_check_range() {
        let convert = annotation_converter::<u8>();
        assert_eq!(convert.convert("255"), Ok(Value::Int(255)));
        assert_eq!(
            convert.convert("256").unwrap_err().to_string(),
            "invalid u8 value: '256'"
        );

        assert_eq!(
            u8::from_value(Value::Int(-1)),
            Err(BindError::OutOfRange {
                value: -1,
                expected: "u8"
            })
        );
    }

    #[test]
    fn floats_accept_integer_defaults() {
        assert_eq!(f64::from_value(Value::Int(2)), Ok(2.0));
        assert_eq!(
            f64::from_value(Value::from("2")),
            Err(BindError::WrongType {
                expected: "f64",
                found: ValueKind::Str
            })
        );
    }

    #[test]
    fn bools_are_special() {
        assert!(matches!(bool::annotation(), Some(Annotation::Bool)));
        assert!(Value::annotation().is_none());
    }

    #[test]
    fn outputs() {
        assert_eq!(().into_output().unwrap(), None);
        assert_eq!(3i64.into_output().unwrap(), Some(Value::Int(3)));
        assert_eq!(None::<i64>.into_output().unwrap(), None);
        assert_eq!(
            vec!["a", "b"].into_output().unwrap(),
            Some(Value::from(vec!["a", "b"]))
        );

        let failed: Result<i64, std::io::Error> = Err(std::io::Error::other("disk on fire"));
        assert_eq!(failed.into_output().unwrap_err().to_string(), "disk on fire");
    }

    #[test]
    fn summary_is_the_first_line() {
        let function = Function::new("f", Signature::default(), |_| Ok(None))
            .with_description("\n  First line.\nSecond line.\n");

        assert_eq!(function.summary(), Some("First line."));
        assert_eq!(function.description(), Some("First line.\nSecond line."));
    }
}
