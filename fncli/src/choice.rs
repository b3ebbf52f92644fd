use crate::{
    convert::Converter,
    errors::ConfigError,
    value::{Value, ValueKind},
};

/**
A restricted set of values for a parameter. Every value shares one runtime
type, and that type decides how a token is converted before membership is
checked:

```
use fncli::{Choice, Value};

let method = Choice::new(["xkcd", "short"]).unwrap();
assert!(method.contains(&Value::from("short")));

assert!(Choice::new([Value::Float(1.0), Value::Int(2)]).is_err());
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    values: Vec<Value>,
    kind: ValueKind,
}

impl Choice {
    /// Create a new choice. Fails if there are no values, if the values
    /// have different types, or if the values are lists.
    pub fn new<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Result<Self, ConfigError> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let kind = values.first().ok_or(ConfigError::EmptyChoice)?.kind();

        if kind == ValueKind::List {
            return Err(ConfigError::UnsupportedChoiceKind(kind));
        }

        match values.iter().find(|value| value.kind() != kind) {
            Some(other) => Err(ConfigError::MixedChoice {
                expected: kind,
                found: other.kind(),
            }),
            None => Ok(Self { values, kind }),
        }
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The type shared by every value in the set
    #[inline]
    #[must_use]
    pub fn element_kind(&self) -> ValueKind {
        self.kind
    }

    /// The converter for incoming tokens; see [`Converter::of_kind`]
    #[must_use]
    pub fn converter(&self) -> Converter {
        Converter::of_kind(self.kind)
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }
}
