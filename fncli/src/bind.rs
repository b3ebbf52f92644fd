/*!
The binder: turns parsed values back into the call the signature asks for.

Binding only looks at the parameter list, never at the parser, so the two
sides can change independently.
 */

use std::collections::BTreeMap;

use crate::{
    errors::BindError,
    function::Argument,
    namespace::Namespace,
    signature::{Parameter, ParameterKind},
    value::Value,
};

/**
A call ready to be applied: positional values in declaration order, with
the variadic parameter's values spliced in at its position, plus keyword
values by name.
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundCall {
    pub positional: Vec<Value>,
    pub keywords: BTreeMap<String, Value>,
}

impl BoundCall {
    /// Read this call's values back as Rust types, in declaration order.
    #[must_use]
    pub fn reader(self) -> Reader {
        Reader {
            positional: self.positional.into_iter(),
            keywords: self.keywords,
        }
    }
}

/// Walk the parameters in declaration order, taking each one's value from
/// `namespace`.
pub fn bind(namespace: &Namespace, parameters: &[Parameter]) -> Result<BoundCall, BindError> {
    let mut call = BoundCall::default();

    for parameter in parameters {
        let name = parameter.name();
        let value = || {
            namespace
                .get(name)
                .cloned()
                .ok_or_else(|| BindError::Missing(name.to_owned()))
        };

        match parameter.kind() {
            ParameterKind::PositionalRequired | ParameterKind::PositionalOptional => {
                call.positional.push(value()?);
            }
            ParameterKind::VariadicPositional => match value()? {
                Value::List(items) => call.positional.extend(items),
                other => {
                    return Err(BindError::NotAList {
                        name: name.to_owned(),
                        found: other.kind(),
                    });
                }
            },
            ParameterKind::KeywordRequired | ParameterKind::KeywordOptional => {
                call.keywords.insert(name.to_owned(), value()?);
            }
            // Never mapped, so never parsed
            ParameterKind::VariadicKeyword => {}
        }
    }

    tracing::trace!(?call, "bound");
    Ok(call)
}

/// Reads a [`BoundCall`] back as typed arguments. See [`BoundCall::reader`].
#[derive(Debug)]
pub struct Reader {
    positional: std::vec::IntoIter<Value>,
    keywords: BTreeMap<String, Value>,
}

impl Reader {
    /// The next positional value
    pub fn positional<T: Argument>(&mut self) -> Result<T, BindError> {
        self.positional
            .next()
            .ok_or(BindError::PositionalExhausted)
            .and_then(T::from_value)
    }

    /// All of the remaining positional values, for a variadic parameter
    pub fn rest<T: Argument>(&mut self) -> Result<Vec<T>, BindError> {
        self.positional.by_ref().map(T::from_value).collect()
    }

    pub fn keyword<T: Argument>(&mut self, name: &str) -> Result<T, BindError> {
        self.keywords
            .remove(name)
            .ok_or_else(|| BindError::MissingKeyword(name.to_owned()))
            .and_then(T::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    #[test]
    fn variadics_are_spliced_in_place() {
        let signature = Signature::new([
            Parameter::positional("a"),
            Parameter::variadic("rest"),
            Parameter::keyword("kw1").with_default(1),
        ])
        .unwrap();

        let mut namespace = Namespace::new();
        namespace.insert("a", Value::Int(0));
        namespace.insert("rest", Value::from(vec!["b", "c"]));
        namespace.insert("kw1", Value::Int(5));

        let call = bind(&namespace, signature.parameters()).unwrap();
        assert_eq!(
            call.positional,
            [Value::Int(0), Value::from("b"), Value::from("c")]
        );
        assert_eq!(call.keywords.get("kw1"), Some(&Value::Int(5)));
        assert_eq!(call.keywords.len(), 1);
    }

    #[test]
    fn missing_values_are_errors() {
        let signature = Signature::new([Parameter::positional("a")]).unwrap();

        assert_eq!(
            bind(&Namespace::new(), signature.parameters()),
            Err(BindError::Missing("a".to_owned()))
        );
    }

    #[test]
    fn reader_walks_in_order() {
        let call = BoundCall {
            positional: vec![Value::Int(1), Value::from("x"), Value::from("y")],
            keywords: BTreeMap::from([("flag".to_owned(), Value::Bool(true))]),
        };

        let mut reader = call.reader();
        assert_eq!(reader.positional::<i64>(), Ok(1));
        assert_eq!(
            reader.rest::<String>(),
            Ok(vec!["x".to_owned(), "y".to_owned()])
        );
        assert_eq!(reader.keyword::<bool>("flag"), Ok(true));
        assert_eq!(
            reader.keyword::<bool>("flag"),
            Err(BindError::MissingKeyword("flag".to_owned()))
        );
        assert_eq!(
            reader.positional::<i64>(),
            Err(BindError::PositionalExhausted)
        );
    }
}
