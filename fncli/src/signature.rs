/*!
Descriptions of a function's declared parameter list. This is the input to
the [mapper][crate::mapper], and the reference the [binder][crate::bind]
uses to reassemble a call.

Rust has no runtime reflection over function signatures, so a [`Signature`]
is built explicitly, either by hand with the [`Parameter`] builders or by
the [`#[fncli::command]`][crate::command] attribute.
 */

use core::fmt::{self, Display};
use std::collections::HashSet;

use crate::{choice::Choice, convert::Converter, errors::ConfigError, value::Value};

/// How a parameter is passed, and whether it has a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Passed by position; must be given
    PositionalRequired,

    /// Passed by position; has a default
    PositionalOptional,

    /// Passed by `--name`; must be given
    KeywordRequired,

    /// Passed by `--name`; has a default
    KeywordOptional,

    /// Absorbs all remaining positional arguments
    VariadicPositional,

    /// Absorbs arbitrary `--name` arguments. Adapters can describe it, but it
    /// can't be mapped to a command line interface.
    VariadicKeyword,
}

impl ParameterKind {
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalRequired
                | ParameterKind::PositionalOptional
                | ParameterKind::VariadicPositional
        )
    }

    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            ParameterKind::KeywordRequired | ParameterKind::KeywordOptional
        )
    }

    /// Declaration order rank. A parameter may never follow one with a
    /// higher rank; keyword-only parameters may appear in any order.
    const fn rank(self) -> u8 {
        match self {
            ParameterKind::PositionalRequired => 0,
            ParameterKind::PositionalOptional => 1,
            ParameterKind::VariadicPositional => 2,
            ParameterKind::KeywordRequired | ParameterKind::KeywordOptional => 3,
            ParameterKind::VariadicKeyword => 4,
        }
    }

    const fn with_default(self) -> Self {
        match self {
            ParameterKind::PositionalRequired => ParameterKind::PositionalOptional,
            ParameterKind::KeywordRequired => ParameterKind::KeywordOptional,
            kind => kind,
        }
    }
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParameterKind::PositionalRequired => "positional",
            ParameterKind::PositionalOptional => "optional positional",
            ParameterKind::KeywordRequired => "required keyword-only",
            ParameterKind::KeywordOptional => "keyword-only",
            ParameterKind::VariadicPositional => "variadic positional",
            ParameterKind::VariadicKeyword => "variadic keyword",
        })
    }
}

/// A declared type for a parameter, deciding how its tokens are converted.
#[derive(Debug, Clone)]
pub enum Annotation {
    /// Only these values are accepted
    Choice(Choice),

    /// A boolean; becomes a flag if the parameter has a default
    Bool,

    /// Any other concrete type
    Type(Converter),
}

impl From<Choice> for Annotation {
    fn from(choice: Choice) -> Self {
        Self::Choice(choice)
    }
}

impl From<Converter> for Annotation {
    fn from(converter: Converter) -> Self {
        Self::Type(converter)
    }
}

/**
One declared parameter of a function.

```
use fncli::{Parameter, ParameterKind, Value};

let entropy = Parameter::positional("entropy").with_default(70);
assert_eq!(entropy.kind(), ParameterKind::PositionalOptional);
assert_eq!(entropy.default(), Some(&Value::Int(70)));
```
*/
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    default: Option<Value>,
    annotation: Option<Annotation>,
    help: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            annotation: None,
            help: None,
        }
    }

    /// A parameter passed by position
    #[must_use]
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::PositionalRequired)
    }

    /// A parameter passed only as `--name` (or `-n`)
    #[must_use]
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::KeywordRequired)
    }

    /// A parameter that absorbs all remaining positional arguments
    #[must_use]
    pub fn variadic(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::VariadicPositional)
    }

    /// Give this parameter a default. This makes a required positional or
    /// keyword parameter optional.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self.kind = self.kind.with_default();
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Help text, shown next to the argument in the usage message
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// The ordered, validated parameter list of a function.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /**
    Validate a parameter list. Names must be unique; parameters must appear
    in the order required positional, optional positional, variadic, then
    keyword-only; there is at most one variadic parameter, and it has no
    default.
    */
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Result<Self, ConfigError> {
        let parameters: Vec<Parameter> = parameters.into_iter().collect();
        let mut seen = HashSet::new();

        for parameter in &parameters {
            if !seen.insert(parameter.name()) {
                return Err(ConfigError::DuplicateParameter(parameter.name.clone()));
            }

            if matches!(
                parameter.kind,
                ParameterKind::VariadicPositional | ParameterKind::VariadicKeyword
            ) && parameter.default.is_some()
            {
                return Err(ConfigError::VariadicDefault(parameter.name.clone()));
            }
        }

        if let Some((previous, parameter)) = parameters.windows(2).find_map(|pair| match pair {
            [previous, parameter] if misordered(previous.kind, parameter.kind) => {
                Some((previous, parameter))
            }
            _ => None,
        }) {
            return Err(ConfigError::Misordered {
                name: parameter.name.clone(),
                kind: parameter.kind,
                previous: previous.name.clone(),
                previous_kind: previous.kind,
            });
        }

        Ok(Self { parameters })
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Two variadics of the same kind share a rank, so they're caught here too
fn misordered(previous: ParameterKind, next: ParameterKind) -> bool {
    previous.rank() > next.rank()
        || (previous == next
            && matches!(
                next,
                ParameterKind::VariadicPositional | ParameterKind::VariadicKeyword
            ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_make_parameters_optional() {
        assert_eq!(
            Parameter::keyword("kw").with_default(1).kind(),
            ParameterKind::KeywordOptional
        );
        assert_eq!(
            Parameter::keyword("kw").kind(),
            ParameterKind::KeywordRequired
        );
    }

    #[test]
    fn conventional_order_is_accepted() {
        let signature = Signature::new([
            Parameter::positional("a"),
            Parameter::positional("b").with_default(1),
            Parameter::variadic("rest"),
            Parameter::keyword("kw").with_default(2),
            Parameter::keyword("required"),
        ])
        .unwrap();

        assert_eq!(signature.len(), 5);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let error = Signature::new([Parameter::positional("a"), Parameter::keyword("a")]);
        assert_eq!(
            error.unwrap_err(),
            ConfigError::DuplicateParameter("a".to_owned())
        );
    }

    #[test]
    fn required_after_optional_is_rejected() {
        let error = Signature::new([
            Parameter::positional("a").with_default(1),
            Parameter::positional("b"),
        ])
        .unwrap_err();

        assert!(matches!(error, ConfigError::Misordered { ref name, .. } if name == "b"));
    }

    #[test]
    fn positional_after_keyword_is_rejected() {
        assert!(
            Signature::new([Parameter::keyword("kw"), Parameter::positional("a")]).is_err()
        );
    }

    #[test]
    fn only_one_variadic() {
        assert!(
            Signature::new([Parameter::variadic("a"), Parameter::variadic("b")]).is_err()
        );
    }

    #[test]
    fn variadic_defaults_are_rejected() {
        assert_eq!(
            Signature::new([Parameter::variadic("rest").with_default(1)]).unwrap_err(),
            ConfigError::VariadicDefault("rest".to_owned())
        );
    }
}
