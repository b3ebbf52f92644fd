/*!
The signature mapper: turns a function's declared [`Signature`] into one
[`ArgumentSpec`] per parameter.

Each parameter is handled in declaration order:

1. Its [`ParameterKind`] decides the argument's name: bare for positional
   parameters, `--name` (or `-n`) for keyword-only ones.
2. The kind also decides the arity. A variadic consumes zero or more
   tokens, a positional parameter with a default consumes zero or one, and
   everything else consumes exactly one.
3. Keyword-only parameters without a default are required; positional
   parameters are required by their arity alone.
4. The annotation decides the converter:
   - a [`Choice`][crate::Choice] converts with its element type and
     restricts the accepted values;
   - [`Annotation::Bool`] on a keyword-only parameter with a default makes
     a flag that stores the negation of the default; otherwise booleans are
     converted with [`coerce_boolean`][crate::coerce::coerce_boolean];
   - any other type converts with that type's converter;
   - no annotation uses [`MapperOptions::default_converter`].
5. Defaults are passed through unchanged.
 */

use crate::{
    convert::Converter,
    errors::ConfigError,
    signature::{Annotation, Parameter, ParameterKind, Signature},
    spec::{ArgumentName, ArgumentSpec, Arity},
    value::Value,
};

/// Settings that apply to every parameter of a mapped signature.
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
    /// The converter for parameters with no annotation. Defaults to
    /// opportunistic number coercion; use [`Converter::raw`] to always keep
    /// tokens as strings.
    pub default_converter: Converter,
}

impl MapperOptions {
    #[must_use]
    pub fn with_default_converter(converter: Converter) -> Self {
        Self {
            default_converter: converter,
        }
    }
}

/// Map every parameter of `signature` to an argument specification. The
/// parameter list is returned alongside the specs, for the binder.
pub fn map_signature<'a>(
    signature: &'a Signature,
    options: &MapperOptions,
) -> Result<(Vec<ArgumentSpec>, &'a [Parameter]), ConfigError> {
    let specs = signature
        .parameters()
        .iter()
        .map(|parameter| map_parameter(parameter, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((specs, signature.parameters()))
}

/// Map a single parameter. See the [module docs][self] for the rules.
pub fn map_parameter(
    parameter: &Parameter,
    options: &MapperOptions,
) -> Result<ArgumentSpec, ConfigError> {
    let kind = parameter.kind();

    let (name, arity) = match kind {
        ParameterKind::PositionalRequired => (positional_name(parameter), Arity::ExactlyOne),
        ParameterKind::PositionalOptional => (positional_name(parameter), Arity::ZeroOrOne),
        ParameterKind::VariadicPositional => (positional_name(parameter), Arity::ZeroOrMore),
        ParameterKind::KeywordRequired | ParameterKind::KeywordOptional => {
            (ArgumentName::keyword(parameter.name()), Arity::ExactlyOne)
        }
        ParameterKind::VariadicKeyword => {
            return Err(ConfigError::UnsupportedKind {
                name: parameter.name().to_owned(),
                kind,
            });
        }
    };

    if matches!(name, ArgumentName::Short('h')) || name.long() == Some("help") {
        return Err(ConfigError::ConflictingOption(name.to_string()));
    }

    let default = parameter.default().cloned();

    let (converter, choices, arity) = match parameter.annotation() {
        Some(Annotation::Choice(choice)) => {
            (choice.converter(), Some(choice.values().to_vec()), arity)
        }
        Some(Annotation::Bool) => match default {
            Some(ref default) if kind.is_keyword() => (
                Converter::boolean(),
                None,
                Arity::Flag(Value::Bool(!default.truthy())),
            ),
            _ => (Converter::boolean(), None, arity),
        },
        Some(Annotation::Type(converter)) => (converter.clone(), None, arity),
        None => (options.default_converter.clone(), None, arity),
    };

    let spec = ArgumentSpec {
        dest: parameter.name().to_owned(),
        name,
        arity,
        required: kind == ParameterKind::KeywordRequired,
        default,
        converter,
        choices,
        help: parameter.help().map(str::to_owned),
    };

    tracing::debug!(
        parameter = parameter.name(),
        %kind,
        argument = %spec.name,
        arity = ?spec.arity,
        converter = %spec.converter,
        "mapped parameter"
    );

    Ok(spec)
}

fn positional_name(parameter: &Parameter) -> ArgumentName {
    ArgumentName::Positional(parameter.name().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice;

    fn map(parameters: impl IntoIterator<Item = Parameter>) -> Vec<ArgumentSpec> {
        let signature = Signature::new(parameters).unwrap();
        map_signature(&signature, &MapperOptions::default()).unwrap().0
    }

    #[test]
    fn one_spec_per_parameter() {
        let specs = map([
            Parameter::positional("a"),
            Parameter::positional("b").with_default(1),
            Parameter::variadic("rest"),
            Parameter::keyword("kw").with_default(2),
            Parameter::keyword("k"),
        ]);

        assert_eq!(specs.len(), 5);

        let names: Vec<String> = specs.iter().map(|spec| spec.name.to_string()).collect();
        assert_eq!(names, ["a", "b", "rest", "--kw", "-k"]);

        let arities: Vec<&Arity> = specs.iter().map(|spec| &spec.arity).collect();
        assert_eq!(
            arities,
            [
                &Arity::ExactlyOne,
                &Arity::ZeroOrOne,
                &Arity::ZeroOrMore,
                &Arity::ExactlyOne,
                &Arity::ExactlyOne
            ]
        );

        let required: Vec<bool> = specs.iter().map(|spec| spec.required).collect();
        assert_eq!(required, [false, false, false, false, true]);
    }

    #[test]
    fn choices_convert_with_their_element_type() {
        let specs = map([Parameter::positional("x")
            .with_annotation(Choice::new([0, 1, 2]).unwrap())]);

        assert_eq!(specs[0].converter.name(), "int");
        assert_eq!(
            specs[0].choices.as_deref(),
            Some(&[Value::Int(0), Value::Int(1), Value::Int(2)][..])
        );
    }

    #[test]
    fn bool_keywords_with_defaults_become_flags() {
        let specs = map([
            Parameter::keyword("flag")
                .with_default(false)
                .with_annotation(Annotation::Bool),
            Parameter::keyword("trueflag")
                .with_default(true)
                .with_annotation(Annotation::Bool),
            Parameter::keyword("answer").with_annotation(Annotation::Bool),
        ]);

        assert_eq!(specs[0].arity, Arity::Flag(Value::Bool(true)));
        assert_eq!(specs[0].default, Some(Value::Bool(false)));
        assert_eq!(specs[1].arity, Arity::Flag(Value::Bool(false)));
        assert_eq!(specs[2].arity, Arity::ExactlyOne);
        assert_eq!(specs[2].converter.name(), "bool");
    }

    #[test]
    fn unannotated_parameters_use_the_default_converter() {
        let signature = Signature::new([Parameter::positional("a")]).unwrap();

        let (specs, _) = map_signature(&signature, &MapperOptions::default()).unwrap();
        assert_eq!(specs[0].converter.convert("4"), Ok(Value::Int(4)));

        let raw = MapperOptions::with_default_converter(Converter::raw());
        let (specs, _) = map_signature(&signature, &raw).unwrap();
        assert_eq!(specs[0].converter.convert("4"), Ok(Value::from("4")));
    }

    #[test]
    fn keyword_variadics_are_unsupported() {
        let signature =
            Signature::new([Parameter::new("kwargs", ParameterKind::VariadicKeyword)]).unwrap();

        assert!(matches!(
            map_signature(&signature, &MapperOptions::default()),
            Err(ConfigError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn help_conflicts_are_rejected() {
        let signature = Signature::new([Parameter::keyword("h")]).unwrap();

        assert!(matches!(
            map_signature(&signature, &MapperOptions::default()),
            Err(ConfigError::ConflictingOption(option)) if option == "-h"
        ));
    }
}
