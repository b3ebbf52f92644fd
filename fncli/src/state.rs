/*!
The in-progress state of a single parse. The lexer classifies each token
and hands it to a [`ParseState`], which resolves option names, converts
option arguments as they arrive, and sets positional tokens aside to be
distributed once the scan is done.
 */

use fncli_lexer::{Arg, ArgAccess, Visitor};

use crate::{
    errors::UsageErrorKind,
    spec::{ArgumentSpec, Arity},
    value::Value,
};

/// Why a scan stopped early
#[derive(Debug, Clone, PartialEq)]
pub enum Stop {
    /// `-h` or `--help`
    Help,
    Usage(UsageErrorKind),
}

impl From<UsageErrorKind> for Stop {
    fn from(kind: UsageErrorKind) -> Self {
        Self::Usage(kind)
    }
}

/// An option name, resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Help,
    Spec(usize),
}

#[derive(Debug)]
pub struct ParseState<'p, 'arg> {
    specs: &'p [ArgumentSpec],
    allow_abbrev: bool,

    /// Positional tokens, in order of appearance
    pub positionals: Vec<&'arg str>,

    /// Option values by spec index; always `None` for positional specs
    pub options: Vec<Option<Value>>,

    /// Options that didn't match anything, as written
    pub unrecognized: Vec<String>,
}

impl<'p, 'arg> ParseState<'p, 'arg> {
    #[must_use]
    pub fn new(specs: &'p [ArgumentSpec], allow_abbrev: bool) -> Self {
        Self {
            specs,
            allow_abbrev,
            positionals: Vec::new(),
            options: vec![None; specs.len()],
            unrecognized: Vec::new(),
        }
    }

    fn find_long(&self, option: &str) -> Result<Option<Target>, Stop> {
        let candidates = || {
            [("help", Target::Help)].into_iter().chain(
                self.specs
                    .iter()
                    .enumerate()
                    .filter_map(|(index, spec)| Some((spec.name.long()?, Target::Spec(index)))),
            )
        };

        if let Some((_, target)) = candidates().find(|&(long, _)| long == option) {
            return Ok(Some(target));
        }

        if !self.allow_abbrev || option.is_empty() {
            return Ok(None);
        }

        let mut prefixed = candidates().filter(|&(long, _)| long.starts_with(option));

        match (prefixed.next(), prefixed.next()) {
            (None, _) => Ok(None),
            (Some((_, target)), None) => Ok(Some(target)),
            (Some(first), Some(second)) => Err(UsageErrorKind::AmbiguousOption {
                option: option.to_owned(),
                candidates: [first, second]
                    .into_iter()
                    .chain(prefixed)
                    .map(|(long, _)| format!("--{long}"))
                    .collect(),
            }
            .into()),
        }
    }

    fn find_short(&self, option: char) -> Option<Target> {
        if option == 'h' {
            return Some(Target::Help);
        }

        self.specs
            .iter()
            .position(|spec| spec.name.short() == Some(option))
            .map(Target::Spec)
    }

    /// Store a value for the option at `index`. Flags store their constant
    /// and never touch `argument`.
    fn store(
        &mut self,
        index: usize,
        argument: impl FnOnce() -> Option<Arg<'arg>>,
    ) -> Result<(), Stop> {
        let specs = self.specs;
        let spec = &specs[index];

        let value = match spec.arity {
            Arity::Flag(ref constant) => constant.clone(),
            _ => {
                let token = argument()
                    .map(|arg| arg.as_str())
                    .filter(|token| !looks_like_option(token))
                    .ok_or_else(|| UsageErrorKind::ExpectedArgument {
                        argument: spec.name.to_string(),
                    })?;

                convert(spec, token)?
            }
        };

        tracing::trace!(argument = %spec.name, %value, "stored option");

        // Repeated options: the last one wins
        self.options[index] = Some(value);
        Ok(())
    }
}

/// Convert a token with the spec's converter, then check its choices.
pub fn convert(spec: &ArgumentSpec, token: &str) -> Result<Value, UsageErrorKind> {
    let value = spec
        .converter
        .convert(token)
        .map_err(|error| UsageErrorKind::Conversion {
            argument: spec.name.to_string(),
            error,
        })?;

    match spec.choices {
        Some(ref choices) if !choices.contains(&value) => Err(UsageErrorKind::InvalidChoice {
            argument: spec.name.to_string(),
            value: value.repr().to_string(),
            choices: choices.iter().map(|choice| choice.repr().to_string()).collect(),
        }),
        _ => Ok(value),
    }
}

/// An option's argument can be a negative number, but not another option
fn looks_like_option(token: &str) -> bool {
    token.starts_with('-')
        && token.len() > 1
        && !token[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

impl<'arg> Visitor<'arg> for &mut ParseState<'_, 'arg> {
    type Value = Result<(), Stop>;

    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value {
        tracing::trace!(token = argument.as_str(), "positional");
        self.positionals.push(argument.as_str());
        Ok(())
    }

    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value {
        match self.find_long(option.as_str())? {
            Some(Target::Help) => Err(Stop::Help),
            Some(Target::Spec(index)) => match self.specs[index].arity {
                Arity::Flag(_) => Err(UsageErrorKind::UnexpectedArgument {
                    argument: self.specs[index].name.to_string(),
                    value: argument.as_str().to_owned(),
                }
                .into()),
                _ => {
                    // `--name=` is an explicitly empty argument, which is
                    // allowed even though it looks like nothing
                    let value = convert(&self.specs[index], argument.as_str())?;
                    tracing::trace!(option = option.as_str(), %value, "stored option");
                    self.options[index] = Some(value);
                    Ok(())
                }
            },
            None => {
                self.unrecognized
                    .push(format!("--{}={}", option.as_str(), argument.as_str()));
                Ok(())
            }
        }
    }

    fn visit_long(self, option: Arg<'arg>, arg: impl ArgAccess<'arg>) -> Self::Value {
        match self.find_long(option.as_str())? {
            Some(Target::Help) => Err(Stop::Help),
            Some(Target::Spec(index)) => self.store(index, || arg.take()),
            None => {
                self.unrecognized.push(format!("--{}", option.as_str()));
                Ok(())
            }
        }
    }

    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value {
        match self.find_short(option) {
            Some(Target::Help) => Err(Stop::Help),
            Some(Target::Spec(index)) => self.store(index, || arg.take()),
            None => {
                self.unrecognized.push(format!("-{option}"));
                Ok(())
            }
        }
    }
}
