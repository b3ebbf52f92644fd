/*!
The parsing engine: matches a token sequence against a list of
[`ArgumentSpec`]s and produces a [`Namespace`].

Options are resolved and converted as the lexer finds them. Positional
tokens may be interleaved with options; they're set aside during the scan
and distributed to the positional arguments left to right afterwards, with
each optional or variadic argument leaving enough tokens for the required
ones after it.
 */

use fncli_lexer::Lexer;

use crate::{
    errors::{ParseError, UsageError, UsageErrorKind},
    help::{Help, Usage},
    namespace::Namespace,
    spec::{ArgumentSpec, Arity},
    state::{self, ParseState, Stop},
    value::Value,
};

/**
A parser for one command: a program name, an optional description for the
help text, and the arguments it accepts.

```
use fncli::{Parser, ParseError, Value};
use fncli::spec::{ArgumentName, ArgumentSpec, Arity};

let parser = Parser::new("roll", None, vec![ArgumentSpec {
    dest: "sides".to_owned(),
    name: ArgumentName::Positional("sides".to_owned()),
    arity: Arity::ExactlyOne,
    required: false,
    default: None,
    converter: Default::default(),
    choices: None,
    help: None,
}]);

let namespace = parser.parse(["20"]).unwrap();
assert_eq!(namespace.get("sides"), Some(&Value::Int(20)));

assert!(matches!(parser.parse(["-h"]), Err(ParseError::Help(_))));
assert!(matches!(parser.parse([]), Err(ParseError::Usage(_))));
```
*/
#[derive(Debug, Clone)]
pub struct Parser {
    prog: String,
    description: Option<String>,
    specs: Vec<ArgumentSpec>,
    allow_abbrev: bool,
}

impl Parser {
    #[must_use]
    pub fn new(prog: impl Into<String>, description: Option<String>, specs: Vec<ArgumentSpec>) -> Self {
        Self {
            prog: prog.into(),
            description,
            specs,
            allow_abbrev: true,
        }
    }

    /// Accept unambiguous prefixes of long options (`--ent` for
    /// `--entropy`). On by default.
    #[must_use]
    pub fn allow_abbrev(self, allow_abbrev: bool) -> Self {
        Self {
            allow_abbrev,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn prog(&self) -> &str {
        &self.prog
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    /// The one-line usage synopsis
    #[must_use]
    pub fn usage(&self) -> String {
        Usage {
            prog: &self.prog,
            specs: &self.specs,
        }
        .to_string()
    }

    /// The complete help text, as shown for `--help`
    #[must_use]
    pub fn help(&self) -> String {
        Help {
            prog: &self.prog,
            description: self.description.as_deref(),
            specs: &self.specs,
        }
        .to_string()
    }

    /// Attach this parser's name and usage to an error.
    #[must_use]
    pub fn error(&self, kind: UsageErrorKind) -> UsageError {
        UsageError {
            prog: self.prog.clone(),
            usage: self.usage(),
            kind,
        }
    }

    /// Parse a token sequence. The sequence should exclude the program name.
    pub fn parse<'arg>(
        &self,
        tokens: impl IntoIterator<Item = &'arg str>,
    ) -> Result<Namespace, ParseError> {
        let mut state = ParseState::new(&self.specs, self.allow_abbrev);
        let mut lexer = Lexer::new(tokens);

        while let Some(result) = lexer.next_arg(&mut state) {
            match result {
                Ok(()) => {}
                Err(Stop::Help) => return Err(ParseError::Help(self.help())),
                Err(Stop::Usage(kind)) => return Err(self.error(kind).into()),
            }
        }

        self.finish(state)
            .map_err(|kind| ParseError::Usage(self.error(kind)))
    }

    /// Distribute positionals, fill in defaults, and check that nothing is
    /// missing or left over.
    fn finish(&self, state: ParseState<'_, '_>) -> Result<Namespace, UsageErrorKind> {
        let ParseState {
            positionals,
            mut options,
            unrecognized,
            ..
        } = state;

        let mut namespace = Namespace::new();
        let mut missing = Vec::new();
        let mut tokens = positionals.as_slice();

        // Tokens still owed to required positionals later in the list
        let mut reserved = self
            .specs
            .iter()
            .filter(|spec| spec.name.is_positional() && spec.arity == Arity::ExactlyOne)
            .count();

        for (index, spec) in self.specs.iter().enumerate() {
            let value = if spec.name.is_positional() {
                if spec.arity == Arity::ExactlyOne {
                    reserved -= 1;
                }

                let available = tokens.len().saturating_sub(reserved);
                let count = match spec.arity {
                    Arity::ExactlyOne => tokens.len().min(1),
                    Arity::ZeroOrOne => available.min(1),
                    Arity::ZeroOrMore => available,
                    Arity::Flag(_) => 0,
                };

                let (taken, rest) = tokens.split_at(count);
                tokens = rest;

                match (&spec.arity, taken) {
                    (Arity::ZeroOrMore, taken) => Some(Value::List(
                        taken
                            .iter()
                            .map(|token| state::convert(spec, token))
                            .collect::<Result<_, _>>()?,
                    )),
                    (_, [token]) => Some(state::convert(spec, token)?),
                    (Arity::ExactlyOne, _) => {
                        missing.push(spec.name.to_string());
                        None
                    }
                    _ => spec.default.clone(),
                }
            } else {
                match options[index].take() {
                    Some(value) => Some(value),
                    None if spec.required => {
                        missing.push(spec.name.to_string());
                        None
                    }
                    None => spec.default.clone(),
                }
            };

            if let Some(value) = value {
                tracing::trace!(argument = %spec.name, %value, "parsed");
                namespace.insert(spec.dest.clone(), value);
            }
        }

        if !missing.is_empty() {
            return Err(UsageErrorKind::Required(missing));
        }

        if !unrecognized.is_empty() || !tokens.is_empty() {
            return Err(UsageErrorKind::Unrecognized(
                unrecognized
                    .into_iter()
                    .chain(tokens.iter().map(|&token| token.to_owned()))
                    .collect(),
            ));
        }

        Ok(namespace)
    }
}
