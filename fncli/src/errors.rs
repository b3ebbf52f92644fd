/*!
Error types for the different layers of [`fncli`][crate].

- [`ConfigError`]: the developer described a function that can't become a
  command line interface. These surface while building a parser, before any
  user input is read.
- [`UsageError`]: the user's tokens didn't fit the interface. Always exit
  code 2, and the target function is never invoked.
- [`ConversionError`]: a single token failed to convert; usually wrapped in a
  [`UsageError`].
- [`BindError`]: parsed values didn't line up with the Rust function they
  were bound to.

Errors raised by the invoked function itself are plain [`anyhow::Error`]s.
[`CallError`] keeps them apart from binding failures, and never alters them.
 */

use std::borrow::Cow;

use joinery::JoinableIterator;

use crate::{signature::ParameterKind, value::ValueKind};

/// A function or choice can't be turned into a command line interface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("parameter {name:?}: parameters of kind {kind} are not supported")]
    UnsupportedKind { name: String, kind: ParameterKind },

    #[error("all choices must share the same type (got {expected} and {found})")]
    MixedChoice { expected: ValueKind, found: ValueKind },

    #[error("choices need at least one value")]
    EmptyChoice,

    #[error("choices of type {0} are not supported")]
    UnsupportedChoiceKind(ValueKind),

    #[error("duplicate parameter name {0:?}")]
    DuplicateParameter(String),

    #[error("parameter {name:?} ({kind}) can't follow parameter {previous:?} ({previous_kind})")]
    Misordered {
        name: String,
        kind: ParameterKind,
        previous: String,
        previous_kind: ParameterKind,
    },

    #[error("variadic parameter {0:?} can't have a default")]
    VariadicDefault(String),

    #[error("option {0} conflicts with the help flag")]
    ConflictingOption(String),

    #[error("duplicate command {0:?}")]
    DuplicateCommand(String),
}

/// A token couldn't be converted by a [`Converter`][crate::Converter].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {converter} value: '{token}'")]
pub struct ConversionError {
    /// The name of the converter that failed (`int`, `bool`, ...)
    pub converter: Cow<'static, str>,

    /// The token exactly as it appeared on the command line
    pub token: String,
}

impl ConversionError {
    pub fn new(converter: impl Into<Cow<'static, str>>, token: impl Into<String>) -> Self {
        Self {
            converter: converter.into(),
            token: token.into(),
        }
    }
}

/// What, specifically, was wrong with the command line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageErrorKind {
    #[error("unrecognized arguments: {}", .0.iter().join_with(" "))]
    Unrecognized(Vec<String>),

    #[error("the following arguments are required: {}", .0.iter().join_with(", "))]
    Required(Vec<String>),

    #[error("argument {argument}: expected one argument")]
    ExpectedArgument { argument: String },

    #[error("argument {argument}: ignored explicit argument '{value}'")]
    UnexpectedArgument { argument: String, value: String },

    #[error("argument {argument}: {error}")]
    Conversion {
        argument: String,
        error: ConversionError,
    },

    #[error("argument {argument}: invalid choice: {value} (choose from {})", .choices.iter().join_with(", "))]
    InvalidChoice {
        argument: String,
        value: String,
        choices: Vec<String>,
    },

    /// `candidates` are complete option strings (`--entropy`)
    #[error("ambiguous option: --{option} could match {}", .candidates.iter().join_with(", "))]
    AmbiguousOption {
        option: String,
        candidates: Vec<String>,
    },

    #[error("argument at position {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },

    /// The parsed values couldn't be read back as the function's argument
    /// types
    #[error("{0}")]
    Bind(BindError),
}

/**
The user's command line didn't match the interface. Displays the way a
conventional argument parser reports errors:

```text
usage: token [-h] [--entropy ENTROPY] [method]
token: error: argument method: invalid choice: 'nope' (choose from 'xkcd', 'short')
```
*/
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{usage}\n{prog}: error: {kind}")]
pub struct UsageError {
    /// The program (and subcommand) name
    pub prog: String,

    /// The one-line synopsis, starting with `usage:`
    pub usage: String,

    pub kind: UsageErrorKind,
}

impl UsageError {
    /// Usage errors always exit with status 2
    pub const EXIT_CODE: u8 = 2;
}

/// The parsing engine stopped without producing values.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// `-h` or `--help` was given; this is the complete help text.
    Help(String),

    /// The tokens were invalid.
    Usage(UsageError),
}

impl From<UsageError> for ParseError {
    fn from(error: UsageError) -> Self {
        Self::Usage(error)
    }
}

/// Parsed values couldn't be bound to a function's parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("no parsed value for parameter {0:?}")]
    Missing(String),

    #[error("variadic parameter {name:?} expected a list, got {found}")]
    NotAList { name: String, found: ValueKind },

    #[error("expected a value of type {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("{value} is out of range for {expected}")]
    OutOfRange { value: i64, expected: &'static str },

    #[error("no more positional arguments in the bound call")]
    PositionalExhausted,

    #[error("no keyword argument {0:?} in the bound call")]
    MissingKeyword(String),
}

/// A [`Function`][crate::Function] body failed.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The bound call didn't match the body's expectations. This is reported
    /// as a usage error; the wrapped function never ran.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The wrapped function itself returned an error
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}
