/*!
Declarative argument specifications: the contract between the
[mapper][crate::mapper] and the [parsing engine][crate::engine].
 */

use core::fmt::{self, Display};

use heck::ToShoutySnakeCase as _;

use crate::{convert::Converter, value::Value};

/// How an argument is written on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentName {
    /// Given by position; no dashes
    Positional(String),

    /// `--name`
    Long(String),

    /// `-n`
    Short(char),
}

impl ArgumentName {
    /// Keyword-only parameters get `--name`, or `-n` if the name is a
    /// single character.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        let mut chars = name.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => ArgumentName::Short(c),
            _ => ArgumentName::Long(name.to_owned()),
        }
    }

    /// The long tag, if any
    #[must_use]
    pub fn long(&self) -> Option<&str> {
        match self {
            ArgumentName::Long(long) => Some(long),
            _ => None,
        }
    }

    /// The short tag, if any
    #[must_use]
    pub fn short(&self) -> Option<char> {
        match *self {
            ArgumentName::Short(short) => Some(short),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self, ArgumentName::Positional(_))
    }
}

impl Display for ArgumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentName::Positional(name) => f.write_str(name),
            ArgumentName::Long(long) => write!(f, "--{long}"),
            ArgumentName::Short(short) => write!(f, "-{short}"),
        }
    }
}

/// How many tokens an argument consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// A flag: consumes nothing, and stores this value when present
    Flag(Value),

    ExactlyOne,
    ZeroOrOne,
    ZeroOrMore,
}

/// Everything the parsing engine needs to know about one argument.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    /// The parameter name; parsed values are stored under this key
    pub dest: String,
    pub name: ArgumentName,
    pub arity: Arity,
    pub required: bool,

    /// Used as-is when the argument is absent; never converted
    pub default: Option<Value>,
    pub converter: Converter,

    /// If given, converted values must be one of these
    pub choices: Option<Vec<Value>>,
    pub help: Option<String>,
}

impl ArgumentSpec {
    /// The placeholder shown in usage messages: the bare name for
    /// positionals, `SHOUTY_CASE` for options.
    #[must_use]
    pub fn placeholder(&self) -> String {
        match self.name {
            ArgumentName::Positional(ref name) => name.clone(),
            _ => self.dest.to_shouty_snake_case(),
        }
    }

    #[must_use]
    pub fn takes_value(&self) -> bool {
        !matches!(self.arity, Arity::Flag(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_names() {
        assert_eq!(ArgumentName::keyword("n"), ArgumentName::Short('n'));
        assert_eq!(
            ArgumentName::keyword("entropy"),
            ArgumentName::Long("entropy".to_owned())
        );
        assert_eq!(ArgumentName::keyword("n").to_string(), "-n");
        assert_eq!(ArgumentName::keyword("dry_run").to_string(), "--dry_run");
    }
}
