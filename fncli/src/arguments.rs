use std::ffi::OsString;

use crate::errors::UsageErrorKind;

/// Helper type for loading arguments from the environment. Usually
/// [`Dispatch::run`][crate::Dispatch::run] is all you need.
///
/// This type exists to be an owned container for the process arguments
/// that the token slices handed to a parser can borrow from.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<OsString>,
}

impl LoadedArguments {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            arguments: std::env::args_os().collect(),
        }
    }

    /// Arguments from somewhere else; the first one is the program name.
    #[must_use]
    pub fn new(arguments: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// The arguments after the program name. Fails on the first one that
    /// isn't valid UTF-8, with its 1-based position.
    pub fn tokens(&self) -> Result<Vec<&str>, UsageErrorKind> {
        self.arguments
            .iter()
            .enumerate()
            .skip(1)
            .map(|(position, argument)| {
                argument
                    .to_str()
                    .ok_or(UsageErrorKind::InvalidUtf8 { position })
            })
            .collect()
    }
}
