#![no_std]

/*!
Low-level classification of command-line tokens. Takes care of distinctions
between flags, options, and positionals, that sort of thing. No type handling
happens here; deciding what a token *means* is left to a [`Visitor`].
*/

use ::core::fmt::{self, Debug};

/**
A single, raw token passed in from the command line.

This type is used in two ways: to indicate the names of options, and to
indicate arguments themselves. For instance, given
`--entropy 70 --method=xkcd input.txt`, `entropy`, `70`, `method`, `xkcd`, and
`input.txt` would all be passed as [`Arg`] values to the relevant visitor
methods.

Tokens are always valid UTF-8 by the time they get here; the caller is
responsible for rejecting anything else before lexing starts.
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Arg<'arg>(&'arg str);

impl<'arg> Arg<'arg> {
    #[inline]
    #[must_use]
    pub const fn new(token: &'arg str) -> Self {
        Self(token)
    }

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'arg str {
        self.0
    }
}

impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.0, f)
    }
}

impl PartialEq<str> for Arg<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/**
The [`Lexer`] type operates by passing the tokens it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional argument.
    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value;

    /// A long option that definitely has an argument, because it was given
    /// as `--option=argument`
    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value;

    /// A long option or flag, such as `--option`
    fn visit_long(self, option: Arg<'arg>, arg: impl ArgAccess<'arg>) -> Self::Value;

    /// A short option or flag, such as `-o`
    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given option needs an argument,
based on the identity of the option.

Consider `--foo bar`. Is this a pair of tokens (the flag `--foo` and the
positional argument `bar`) or a single option `--foo bar` that takes an
argument? The [`Lexer`] can't independently classify a given token, so
instead, a visitor requests an argument via this trait only for options that
need one, and the [`Lexer`] takes care of determining where that argument
comes from.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get an argument from the lexer. This should only be called by options that
    need it; flags should simply ignore it, so that the next token is
    classified independently.

    This returns [`None`] if all of the tokens have been exhausted, or if
    only positional arguments remain (because a raw `--` was seen).
    */
    fn take(self) -> Option<Arg<'arg>>;
}

#[derive(Debug, Clone)]
enum State<'arg> {
    Ready,
    PositionalOnly,

    // Always non-empty
    ShortInProgress(&'arg str),
}

/**
A `Lexer` is the main entry point into `fncli_lexer`. It classifies one
token in each call to [`next_arg`][Lexer::next_arg], sending the result to
the given [`Visitor`]. It handles distinguishing flags, options, and
positionals; logic related to how options get their argument values; and
the `--` separator.

Tokens that look like negative numbers (`-5`, `-1e6`, `-.5`) are always
positional, since an option name can never start with a digit.
*/
#[derive(Debug, Clone)]
pub struct Lexer<'arg, I> {
    state: State<'arg>,
    args: I,
}

impl<'arg, I> Lexer<'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`Lexer`] from an iterator of tokens. This list should
    *exclude* the name of the program, which is commonly passed as the first
    argument in the process argument vector.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            state: State::Ready,
            args: args.into_iter(),
        }
    }

    /// Put `self` into a `PositionalOnly` state, then process a positional
    /// argument
    #[inline]
    fn positional_only_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        debug_assert!(!matches!(self.state, State::ShortInProgress(_)));

        self.state = State::PositionalOnly;
        self.args
            .next()
            .map(Arg)
            .map(|arg| visitor.visit_positional(arg))
    }

    /// Put `self` into a `Ready` state, then return a StandardArgAccess
    #[inline]
    fn standard_arg(&mut self) -> StandardArgAccess<'_, 'arg, I> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::Ready;
        StandardArgAccess { parent: self }
    }

    /// Put `self` into a `ShortInProgress` state, then return a ShortArgAccess.
    /// `short` must be non-empty.
    #[inline]
    fn short_arg(&mut self, short: &'arg str) -> ShortArgAccess<'_, 'arg> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));
        debug_assert!(!short.is_empty());

        self.state = State::ShortInProgress(short);
        ShortArgAccess {
            short,
            state: &mut self.state,
        }
    }

    /// Handle getting the argument for a `-s` short option. If there is
    /// remaining content in the short, it's a candidate for the argument;
    /// otherwise, the next token is the candidate.
    #[inline]
    fn handle_short_argument<V>(&mut self, option: char, rest: &'arg str, visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        match rest.is_empty() {
            true => visitor.visit_short(option, self.standard_arg()),
            false => visitor.visit_short(option, self.short_arg(rest)),
        }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        match self.state {
            State::Ready => match self.args.next()? {
                "--" => self.positional_only_arg(visitor),
                token => Some(match token.strip_prefix("--") {
                    Some(option) => match split_once(option, b'=') {
                        Some((option, argument)) => {
                            visitor.visit_long_option(Arg(option), Arg(argument))
                        }
                        None => visitor.visit_long(Arg(option), self.standard_arg()),
                    },
                    None => match token.strip_prefix('-').and_then(split_first_char) {
                        None => visitor.visit_positional(Arg(token)),
                        Some((option, _)) if starts_numeric(option, token) => {
                            visitor.visit_positional(Arg(token))
                        }
                        Some((option, rest)) => self.handle_short_argument(option, rest, visitor),
                    },
                }),
            },
            State::PositionalOnly => self.positional_only_arg(visitor),
            State::ShortInProgress(short) => Some(match split_first_char(short) {
                Some((option, rest)) => self.handle_short_argument(option, rest, visitor),
                None => unreachable!("short cluster in progress is never empty"),
            }),
        }
    }
}

/// ArgAccess implementation that gets the next token from the list.
/// Handles logic around `--` PositionalOnly arguments.
struct StandardArgAccess<'a, 'arg, I> {
    parent: &'a mut Lexer<'arg, I>,
}

impl<'arg, I> ArgAccess<'arg> for StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    fn take(self) -> Option<Arg<'arg>> {
        match self.parent.args.next()? {
            "--" if !matches!(self.parent.state, State::PositionalOnly) => {
                self.parent.state = State::PositionalOnly;
                None
            }
            arg => Some(Arg(arg)),
        }
    }
}

/// ArgAccess implementation that gets the remainder of a short cluster.
/// Handles things like `-nvalue` and `-n=value`, which are both equivalent
/// to `-n value`.
struct ShortArgAccess<'a, 'arg> {
    short: &'arg str,
    state: &'a mut State<'arg>,
}

impl<'arg> ArgAccess<'arg> for ShortArgAccess<'_, 'arg> {
    fn take(self) -> Option<Arg<'arg>> {
        debug_assert!(matches!(*self.state, State::ShortInProgress(short) if short == self.short));

        *self.state = State::Ready;
        Some(Arg(self.short.strip_prefix('=').unwrap_or(self.short)))
    }
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // `delimiter` is ASCII, so both halves remain on char boundaries
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}

fn split_first_char(input: &str) -> Option<(char, &str)> {
    let c = input.chars().next()?;
    Some((c, &input[c.len_utf8()..]))
}

/// `-5`, `-1e6` and `-.5` are numbers, not short options
fn starts_numeric(first: char, token: &str) -> bool {
    first.is_ascii_digit()
        || (first == '.' && token[2..].starts_with(|c: char| c.is_ascii_digit()))
}
