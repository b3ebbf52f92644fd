/*!
Top-level orchestration: build parsers for functions, parse tokens, bind
the results, invoke the function, and decide what the process should do
about it.

Nothing here exits the process. [`Dispatch::invoke`] returns an
[`Outcome`]; [`Outcome::report`] prints it and hands back the exit code,
leaving the actual exit to `main`.

```no_run
use std::process::ExitCode;

use fncli::{Command, Dispatch, Function};

# fn token_command() -> Result<Function, fncli::ConfigError> { unimplemented!() }
fn main() -> anyhow::Result<ExitCode> {
    Command::new("token", token_command()?)?.run()
}
```
 */

use std::{
    io::{self, Write as _},
    process::ExitCode,
};

use crate::{
    arguments::LoadedArguments,
    bind::bind,
    errors::{CallError, ConfigError, ParseError, UsageError, UsageErrorKind},
    function::Function,
    help::{CommandSummary, CommandsHelp, CommandsUsage},
    mapper::{MapperOptions, map_signature},
    namespace::Namespace,
    engine::Parser,
    value::Value,
};

/// What happened when a command line was dispatched.
#[derive(Debug)]
pub enum Outcome {
    /// The function ran, and returned this
    Returned(Option<Value>),

    /// Help was requested; this is the text
    Help(String),

    /// The command line was invalid; the function never ran
    Usage(UsageError),

    /// The function ran, and failed
    Failed(anyhow::Error),
}

impl Outcome {
    /// The process exit code for this outcome. Application errors have
    /// none; what to do with them is up to the caller.
    #[must_use]
    pub fn exit_code(&self) -> Option<u8> {
        match self {
            Outcome::Returned(_) | Outcome::Help(_) => Some(0),
            Outcome::Usage(_) => Some(UsageError::EXIT_CODE),
            Outcome::Failed(_) => None,
        }
    }

    /// Print the outcome: return values and help to stdout, usage errors to
    /// stderr. Application errors are returned untouched.
    pub fn report(self) -> anyhow::Result<ExitCode> {
        match self {
            Outcome::Returned(None) => {}
            Outcome::Returned(Some(value)) => writeln!(io::stdout().lock(), "{value}")?,
            Outcome::Help(text) => write!(io::stdout().lock(), "{text}")?,
            Outcome::Usage(error) => {
                writeln!(io::stderr().lock(), "{error}")?;
                return Ok(ExitCode::from(UsageError::EXIT_CODE));
            }
            Outcome::Failed(error) => return Err(error),
        }

        Ok(ExitCode::SUCCESS)
    }
}

impl From<ParseError> for Outcome {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Help(text) => Outcome::Help(text),
            ParseError::Usage(error) => Outcome::Usage(error),
        }
    }
}

/// Something that can take a command line and act on it.
pub trait Dispatch {
    /// Attach this dispatcher's usage to an error that happened outside of
    /// parsing.
    fn error(&self, kind: UsageErrorKind) -> UsageError;

    /// Parse `tokens` (excluding the program name), and call the selected
    /// function with them.
    fn invoke<'arg>(&self, tokens: impl IntoIterator<Item = &'arg str>) -> Outcome;

    /// Invoke with the process arguments, and report the outcome.
    fn run(&self) -> anyhow::Result<ExitCode> {
        let arguments = LoadedArguments::from_env();

        let outcome = match arguments.tokens() {
            Ok(tokens) => self.invoke(tokens),
            Err(kind) => Outcome::Usage(self.error(kind)),
        };

        outcome.report()
    }
}

/// Bind parsed values and call `function`. Bind failures are turned into
/// usage errors with `usage_error`.
fn call(
    function: &Function,
    namespace: &Namespace,
    usage_error: impl FnOnce(UsageErrorKind) -> UsageError,
) -> Outcome {
    let result = bind(namespace, function.signature().parameters())
        .map_err(CallError::Bind)
        .and_then(|call| function.call(call));

    match result {
        Ok(value) => Outcome::Returned(value),
        Err(CallError::Bind(error)) => Outcome::Usage(usage_error(UsageErrorKind::Bind(error))),
        Err(CallError::Failed(error)) => Outcome::Failed(error),
    }
}

/**
A single function as a command line program.
*/
#[derive(Debug, Clone)]
pub struct Command {
    function: Function,
    parser: Parser,
}

impl Command {
    /// Map `function` with the default [`MapperOptions`].
    pub fn new(prog: impl Into<String>, function: Function) -> Result<Self, ConfigError> {
        Self::with_options(prog, function, &MapperOptions::default())
    }

    pub fn with_options(
        prog: impl Into<String>,
        function: Function,
        options: &MapperOptions,
    ) -> Result<Self, ConfigError> {
        let prog = prog.into();
        let (specs, _) = map_signature(function.signature(), options)?;

        tracing::debug!(%prog, function = function.name(), arguments = specs.len(), "built parser");

        let parser = Parser::new(prog, function.description().map(str::to_owned), specs);
        Ok(Self { function, parser })
    }

    /// Accept unambiguous prefixes of long options. On by default.
    #[must_use]
    pub fn allow_abbrev(self, allow_abbrev: bool) -> Self {
        Self {
            parser: self.parser.allow_abbrev(allow_abbrev),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn function(&self) -> &Function {
        &self.function
    }

    #[inline]
    #[must_use]
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn parse<'arg>(
        &self,
        tokens: impl IntoIterator<Item = &'arg str>,
    ) -> Result<Namespace, ParseError> {
        self.parser.parse(tokens)
    }
}

impl Dispatch for Command {
    fn error(&self, kind: UsageErrorKind) -> UsageError {
        self.parser.error(kind)
    }

    fn invoke<'arg>(&self, tokens: impl IntoIterator<Item = &'arg str>) -> Outcome {
        let _span = tracing::debug_span!("invoke", function = self.function.name()).entered();

        match self.parser.parse(tokens) {
            Ok(namespace) => call(&self.function, &namespace, |kind| self.parser.error(kind)),
            Err(error) => error.into(),
        }
    }
}

/**
Several functions as subcommands of one program: `prog <command> [args]`.

Each command's parser is built exactly as a [`Command`] would be, named
`prog command`. Parameter names only need to be unique within each
function.
*/
#[derive(Debug, Clone)]
pub struct CommandSet {
    prog: String,
    description: Option<String>,
    options: MapperOptions,
    commands: Vec<Command>,
}

impl CommandSet {
    #[must_use]
    pub fn new(prog: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            description: None,
            options: MapperOptions::default(),
            commands: Vec::new(),
        }
    }

    /// Description for the top-level help text
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    /// Options for every command added after this
    #[must_use]
    pub fn with_options(self, options: MapperOptions) -> Self {
        Self { options, ..self }
    }

    /// Add a function as a command, named after the function.
    pub fn add(mut self, function: Function) -> Result<Self, ConfigError> {
        if self.find(function.name()).is_some() {
            return Err(ConfigError::DuplicateCommand(function.name().to_owned()));
        }

        let prog = format!("{} {}", self.prog, function.name());
        self.commands
            .push(Command::with_options(prog, function, &self.options)?);

        Ok(self)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.function.name() == name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    fn summaries(&self) -> Vec<CommandSummary<'_>> {
        self.commands
            .iter()
            .map(|command| CommandSummary {
                name: command.function.name(),
                summary: command.function.summary(),
            })
            .collect()
    }

    #[must_use]
    pub fn usage(&self) -> String {
        CommandsUsage {
            prog: &self.prog,
            commands: &self.summaries(),
        }
        .to_string()
    }

    #[must_use]
    pub fn help(&self) -> String {
        CommandsHelp {
            prog: &self.prog,
            description: self.description.as_deref(),
            commands: &self.summaries(),
        }
        .to_string()
    }

    /**
    Select a command with the first token, then parse the rest with that
    command's parser. The namespace records the selected command.

    Options before the command name aren't accepted, other than `-h` and
    `--help`.
    */
    pub fn parse<'arg>(
        &self,
        tokens: impl IntoIterator<Item = &'arg str>,
    ) -> Result<Namespace, ParseError> {
        let mut tokens = tokens.into_iter();
        let mut leading = Vec::new();

        let name = loop {
            match tokens.next() {
                None => break None,
                Some("-h" | "--help") => return Err(ParseError::Help(self.help())),
                Some("--") => break tokens.next(),
                Some(token) if token.starts_with('-') && token != "-" => {
                    leading.push(token.to_owned());
                }
                Some(token) => break Some(token),
            }
        };

        let name = name.ok_or_else(|| self.error(UsageErrorKind::Required(vec!["command".to_owned()])))?;

        if !leading.is_empty() {
            return Err(self.error(UsageErrorKind::Unrecognized(leading)).into());
        }

        let command = self.find(name).ok_or_else(|| {
            self.error(UsageErrorKind::InvalidChoice {
                argument: "command".to_owned(),
                value: Value::from(name).repr().to_string(),
                choices: self
                    .commands
                    .iter()
                    .map(|command| Value::from(command.function.name()).repr().to_string())
                    .collect(),
            })
        })?;

        tracing::debug!(command = name, "selected command");

        let mut namespace = command.parse(tokens)?;
        namespace.select(name, command.function.clone());
        Ok(namespace)
    }
}

impl Dispatch for CommandSet {
    fn error(&self, kind: UsageErrorKind) -> UsageError {
        UsageError {
            prog: self.prog.clone(),
            usage: self.usage(),
            kind,
        }
    }

    fn invoke<'arg>(&self, tokens: impl IntoIterator<Item = &'arg str>) -> Outcome {
        let _span = tracing::debug_span!("invoke", prog = %self.prog).entered();

        let namespace = match self.parse(tokens) {
            Ok(namespace) => namespace,
            Err(error) => return error.into(),
        };

        // `parse` always selects a command on success
        match namespace.function() {
            Some(function) => call(function, &namespace, |kind| {
                match namespace.command().and_then(|name| self.find(name)) {
                    Some(command) => command.parser.error(kind),
                    None => self.error(kind),
                }
            }),
            None => Outcome::Usage(self.error(UsageErrorKind::Required(vec!["command".to_owned()]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::BindError,
        signature::{Parameter, Signature},
    };

    fn echo() -> Function {
        let signature = Signature::new([Parameter::positional("word")]).unwrap();

        Function::new("echo", signature, |call| {
            let word: Value = call.reader().positional()?;
            Ok(Some(word))
        })
        .with_description("Print a word.")
    }

    fn fail() -> Function {
        Function::new("fail", Signature::default(), |_| {
            Err(anyhow::anyhow!("application error").into())
        })
    }

    #[test]
    fn single_command() {
        let command = Command::new("echo", echo()).unwrap();

        let outcome = command.invoke(["hello"]);
        assert!(matches!(outcome, Outcome::Returned(Some(ref value)) if value == &Value::from("hello")));
        assert_eq!(outcome.exit_code(), Some(0));

        assert_eq!(command.invoke(["-h"]).exit_code(), Some(0));
        assert_eq!(command.invoke([]).exit_code(), Some(2));
    }

    #[test]
    fn application_errors_pass_through() {
        let command = Command::new("fail", fail()).unwrap();

        match command.invoke([]) {
            Outcome::Failed(error) => assert_eq!(error.to_string(), "application error"),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[test]
    fn bind_errors_are_usage_errors() {
        let signature = Signature::new([Parameter::positional("n")]).unwrap();
        let function = Function::new("typed", signature, |call| {
            let n: i64 = call.reader().positional()?;
            Ok(Some(Value::Int(n)))
        });

        let command = Command::new("typed", function).unwrap();

        match command.invoke(["word"]) {
            Outcome::Usage(error) => assert!(matches!(
                error.kind,
                UsageErrorKind::Bind(BindError::WrongType { .. })
            )),
            other => panic!("expected a usage error, got {other:?}"),
        }
    }

    #[test]
    fn command_set() {
        let commands = CommandSet::new("demo")
            .add(echo())
            .unwrap()
            .add(fail())
            .unwrap();

        assert_eq!(commands.invoke(["-h"]).exit_code(), Some(0));
        assert_eq!(commands.invoke(["echo", "--help"]).exit_code(), Some(0));
        assert_eq!(commands.invoke([]).exit_code(), Some(2));
        assert_eq!(commands.invoke(["nope"]).exit_code(), Some(2));
        assert_eq!(commands.invoke(["--verbose", "echo", "x"]).exit_code(), Some(2));

        let namespace = commands.parse(["echo", "hi"]).unwrap();
        assert_eq!(namespace.command(), Some("echo"));
        assert_eq!(namespace.get("word"), Some(&Value::from("hi")));

        assert!(matches!(
            commands.invoke(["echo", "hi"]),
            Outcome::Returned(Some(Value::Str(ref word))) if word == "hi"
        ));
    }

    #[test]
    fn command_set_calls_the_selected_function() {
        let signature = Signature::new([Parameter::positional("n")]).unwrap();
        let typed = Function::new("typed", signature, |call| {
            let n: i64 = call.reader().positional()?;
            Ok(Some(Value::Int(n)))
        });

        let commands = CommandSet::new("demo")
            .add(echo())
            .unwrap()
            .add(typed)
            .unwrap();

        let namespace = commands.parse(["typed", "4"]).unwrap();
        assert_eq!(namespace.function().map(Function::name), Some("typed"));

        assert!(matches!(
            commands.invoke(["typed", "4"]),
            Outcome::Returned(Some(Value::Int(4)))
        ));

        match commands.invoke(["typed", "four"]) {
            Outcome::Usage(error) => {
                assert_eq!(error.prog, "demo typed");
                assert!(error.usage.starts_with("usage: demo typed [-h] n"));
                assert!(matches!(
                    error.kind,
                    UsageErrorKind::Bind(BindError::WrongType { .. })
                ));
            }
            other => panic!("expected a usage error, got {other:?}"),
        }
    }

    #[test]
    fn command_set_errors() {
        let commands = CommandSet::new("demo").add(echo()).unwrap();

        let Err(ParseError::Usage(error)) = commands.parse([]) else {
            panic!("expected a usage error");
        };
        assert_eq!(
            error.to_string(),
            "usage: demo [-h] {echo} ...\ndemo: error: the following arguments are required: command"
        );

        let Err(ParseError::Usage(error)) = commands.parse(["nope"]) else {
            panic!("expected a usage error");
        };
        assert_eq!(
            error.kind.to_string(),
            "argument command: invalid choice: 'nope' (choose from 'echo')"
        );

        let Err(ParseError::Usage(error)) = commands.parse(["echo"]) else {
            panic!("expected a usage error");
        };
        assert_eq!(error.prog, "demo echo");

        assert_eq!(
            commands.add(echo()).unwrap_err(),
            ConfigError::DuplicateCommand("echo".to_owned())
        );
    }
}
