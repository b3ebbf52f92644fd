//! Functions described with `#[fncli::command]`.

use std::path::PathBuf;

use fncli::{
    Command, CommandSet, ConfigError, Dispatch as _, Outcome, ParameterKind, Value,
    errors::{BindError, UsageErrorKind},
};

/// Generate a token.
///
/// Tokens are not random here.
#[fncli::command]
fn token(
    #[arg(choices = ["xkcd", "short"], default = "xkcd", help = "how to build the token")]
    method: String,
    #[arg(keyword, default = 70)] entropy: i64,
    #[arg(keyword, default = false)] verbose: bool,
) -> String {
    match verbose {
        true => format!("{method} token with {entropy} bits"),
        false => format!("{method}:{entropy}"),
    }
}

#[fncli::command]
fn add(a: f64, b: f64) -> f64 {
    a + b
}

#[fncli::command]
fn join(first: String, #[arg(rest)] others: Vec<i64>, #[arg(keyword, default = ",")] sep: String) -> String {
    std::iter::once(first)
        .chain(others.iter().map(i64::to_string))
        .collect::<Vec<_>>()
        .join(&sep)
}

#[fncli::command]
fn echo(#[arg(rest, raw)] words: Vec<String>) -> Vec<String> {
    words
}

#[fncli::command]
fn anything(value: Value) -> Value {
    value
}

#[fncli::command(name = "check-path")]
fn check_path(path: PathBuf) -> anyhow::Result<()> {
    anyhow::ensure!(path.is_relative(), "{} is absolute", path.display());
    Ok(())
}

#[fncli::command]
fn small(#[arg(keyword)] n: u8) -> u8 {
    n
}

#[fncli::command]
fn options(value: i64, #[arg(keywords)] extra: Value) -> i64 {
    let _ = extra;
    value
}

#[fncli::command]
fn r#type(r#in: String) -> String {
    r#in
}

#[test]
fn signature_follows_the_function() {
    let function = token_command().unwrap();

    assert_eq!(function.name(), "token");
    assert_eq!(
        function.description(),
        Some("Generate a token.\n\nTokens are not random here.")
    );
    assert_eq!(function.summary(), Some("Generate a token."));

    let parameters = function.signature().parameters();
    let kinds: Vec<_> = parameters.iter().map(|p| (p.name(), p.kind())).collect();
    assert_eq!(
        kinds,
        [
            ("method", ParameterKind::PositionalOptional),
            ("entropy", ParameterKind::KeywordOptional),
            ("verbose", ParameterKind::KeywordOptional),
        ]
    );
    assert_eq!(parameters[0].help(), Some("how to build the token"));
    assert_eq!(parameters[1].default(), Some(&Value::Int(70)));
}

#[test]
fn invoking_a_derived_command() {
    let command = Command::new("token", token_command().unwrap()).unwrap();

    assert!(matches!(
        command.invoke([]),
        Outcome::Returned(Some(Value::Str(ref token))) if token == "xkcd:70"
    ));
    assert!(matches!(
        command.invoke(["short", "--entropy", "40", "--verbose"]),
        Outcome::Returned(Some(Value::Str(ref token))) if token == "short token with 40 bits"
    ));

    assert_eq!(command.invoke(["long"]).exit_code(), Some(2));
    assert_eq!(command.invoke(["--entropy", "lots"]).exit_code(), Some(2));

    match command.invoke(["-h"]) {
        Outcome::Help(text) => {
            assert!(text.starts_with("usage: token [-h] [--entropy ENTROPY] [--verbose] [method]\n"));
            assert!(text.contains("how to build the token {xkcd,short} [default: xkcd]"));
        }
        other => panic!("expected help, got {other:?}"),
    }
}

#[test]
fn typed_parameters_convert_strictly() {
    let command = Command::new("add", add_command().unwrap()).unwrap();

    assert!(matches!(command.invoke(["1", "2.5"]), Outcome::Returned(Some(Value::Float(x))) if x == 3.5));

    match command.invoke(["1", "two"]) {
        Outcome::Usage(error) => {
            assert_eq!(error.kind.to_string(), "argument b: invalid float value: 'two'");
        }
        other => panic!("expected a usage error, got {other:?}"),
    }
}

#[test]
fn variadics_and_keywords() {
    let command = Command::new("join", join_command().unwrap()).unwrap();

    assert!(matches!(
        command.invoke(["a", "1", "2", "--sep", "+"]),
        Outcome::Returned(Some(Value::Str(ref joined))) if joined == "a+1+2"
    ));
    assert!(matches!(
        command.invoke(["only"]),
        Outcome::Returned(Some(Value::Str(ref joined))) if joined == "only"
    ));
    assert_eq!(command.invoke(["a", "b"]).exit_code(), Some(2));
}

#[test]
fn raw_parameters_are_never_converted() {
    let command = Command::new("echo", echo_command().unwrap()).unwrap();

    match command.invoke(["1", "2.0", "x"]) {
        Outcome::Returned(Some(value)) => {
            assert_eq!(value, Value::from(vec!["1", "2.0", "x"]));
        }
        other => panic!("expected a return value, got {other:?}"),
    }
}

#[test]
fn unannotated_values_are_coerced() {
    let command = Command::new("anything", anything_command().unwrap()).unwrap();

    assert!(matches!(command.invoke(["7"]), Outcome::Returned(Some(Value::Int(7)))));
    assert!(matches!(
        command.invoke(["seven"]),
        Outcome::Returned(Some(Value::Str(ref s))) if s == "seven"
    ));
}

#[test]
fn renamed_commands_and_application_errors() {
    let function = check_path_command().unwrap();
    assert_eq!(function.name(), "check-path");

    let commands = CommandSet::new("demo").add(function).unwrap();

    assert!(matches!(commands.invoke(["check-path", "a/b"]), Outcome::Returned(None)));
    match commands.invoke(["check-path", "/a/b"]) {
        Outcome::Failed(error) => assert_eq!(error.to_string(), "/a/b is absolute"),
        other => panic!("expected an application error, got {other:?}"),
    }
}

#[test]
fn out_of_range_integers() {
    let command = Command::new("small", small_command().unwrap()).unwrap();

    assert!(matches!(command.invoke(["-n", "255"]), Outcome::Returned(Some(Value::Int(255)))));

    match command.invoke(["-n", "256"]) {
        Outcome::Usage(error) => assert_eq!(error.kind.to_string(), "argument -n: invalid u8 value: '256'"),
        other => panic!("expected a usage error, got {other:?}"),
    }
}

#[test]
fn keyword_variadics_fail_at_build_time() {
    let function = options_command().unwrap();

    assert!(matches!(
        Command::new("options", function),
        Err(ConfigError::UnsupportedKind { kind: ParameterKind::VariadicKeyword, .. })
    ));
}

#[test]
fn raw_identifiers_are_unraw_names() {
    let function = type_command().unwrap();
    assert_eq!(function.name(), "type");
    assert_eq!(function.signature().parameters()[0].name(), "in");

    let command = Command::new("type", function).unwrap();
    assert!(matches!(
        command.invoke(["x"]),
        Outcome::Returned(Some(Value::Str(ref s))) if s == "x"
    ));
}

#[test]
fn bind_errors_mention_the_expected_type() {
    let error = BindError::WrongType {
        expected: "int",
        found: fncli::ValueKind::Str,
    };
    let kind = UsageErrorKind::Bind(error);

    assert_eq!(kind.to_string(), "expected a value of type int, got str");
}
