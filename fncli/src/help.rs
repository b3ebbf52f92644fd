/*!
Usage synopses and full help text, rendered from argument specifications.

Both are [`Display`] types that borrow their inputs, so rendering costs
nothing until the text is actually needed.
 */

use core::fmt::{self, Display};

use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::{
    printers::{describe, maybe_section, paragraph, section},
    spec::{ArgumentSpec, Arity},
};

const HELP_DESCRIPTION: &str = "show this help message and exit";

/// How an argument appears in a usage synopsis: `[--entropy ENTROPY]`,
/// `-k K`, `a`, `[b]`, `[rest ...]`.
fn synopsis(spec: &ArgumentSpec) -> impl Display + '_ {
    let name = &spec.name;
    let placeholder = spec.placeholder();

    lazy_format!(match ((&spec.arity, name.is_positional(), spec.required)) {
        (Arity::Flag(_), _, true) => "{name}",
        (Arity::Flag(_), _, false) => "[{name}]",
        (Arity::ExactlyOne, true, _) => "{placeholder}",
        (Arity::ZeroOrOne, true, _) => "[{placeholder}]",
        (Arity::ZeroOrMore, true, _) => "[{placeholder} ...]",
        (_, false, true) => "{name} {placeholder}",
        (_, false, false) => "[{name} {placeholder}]",
    })
}

/// The item column of an argument's help entry
fn entry(spec: &ArgumentSpec) -> impl Display + '_ {
    let name = &spec.name;
    let placeholder = spec.placeholder();

    lazy_format!(match ((&spec.arity, name.is_positional())) {
        (_, true) => "{placeholder}",
        (Arity::Flag(_), false) => "{name}",
        (_, false) => "{name} {placeholder}",
    })
}

/// The description column of an argument's help entry: its help text, the
/// accepted choices, and its default.
fn entry_description(spec: &ArgumentSpec) -> String {
    let help = spec.help.iter().filter(|help| !help.is_empty()).cloned();

    let choices = spec
        .choices
        .as_ref()
        .map(|choices| format!("{{{}}}", choices.iter().join_with(",")));

    let default = spec
        .default
        .as_ref()
        .filter(|_| spec.takes_value())
        .map(|default| format!("[default: {default}]"));

    help.chain(choices).chain(default).join_with(" ").to_string()
}

/// `usage: prog [-h] [--entropy ENTROPY] [method]`
///
/// Options are listed before positionals, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct Usage<'a> {
    pub prog: &'a str,
    pub specs: &'a [ArgumentSpec],
}

impl Display for Usage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usage: {} [-h]", self.prog)?;

        let (positionals, options): (Vec<&ArgumentSpec>, Vec<&ArgumentSpec>) = self
            .specs
            .iter()
            .partition(|spec| spec.name.is_positional());

        options
            .iter()
            .chain(&positionals)
            .try_for_each(|spec| write!(f, " {}", synopsis(spec)))
    }
}

/// The complete help message for a single parser.
#[derive(Debug, Clone, Copy)]
pub struct Help<'a> {
    pub prog: &'a str,
    pub description: Option<&'a str>,
    pub specs: &'a [ArgumentSpec],
}

impl Display for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            Usage {
                prog: self.prog,
                specs: self.specs,
            }
        )?;

        if let Some(description) = self.description {
            write!(f, "\n{}\n", paragraph(description))?;
        }

        let positionals = self.specs.iter().filter(|spec| spec.name.is_positional());
        let options = self.specs.iter().filter(|spec| !spec.name.is_positional());

        maybe_section(f, "Arguments", positionals, |out, spec| {
            describe(out, entry(spec), &entry_description(spec))
        })?;

        section(f, "Options", |mut out| {
            describe(&mut out, "-h, --help", HELP_DESCRIPTION)?;

            for spec in options {
                describe(&mut out, entry(spec), &entry_description(spec))?;
            }

            Ok(())
        })
    }
}

/// A single entry in a [`CommandsHelp`] listing
#[derive(Debug, Clone, Copy)]
pub struct CommandSummary<'a> {
    pub name: &'a str,
    pub summary: Option<&'a str>,
}

/// `usage: prog [-h] {token,roll} ...`
#[derive(Debug, Clone, Copy)]
pub struct CommandsUsage<'a> {
    pub prog: &'a str,
    pub commands: &'a [CommandSummary<'a>],
}

impl Display for CommandsUsage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usage: {} [-h] {{{}}} ...",
            self.prog,
            self.commands.iter().map(|command| command.name).join_with(",")
        )
    }
}

/// The top-level help message in multi-command mode.
#[derive(Debug, Clone, Copy)]
pub struct CommandsHelp<'a> {
    pub prog: &'a str,
    pub description: Option<&'a str>,
    pub commands: &'a [CommandSummary<'a>],
}

impl Display for CommandsHelp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            CommandsUsage {
                prog: self.prog,
                commands: self.commands,
            }
        )?;

        if let Some(description) = self.description {
            write!(f, "\n{}\n", paragraph(description))?;
        }

        maybe_section(f, "Commands", self.commands, |out, command| {
            describe(out, command.name, command.summary.unwrap_or_default())
        })?;

        section(f, "Options", |mut out| {
            describe(&mut out, "-h, --help", HELP_DESCRIPTION)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        choice::Choice,
        mapper::{MapperOptions, map_signature},
        signature::{Annotation, Parameter, Signature},
    };

    fn token_specs() -> Vec<ArgumentSpec> {
        let signature = Signature::new([
            Parameter::positional("method")
                .with_default("xkcd")
                .with_annotation(Choice::new(["xkcd", "short"]).unwrap())
                .with_help("how to generate the token"),
            Parameter::keyword("entropy").with_default(70),
            Parameter::keyword("verbose")
                .with_default(false)
                .with_annotation(Annotation::Bool),
        ])
        .unwrap();

        map_signature(&signature, &MapperOptions::default())
            .unwrap()
            .0
    }

    #[test]
    fn entry_descriptions() {
        let specs = token_specs();

        assert_eq!(
            entry_description(&specs[0]),
            "how to generate the token {xkcd,short} [default: xkcd]"
        );
        assert_eq!(entry_description(&specs[1]), "[default: 70]");
        // Flags never show their default
        assert_eq!(entry_description(&specs[2]), "");
    }

    #[test]
    fn usage_line() {
        let specs = token_specs();
        let usage = Usage {
            prog: "token",
            specs: &specs,
        };

        assert_eq!(
            usage.to_string(),
            "usage: token [-h] [--entropy ENTROPY] [--verbose] [method]"
        );
    }

    #[test]
    fn required_and_variadic_synopsis() {
        let signature = Signature::new([
            Parameter::positional("a"),
            Parameter::variadic("rest"),
            Parameter::keyword("k"),
        ])
        .unwrap();
        let (specs, _) = map_signature(&signature, &MapperOptions::default()).unwrap();

        let usage = Usage {
            prog: "prog",
            specs: &specs,
        };
        assert_eq!(usage.to_string(), "usage: prog [-h] -k K a [rest ...]");
    }

    #[test]
    fn help_lists_choices_and_defaults() {
        let specs = token_specs();
        let help = Help {
            prog: "token",
            description: Some("Generate a random token."),
            specs: &specs,
        }
        .to_string();

        assert!(help.starts_with("usage: token [-h]"));
        assert!(help.contains("\nGenerate a random token.\n"));
        assert!(help.contains("\nArguments:\n  method"));
        assert!(help.contains("how to generate the token {xkcd,short} [default: xkcd]"));
        assert!(help.contains("--entropy ENTROPY"));
        assert!(help.contains("[default: 70]"));
        assert!(help.contains("-h, --help"));
    }

    #[test]
    fn commands_help() {
        let commands = [
            CommandSummary {
                name: "token",
                summary: Some("Generate a random token."),
            },
            CommandSummary {
                name: "roll",
                summary: None,
            },
        ];

        let usage = CommandsUsage {
            prog: "demo",
            commands: &commands,
        };
        assert_eq!(usage.to_string(), "usage: demo [-h] {token,roll} ...");

        let help = CommandsHelp {
            prog: "demo",
            description: None,
            commands: &commands,
        }
        .to_string();

        assert!(help.contains("\nCommands:\n  token"));
        assert!(help.contains("Generate a random token."));
        assert!(help.contains("\n  roll\n"));
    }
}
