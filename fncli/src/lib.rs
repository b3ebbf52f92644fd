/*!
Turn a function's parameter list into a command line interface.

`fncli` reads a function's declared [`Signature`] and builds an argument
parser from it:

- parameters passed by position become positional arguments, and keyword-only
  parameters become `--name` options (`-n` for one-letter names);
- parameters with defaults are optional;
- a [`Choice`] restricts a parameter to a fixed set of values;
- `bool` parameters with a default become flags that flip that default;
- unannotated parameters are converted opportunistically: tokens that look
  like numbers become numbers, and everything else stays a string.

After parsing, the [binder][bind] reassembles the values into the exact call
the signature asks for, and the function is invoked.

The easiest way in is the [`#[fncli::command]`][command] attribute, which
derives a [`Function`] from an ordinary Rust `fn`:

```
use fncli::{Command, Dispatch, Outcome, Value};

/// Generate a random token.
#[fncli::command]
fn token(
    #[arg(choices = ["xkcd", "short"])] method: String,
    #[arg(keyword, default = 70)] entropy: i64,
) -> String {
    format!("{method}:{entropy}")
}

let command = Command::new("token", token_command().unwrap()).unwrap();

match command.invoke(["short", "--entropy", "40"]) {
    Outcome::Returned(Some(Value::Str(token))) => assert_eq!(token, "short:40"),
    other => panic!("unexpected outcome: {other:?}"),
}

assert_eq!(command.invoke(["long"]).exit_code(), Some(2));
```

Several functions can be grouped as subcommands with a [`CommandSet`].
Nothing in this crate exits the process: [`Dispatch::invoke`] returns an
[`Outcome`], and [`Outcome::report`] turns it into an exit code.
*/

pub mod arguments;
pub mod bind;
pub mod choice;
pub mod coerce;
pub mod convert;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod function;
pub mod help;
pub mod mapper;
pub mod namespace;
mod printers;
pub mod signature;
pub mod spec;
mod state;
pub mod value;

pub use bind::{BoundCall, bind};
pub use choice::Choice;
pub use convert::Converter;
pub use dispatch::{Command, CommandSet, Dispatch, Outcome};
pub use engine::Parser;
pub use errors::{BindError, CallError, ConfigError, ConversionError, ParseError, UsageError};
pub use fncli_derive::command;
pub use function::{Argument, Function, IntoOutput};
pub use mapper::{MapperOptions, map_signature};
pub use namespace::Namespace;
pub use signature::{Annotation, Parameter, ParameterKind, Signature};
pub use value::{Complex, Value, ValueKind};
