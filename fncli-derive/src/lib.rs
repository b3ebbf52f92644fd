/*!
Procedural macros for `fncli`. Use them through the `fncli` crate rather
than depending on this one directly.
 */

mod command;
mod common;

use proc_macro::TokenStream;

/**
Describe a free function as a `fncli::Function`.

The function is kept as it is, and a sibling `fn <name>_command() ->
Result<fncli::Function, fncli::ConfigError>` is generated next to it. The
function's doc comment becomes the help description.

Parameters are positional unless marked otherwise, and each parameter's
Rust type (through `fncli::Argument`) decides how its tokens are
converted. The `#[arg(...)]` attribute customizes a parameter:

- `keyword`: keyword-only; passed as `--name` (or `-n`).
- `default = expr`: the default value, making the parameter optional.
- `rest`: absorbs all remaining positional arguments. The type must be a
  `Vec`.
- `keywords`: absorbs arbitrary `--name` arguments. This can be described,
  but building a command from it fails.
- `choices = [a, b, c]`: only these values are accepted.
- `help = "..."`: help text for this argument.
- `raw`: never convert the token; the parameter receives it as a string.

The command is named after the function, unless overridden with
`#[fncli::command(name = "...")]`.
*/
#[proc_macro_attribute]
pub fn command(attrs: TokenStream, item: TokenStream) -> TokenStream {
    match command::decorate_fn_command(attrs.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
