mod error;

use std::process::ExitCode;

use fncli::{CommandSet, Dispatch as _};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::error::DemoError;

/// Greet someone.
///
/// The greeting is printed on a single line.
#[fncli::command]
fn greet(
    #[arg(help = "who to greet")] name: String,
    #[arg(keyword, default = "Hello")] greeting: String,
    #[arg(keyword, default = false, help = "greet loudly")] shout: bool,
) -> String {
    let line = format!("{greeting}, {name}!");

    if shout { line.to_uppercase() } else { line }
}

/// Divide one number by another.
#[fncli::command]
fn divide(numerator: f64, denominator: f64) -> Result<f64, DemoError> {
    if denominator == 0.0 {
        Err(DemoError::DivideByZero(numerator))
    } else {
        Ok(numerator / denominator)
    }
}

/// Average some numbers, optionally rounding the result.
#[fncli::command]
fn mean(
    #[arg(rest)] numbers: Vec<f64>,
    #[arg(keyword, default = 2, help = "digits after the decimal point")] precision: u8,
) -> Result<String, DemoError> {
    if numbers.is_empty() {
        return Err(DemoError::NoNumbers);
    }

    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    Ok(format!("{mean:.*}", usize::from(precision)))
}

/// Describe a die roll.
#[fncli::command(name = "roll")]
fn roll_dice(
    #[arg(choices = [4, 6, 8, 12, 20], help = "faces on each die")] sides: i64,
    #[arg(default = 1)] count: i64,
) -> String {
    format!("{count}d{sides}: between {count} and {}", count * sides)
}

/// Echo the arguments exactly as given, without converting them.
#[fncli::command]
fn echo(#[arg(rest, raw)] words: Vec<String>) -> String {
    words.join(" ")
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let commands = CommandSet::new("fncli-demo")
        .with_description("A handful of small functions, exposed as subcommands.")
        .add(greet_command()?)?
        .add(divide_command()?)?
        .add(mean_command()?)?
        .add(roll_dice_command()?)?
        .add(echo_command()?)?;

    commands.run()
}
