//! Command-line parsing for the `currency-chart` binary.

use thiserror::Error;

use crate::core::CurrencyPair;
use crate::error::ChartError;

pub const PROGRAM_NAME: &str = "currency-chart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Open the chart window.
    Chart { pair: CurrencyPair },
    /// Print the live rate on every refresh, without a window.
    Live { pair: CurrencyPair },
    ListCurrencies,
    Help,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing currency codes")]
    MissingArguments,

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),

    #[error(transparent)]
    InvalidPair(#[from] ChartError),
}

#[must_use]
pub fn usage_message() -> String {
    format!(
        "Usage: {PROGRAM_NAME} BASE TARGET\n\
         Example: {PROGRAM_NAME} USD BRL\n\
         \n\
         Options:\n  \
           --live BASE TARGET   print the live rate instead of opening a window\n  \
           --list-currencies    print the available currency codes\n  \
           -h, --help           show this message"
    )
}

/// Parses arguments, program name excluded.
pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut live = false;
    let mut list = false;
    let mut positionals: Vec<String> = Vec::with_capacity(2);

    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--live" => live = true,
            "--list-currencies" => list = true,
            _ => {
                if arg.starts_with("--") || positionals.len() == 2 {
                    return Err(CliError::UnexpectedArgument(arg));
                }
                positionals.push(arg);
            }
        }
    }

    if list {
        if live {
            return Err(CliError::UnexpectedArgument("--live".to_owned()));
        }
        if let Some(extra) = positionals.into_iter().next() {
            return Err(CliError::UnexpectedArgument(extra));
        }
        return Ok(CliCommand::ListCurrencies);
    }

    let mut positionals = positionals.into_iter();
    let (Some(base), Some(target)) = (positionals.next(), positionals.next()) else {
        return Err(CliError::MissingArguments);
    };
    let pair = CurrencyPair::new(base, target)?;
    Ok(if live {
        CliCommand::Live { pair }
    } else {
        CliCommand::Chart { pair }
    })
}
