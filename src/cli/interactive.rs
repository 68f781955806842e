//! Line-oriented session over a single [`Converter`].

use super::{convert::celebrations, currencies, ui};
use crate::core::{Converter, CurrencyCatalog, CurrencyCode, CurrencyEntry};
use anyhow::{Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  amount <value>     set the amount (a bare number works too)
  currency <CODE>    select the source currency
  convert            convert the amount to USD
  gold               calculate the gold weight of the USD value
  reset              clear the amount and all results
  status             show the current input and results
  list               show the available currencies
  help               show this help
  quit               leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAmount(String),
    SetCurrency(String),
    Convert,
    CalculateGold,
    Reset,
    Status,
    List,
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match (command.to_lowercase().as_str(), arg) {
            ("amount" | "a", "") => Err(anyhow!("Usage: amount <value>")),
            ("amount" | "a", value) => Ok(Action::SetAmount(value.to_string())),
            ("currency" | "c", "") => Err(anyhow!("Usage: currency <CODE>")),
            ("currency" | "c", code) => Ok(Action::SetCurrency(code.to_string())),
            ("convert", "") => Ok(Action::Convert),
            ("gold" | "g", "") => Ok(Action::CalculateGold),
            ("reset", "") => Ok(Action::Reset),
            ("status" | "s", "") => Ok(Action::Status),
            ("list" | "l", "") => Ok(Action::List),
            ("help" | "h" | "?", "") => Ok(Action::Help),
            ("quit" | "q" | "exit", "") => Ok(Action::Quit),
            (_, "") if command.parse::<f64>().is_ok() => {
                Ok(Action::SetAmount(command.to_string()))
            }
            _ => Err(anyhow!("Unknown command: {}. Type 'help' for a list.", line)),
        }
    }
}

pub async fn run(converter: &mut Converter, catalog: &dyn CurrencyCatalog) -> Result<()> {
    let pb = ui::new_spinner("Loading currencies...");
    let list = catalog.list_currencies().await;
    pb.finish_and_clear();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(converter, &list, stdin, &mut stdout).await
}

/// Reads actions from `input` until `quit` or end of input, writing the
/// converter's state to `out` after every action.
pub async fn run_session<R, W>(
    converter: &mut Converter,
    currencies: &[CurrencyEntry],
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut events = converter.subscribe();
    let mut lines = input.lines();

    writeln!(
        out,
        "{}",
        ui::style_text("Currency to Gold", ui::StyleType::Title)
    )?;
    writeln!(out, "{HELP}\n")?;

    loop {
        write!(out, "{} > ", converter.currency())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let action = match line.parse::<Action>() {
            Ok(action) => action,
            Err(e) => {
                writeln!(out, "{}", ui::error_banner(&e.to_string()))?;
                continue;
            }
        };

        match action {
            Action::Quit => break,
            Action::Help => writeln!(out, "{HELP}")?,
            Action::List => writeln!(out, "{}", currencies::display_as_table(currencies))?,
            Action::Status => writeln!(out, "{}", ui::render_status(converter))?,
            Action::SetAmount(value) => {
                converter.set_amount(value);
                writeln!(out, "{}", ui::render_status(converter))?;
            }
            Action::SetCurrency(code) => {
                let code = CurrencyCode::new(code);
                if !currencies.iter().any(|c| c.code == code) {
                    writeln!(
                        out,
                        "{}",
                        ui::style_text(
                            &format!("{code} is not in the currency list; the lookup may fail"),
                            ui::StyleType::Subtle
                        )
                    )?;
                }
                converter.set_currency(code);
                writeln!(out, "{}", ui::render_status(converter))?;
            }
            Action::Convert => {
                if !converter.can_convert() {
                    writeln!(out, "{}", ui::error_banner("Enter an amount first"))?;
                    continue;
                }
                let pb = ui::new_spinner("Fetching rates...");
                // Failures are recorded on the converter and shown below
                let _ = converter.convert().await;
                pb.finish_and_clear();
                writeln!(out, "{}", ui::render_status(converter))?;
            }
            Action::CalculateGold => {
                if !converter.can_calculate_gold() {
                    writeln!(
                        out,
                        "{}",
                        ui::error_banner("Convert an amount to USD first")
                    )?;
                    continue;
                }
                let pb = ui::new_spinner("Fetching gold price...");
                let _ = converter.calculate_gold().await;
                pb.finish_and_clear();
                writeln!(out, "{}", ui::render_status(converter))?;
                for line in celebrations(&mut events) {
                    writeln!(out, "{line}")?;
                }
            }
            Action::Reset => {
                converter.reset();
                writeln!(out, "{}", ui::render_status(converter))?;
            }
        }
    }

    Ok(())
}
