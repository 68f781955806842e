use super::ui;
use crate::core::{Converter, ConverterEvent};
use anyhow::Result;
use std::io::Write;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// One-shot conversion of `amount` to USD and, unless `usd_only`, to gold.
pub async fn run(
    converter: &mut Converter,
    amount: &str,
    currency: Option<&str>,
    usd_only: bool,
) -> Result<()> {
    let mut stdout = std::io::stdout();
    run_with_output(converter, amount, currency, usd_only, &mut stdout).await
}

/// Writes the results to `out`. A failed stage is returned, not written.
pub async fn run_with_output<W: Write>(
    converter: &mut Converter,
    amount: &str,
    currency: Option<&str>,
    usd_only: bool,
    out: &mut W,
) -> Result<()> {
    if let Some(code) = currency {
        converter.set_currency(code);
    }
    converter.set_amount(amount);
    let mut events = converter.subscribe();

    let pb = ui::new_spinner("Fetching rates...");
    let conversion = converter.convert().await;
    pb.finish_and_clear();

    let conversion = conversion?;
    writeln!(out, "{}", ui::render_conversion(&conversion))?;

    if usd_only {
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching gold price...");
    let gold = converter.calculate_gold().await;
    pb.finish_and_clear();

    let gold = gold?;
    writeln!(out, "{}", ui::render_gold(Some(&conversion), &gold))?;

    for line in celebrations(&mut events) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Celebration lines for every gold result published since the last call.
pub(crate) fn celebrations(events: &mut broadcast::Receiver<ConverterEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match events.try_recv() {
            Ok(ConverterEvent::GoldComputed(gold)) => lines.push(ui::celebration(&gold)),
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    lines
}
