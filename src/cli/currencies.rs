use super::ui;
use crate::core::{CurrencyCatalog, CurrencyEntry};
use anyhow::Result;
use comfy_table::Cell;

pub fn display_as_table(currencies: &[CurrencyEntry]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);

    for entry in currencies {
        table.add_row(vec![Cell::new(entry.code.as_str()), Cell::new(&entry.name)]);
    }

    format!(
        "{}\n\n{}",
        table,
        ui::style_text(
            &format!("{} currencies", currencies.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(catalog: &dyn CurrencyCatalog) -> Result<()> {
    let pb = ui::new_spinner("Loading currencies...");
    let currencies = catalog.list_currencies().await;
    pb.finish_and_clear();

    println!("{}", display_as_table(&currencies));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::fallback_currencies;

    #[test]
    fn test_table_lists_every_currency() {
        let rendered = display_as_table(&fallback_currencies());
        assert!(rendered.contains("UAE Dirham"));
        assert!(rendered.contains("PKR"));
        assert!(rendered.contains("11 currencies"));
    }
}
