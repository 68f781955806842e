use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::{ConversionResult, Converter, GoldResult, Phase, Stage};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    UsdValue,
    GoldValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::UsdValue => style(text).blue().bold(),
        StyleType::GoldValue => style(text).yellow().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Creates a spinner shown while a lookup is in flight.
pub fn new_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Inserts `,` between groups of three digits in the integer part.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `$1,234.56`
pub fn format_usd(value: f64) -> String {
    format!("${}", group_thousands(&format!("{value:.2}")))
}

/// Up to four decimals, trailing zeros trimmed: `1.7107 g`.
pub fn format_grams(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} g", group_thousands(trimmed))
}

pub fn render_conversion(result: &ConversionResult) -> String {
    format!(
        "{} {} {} = {}  {}",
        style_text("Calculated Value:", StyleType::Label),
        result.amount,
        result.currency,
        style_text(&format_usd(result.usd_amount), StyleType::UsdValue),
        style_text(
            &format!(
                "(1 {} = {} USD, {})",
                result.currency,
                result.rate,
                result.computed_at.format("%Y-%m-%d %H:%M UTC")
            ),
            StyleType::Subtle
        ),
    )
}

pub fn render_gold(conversion: Option<&ConversionResult>, result: &GoldResult) -> String {
    let usd = conversion.map_or_else(String::new, |c| format!("{} ", format_usd(c.usd_amount)));
    format!(
        "{} {}buys {}  {}",
        style_text("Metal Weight:", StyleType::Label),
        usd,
        style_text(&format_grams(result.grams), StyleType::GoldValue),
        style_text(
            &format!(
                "({}/oz, {}/g)",
                format_usd(result.price_per_troy_ounce),
                format_usd(result.price_per_gram)
            ),
            StyleType::Subtle
        ),
    )
}

pub fn error_banner(message: &str) -> String {
    style_text(&format!("✖ {message}"), StyleType::Error)
}

pub fn celebration(result: &GoldResult) -> String {
    style(format!(
        "✨ That's {} of pure gold! ✨",
        format_grams(result.grams)
    ))
    .yellow()
    .bold()
    .to_string()
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::InputPending => "ready to convert",
        Phase::ConversionInFlight => "fetching rates...",
        Phase::Converted => "converted",
        Phase::GoldInFlight => "fetching gold price...",
        Phase::Complete => "complete",
        Phase::Failed(Stage::Conversion) => "conversion failed",
        Phase::Failed(Stage::Gold) => "gold calculation failed",
    }
}

/// Snapshot of the converter: inputs, phase, results and error banner.
pub fn render_status(converter: &Converter) -> String {
    let amount = if converter.amount().is_empty() {
        style_text("<none>", StyleType::Subtle)
    } else {
        converter.amount().to_string()
    };
    let mut lines = vec![format!(
        "{} {} {}  [{}]",
        style_text("Input:", StyleType::Label),
        amount,
        converter.currency(),
        phase_label(converter.phase())
    )];

    match converter.conversion() {
        Some(conversion) => lines.push(render_conversion(conversion)),
        None => lines.push(style_text("Pending conversion...", StyleType::Subtle)),
    }
    if let Some(gold) = converter.gold() {
        lines.push(render_gold(converter.conversion(), gold));
    } else if converter.conversion().is_some() {
        lines.push(style_text("Ready for gold calculation", StyleType::Subtle));
    }
    if let Some(error) = converter.error() {
        lines.push(error_banner(&error.message));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyCode;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(110.0), "$110.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(-1500.5), "$-1,500.50");
    }

    #[test]
    fn test_format_grams() {
        assert_eq!(format_grams(1.710691224), "1.7107 g");
        assert_eq!(format_grams(2.5), "2.5 g");
        assert_eq!(format_grams(3.0), "3 g");
        assert_eq!(format_grams(12345.0), "12,345 g");
    }

    #[test]
    fn test_render_results() {
        let conversion = ConversionResult::new(100.0, CurrencyCode::new("EUR"), 1.1);
        let rendered = render_conversion(&conversion);
        assert!(rendered.contains("100 EUR"));
        assert!(rendered.contains("$110.00"));

        let gold = GoldResult::new(conversion.usd_amount, 2000.0);
        let rendered = render_gold(Some(&conversion), &gold);
        assert!(rendered.contains("1.7107 g"));
        assert!(rendered.contains("$2,000.00/oz"));
        assert!(celebration(&gold).contains("1.7107 g"));
    }
}
