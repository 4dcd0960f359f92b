use super::ui;
use crate::core::resolver::{RateResolver, Resolution};
use chrono::Utc;
use comfy_table::Cell;

/// Result of converting an amount at a resolved rate, rounded to four places.
pub fn converted_amount(amount: f64, rate: f64) -> f64 {
    (amount * rate * 10_000.0).round() / 10_000.0
}

pub fn render(amount: f64, from: &str, to: &str, resolution: &Resolution) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Result"),
        ui::header_cell("Source"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{amount:.4} {from}")),
        ui::number_cell(resolution.rate, 6),
        Cell::new(format!("{:.4} {to}", converted_amount(amount, resolution.rate))),
        ui::origin_cell(resolution.origin),
    ]);

    format!(
        "{}\n{}\n{}",
        ui::style_text(&format!("{from} → {to}"), ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("as of {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(
    resolver: &RateResolver,
    amount: f64,
    from: &str,
    to: &str,
) -> anyhow::Result<()> {
    let resolution = resolver.resolve(from, to).await;
    println!("{}", render(amount, from, to, &resolution));
    Ok(())
}
