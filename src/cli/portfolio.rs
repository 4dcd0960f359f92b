use super::ui;
use crate::core::config::Holding;
use crate::core::portfolio::{self, PortfolioValue};
use crate::core::resolver::RateResolver;
use anyhow::Result;
use comfy_table::Cell;

impl PortfolioValue {
    pub fn display_as_table(&self) -> String {
        let base = &self.base_currency;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Amount"),
            ui::header_cell(&format!("Purchase Rate ({base})")),
            ui::header_cell(&format!("Current Rate ({base})")),
            ui::header_cell(&format!("Value ({base})")),
            ui::header_cell(&format!("P/L ({base})")),
            ui::header_cell("P/L (%)"),
            ui::header_cell("Source"),
        ]);

        for holding in &self.holdings {
            let name = match &holding.notes {
                Some(notes) => format!("{} ({notes})", holding.currency),
                None => holding.currency.clone(),
            };
            table.add_row(vec![
                Cell::new(name),
                ui::number_cell(holding.amount, 4),
                ui::number_cell(holding.purchase_rate, 6),
                ui::number_cell(holding.current_rate, 6),
                ui::number_cell(holding.current_value, 2),
                ui::change_cell(format!("{:.2}", holding.profit_loss), holding.profit_loss),
                ui::change_cell(
                    format!("{:.2}%", holding.profit_loss_pct),
                    holding.profit_loss_pct,
                ),
                ui::origin_cell(holding.rate_origin),
            ]);
        }

        let total_style = if self.has_placeholder_rates() {
            ui::StyleType::Error
        } else {
            ui::StyleType::TotalValue
        };
        let total_pl = self.total_value - self.total_purchase_value;

        let mut output = format!(
            "Portfolio: {}\n\n",
            ui::style_text(&format!("{} holdings", self.holdings.len()), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nTotal Value ({}): {}",
            ui::style_text(base, ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", self.total_value), total_style)
        ));
        output.push_str(&format!(
            "\nTotal P/L ({}): {:.2} ({:.2}%)",
            base,
            total_pl,
            portfolio::profit_loss_pct(self.total_value, self.total_purchase_value)
        ));
        if self.has_placeholder_rates() {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    "Some rates could not be resolved and were counted 1:1.",
                    ui::StyleType::Error
                )
            ));
        }
        output
    }
}

pub async fn run(
    holdings: &[Holding],
    resolver: &RateResolver,
    base_currency: &str,
) -> Result<()> {
    if holdings.is_empty() {
        println!("No holdings configured.");
        return Ok(());
    }

    let pb = ui::new_progress_bar(holdings.len() as u64, true);
    pb.set_message("Resolving rates...");
    let value =
        portfolio::calculate_portfolio_value(holdings, resolver, base_currency, &|| pb.inc(1))
            .await;
    pb.finish_and_clear();

    println!("{}", value.display_as_table());
    Ok(())
}
