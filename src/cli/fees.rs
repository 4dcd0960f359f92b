use super::ui;
use crate::core::fees::{CountryFeeSchedule, FeeBreakdown, ScheduleMatch, find_schedule};
use crate::core::resolver::{RateResolver, Resolution};
use comfy_table::Cell;

pub struct FeeQuote<'a> {
    pub amount: f64,
    pub from: &'a str,
    pub to: &'a str,
    pub country_code: &'a str,
}

fn schedule_label(matched: &ScheduleMatch<'_>, country_code: &str) -> String {
    match matched {
        ScheduleMatch::Country(s) => format!("{} ({})", s.country_name, s.country_code),
        ScheduleMatch::Currency(s) => format!(
            "{} ({}), no schedule for {country_code}",
            s.country_name, s.country_code
        ),
        ScheduleMatch::Default => format!("default rates, no schedule for {country_code}"),
    }
}

pub fn render(
    quote: &FeeQuote<'_>,
    resolution: &Resolution,
    matched: &ScheduleMatch<'_>,
    breakdown: &FeeBreakdown,
) -> String {
    let schedule = matched.schedule();
    let to = quote.to;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell(&format!("Amount ({to})"))]);
    table.add_row(vec![
        Cell::new(format!(
            "Gross ({:.4} {} @ {:.6}, {})",
            quote.amount, quote.from, resolution.rate, resolution.origin
        )),
        ui::number_cell(breakdown.gross_amount, 4),
    ]);
    table.add_row(vec![
        Cell::new(format!("Exchange tax ({}%)", schedule.exchange_tax_rate)),
        ui::number_cell(breakdown.exchange_tax, 4),
    ]);
    let max_fee = schedule
        .maximum_fee
        .map_or("none".to_string(), |m| format!("{m:.2}"));
    table.add_row(vec![
        Cell::new(format!(
            "Service fee ({}%, min {:.2}, max {max_fee})",
            schedule.service_fee_rate, schedule.minimum_fee
        )),
        ui::number_cell(breakdown.service_fee, 4),
    ]);
    table.add_row(vec![
        Cell::new("Total tax and fees"),
        ui::number_cell(breakdown.total_tax_fee, 4),
    ]);

    format!(
        "{}\n{}\n\n{}\n\nNet Amount ({}): {}",
        ui::style_text(&format!("{} → {to}", quote.from), ui::StyleType::Title),
        ui::style_text(&schedule_label(matched, quote.country_code), ui::StyleType::Subtle),
        table,
        ui::style_text(to, ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.4}", breakdown.net_amount), ui::StyleType::TotalValue)
    )
}

pub async fn run(
    resolver: &RateResolver,
    schedules: &[CountryFeeSchedule],
    quote: FeeQuote<'_>,
) -> anyhow::Result<()> {
    let resolution = resolver.resolve(quote.from, quote.to).await;
    let matched = find_schedule(schedules, quote.country_code, quote.to);
    let breakdown = matched.schedule().apply(quote.amount, resolution.rate);
    println!("{}", render(&quote, &resolution, &matched, &breakdown));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fees::DEFAULT_FEE_SCHEDULE;
    use crate::core::resolver::RateOrigin;

    #[test]
    fn test_render_default_schedule() {
        console::set_colors_enabled(false);
        let quote = FeeQuote {
            amount: 1000.0,
            from: "USD",
            to: "EUR",
            country_code: "USA",
        };
        let resolution = Resolution {
            rate: 0.9,
            origin: RateOrigin::Fiat,
        };
        let matched = ScheduleMatch::Default;
        let breakdown = DEFAULT_FEE_SCHEDULE.apply(quote.amount, resolution.rate);

        let output = render(&quote, &resolution, &matched, &breakdown);
        assert!(output.contains("default rates, no schedule for USA"));
        assert!(output.contains("Net Amount (EUR): 882.0000"));
    }
}
