use super::ui;
use crate::core::store::{RateSample, RateStore};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use comfy_table::Cell;

pub fn render(from: &str, to: &str, days: u32, samples: &[RateSample]) -> String {
    let title = ui::style_text(
        &format!("{from} → {to}, last {days} day(s)"),
        ui::StyleType::Title,
    );
    if samples.is_empty() {
        return format!(
            "{title}\n\n{}",
            ui::style_text("No rates recorded for this pair yet.", ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Observed (UTC)"), ui::header_cell("Rate")]);

    let mut previous: Option<f64> = None;
    for sample in samples {
        let rate_cell = match previous {
            Some(prev) if sample.rate != prev => {
                ui::change_cell(format!("{:.6}", sample.rate), sample.rate - prev)
            }
            _ => ui::number_cell(sample.rate, 6),
        };
        table.add_row(vec![
            Cell::new(sample.observed_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            rate_cell,
        ]);
        previous = Some(sample.rate);
    }

    format!("{title}\n\n{table}")
}

/// Start of a `days` long look-back window; clamps to the earliest representable time.
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub async fn run(store: &dyn RateStore, from: &str, to: &str, days: u32) -> Result<()> {
    let since = window_start(Utc::now(), days);
    let samples = store.samples_since(from, to, since).await?;
    println!("{}", render(from, to, days, &samples));
    Ok(())
}
