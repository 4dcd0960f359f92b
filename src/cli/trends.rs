use super::ui;
use crate::core::classify::TREND_ASSETS;
use crate::core::trends::{MarketTrend, MarketTrendProvider};
use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Cell;

pub fn render(vs_currency: &str, trends: &[MarketTrend]) -> String {
    let title = ui::style_text(
        &format!("Crypto market, prices in {vs_currency}"),
        ui::StyleType::Title,
    );
    if trends.is_empty() {
        return format!(
            "{title}\n\n{}",
            ui::style_text("No market data available.", ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset"),
        ui::header_cell(&format!("Price ({vs_currency})")),
        ui::header_cell("24h Change"),
    ]);
    for trend in trends {
        let change = match trend.change_24h {
            Some(change) => ui::change_cell(format!("{change:+.2}%"), change),
            None => Cell::new("n/a"),
        };
        table.add_row(vec![
            Cell::new(&trend.symbol),
            ui::number_cell(trend.price, 4),
            change,
        ]);
    }

    format!(
        "{title}\n{}\n\n{table}",
        ui::style_text(
            &format!("as of {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(provider: &dyn MarketTrendProvider, vs_currency: &str) -> Result<()> {
    let trends = provider
        .market_trends(TREND_ASSETS, vs_currency)
        .await
        .context("Failed to fetch crypto market trends")?;
    println!("{}", render(vs_currency, &trends));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{LookupError, LookupResult};
    use async_trait::async_trait;

    struct FixedTrends(LookupResult<Vec<MarketTrend>>);

    #[async_trait]
    impl MarketTrendProvider for FixedTrends {
        async fn market_trends(
            &self,
            _symbols: &[&str],
            _vs_currency: &str,
        ) -> LookupResult<Vec<MarketTrend>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_render_trends() {
        console::set_colors_enabled(false);
        let trends = vec![
            MarketTrend {
                symbol: "BTC".to_string(),
                price: 64000.0,
                change_24h: Some(1.5),
            },
            MarketTrend {
                symbol: "ETH".to_string(),
                price: 3100.25,
                change_24h: Some(-2.0),
            },
            MarketTrend {
                symbol: "XRP".to_string(),
                price: 0.52,
                change_24h: None,
            },
        ];

        let output = render("USD", &trends);
        assert!(output.contains("Crypto market, prices in USD"));
        assert!(output.contains("64000.0000"));
        assert!(output.contains("+1.50%"));
        assert!(output.contains("-2.00%"));
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_render_without_data() {
        console::set_colors_enabled(false);
        assert!(render("EUR", &[]).contains("No market data available."));
    }

    #[tokio::test]
    async fn test_run_reports_provider_failure() {
        let provider = FixedTrends(Err(LookupError::Unavailable("HTTP error".to_string())));
        let err = run(&provider, "USD").await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch crypto market trends"));

        let provider = FixedTrends(Ok(Vec::new()));
        assert!(run(&provider, "USD").await.is_ok());
    }
}
