use super::ui;
use crate::core::resolver::{RateResolver, Resolution};

pub fn render(from: &str, to: &str, resolution: &Resolution) -> String {
    format!(
        "1 {} = {} {} ({})",
        from,
        ui::style_text(&format!("{:.6}", resolution.rate), ui::StyleType::TotalValue),
        to,
        ui::origin_text(resolution.origin)
    )
}

pub async fn run(resolver: &RateResolver, from: &str, to: &str) -> anyhow::Result<()> {
    let resolution = resolver.resolve(from, to).await;
    println!("{}", render(from, to, &resolution));
    Ok(())
}
