use crate::dashboard::Dashboard;
use crate::services::price_service;
use crate::utils::{format_krw, format_signed_percent, Table};

/// Candles shown under the summary
const RECENT_CANDLES: usize = 5;

pub fn execute(dash: &Dashboard) -> Result<String, String> {
    let selection = dash.selection();
    let coin = selection.pivot().ok_or("No coin selected. Use `select <COIN>`.")?;

    if selection.is_loading() {
        return Ok(format!("⏳ Loading {}...", coin));
    }

    let series = selection.series();
    let Some(summary) = price_service::summarize(series) else {
        return Ok(format!("No price data for {}", coin));
    };

    let mut out = format!(
        "💹 {}  {}  {} ({})\n",
        coin,
        format_krw(summary.latest_close),
        format_krw(summary.change),
        format_signed_percent(summary.change_percent)
    );

    let mut table = Table::new(&["Time", "Open", "High", "Low", "Close", "Volume"]);
    let start = series.len().saturating_sub(RECENT_CANDLES);
    for candle in &series[start..] {
        table.add_row(vec![
            candle.timestamp.clone(),
            format_krw(candle.open),
            format_krw(candle.high),
            format_krw(candle.low),
            format_krw(candle.close),
            format!("{:.4}", candle.volume),
        ]);
    }
    out.push_str(&table.render());

    Ok(out)
}
