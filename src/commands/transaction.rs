use crate::dashboard::Dashboard;
use crate::services::{classify_transaction, PageOutcome};
use crate::utils::{format_amount, format_krw, Table};

pub async fn execute(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    match args.first().map(|a| a.to_lowercase()).as_deref() {
        Some("more") => return more(dash).await,
        Some("reset") => dash.reset_transactions(),
        _ => {}
    }

    match dash.load_transactions().await {
        None => Ok("⏳ Trade log is already loading".to_string()),
        Some(PageOutcome::Failed) | Some(PageOutcome::Stale) => Err(String::new()),
        Some(_) => Ok(render(dash)),
    }
}

pub async fn more(dash: &Dashboard) -> Result<String, String> {
    if !dash.transactions().has_next() {
        return Ok("No more transactions".to_string());
    }

    match dash.load_more_transactions().await {
        None => Ok("⏳ Trade log is already loading".to_string()),
        Some(PageOutcome::Failed) | Some(PageOutcome::Stale) => Err(String::new()),
        Some(_) => Ok(render(dash)),
    }
}

pub fn reason(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    let id = args
        .first()
        .and_then(|a| a.parse::<i64>().ok())
        .ok_or("Usage: `reason <ID>`")?;

    match dash.reveal_reason(id) {
        Some(detail) => Ok(format!("🧠 #{} {}\n{}", id, detail.action, detail.detail)),
        None => Ok(format!("No reason recorded for #{}", id)),
    }
}

fn render(dash: &Dashboard) -> String {
    let feed = dash.transactions();
    if feed.is_empty() {
        return "No transactions yet".to_string();
    }

    let mut table = Table::new(&[
        "ID", "Date", "Coin", "Action", "Price", "Amount", "Total", "Risk", "Status",
    ]);
    for tx in feed.items() {
        table.add_row(vec![
            tx.id.to_string(),
            tx.date().to_string(),
            tx.coin_name.clone().unwrap_or_else(|| "-".to_string()),
            classify_transaction(tx).to_string(),
            format_krw(tx.price),
            format_amount(tx.amount),
            format_krw(tx.total_value()),
            tx.risk_level.as_str().to_string(),
            tx.status.as_str().to_string(),
        ]);
    }

    let mut out = table.render();
    if feed.has_next() {
        out.push_str(&format!("\n{} shown, `more` for older", feed.len()));
    }
    out
}
