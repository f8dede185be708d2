use crate::dashboard::Dashboard;
use crate::services::{balance_service, PageOutcome};
use crate::utils::{format_amount, format_krw, Table};

pub async fn execute(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    let outcome = match args.first().map(|a| a.to_lowercase()).as_deref() {
        Some("more") => {
            if !dash.balances().has_next() {
                return Ok("No older balance history".to_string());
            }
            dash.load_more_balances().await
        }
        Some("reset") => {
            dash.reset_balances();
            dash.load_balances().await
        }
        _ => dash.load_balances().await,
    };

    match outcome {
        None => Ok("⏳ Balance history is already loading".to_string()),
        Some(PageOutcome::Failed) | Some(PageOutcome::Stale) => Err(String::new()),
        Some(_) => Ok(render(dash)),
    }
}

fn render(dash: &Dashboard) -> String {
    let feed = dash.balances();
    let rows = balance_service::sorted_snapshots(feed.items());
    let undated = balance_service::undated_snapshots(feed.items());
    if rows.is_empty() && undated.is_empty() {
        return "No balance history yet".to_string();
    }

    let mut table = Table::new(&["Time", "KRW", "Coins", "Total"]);
    for (time, snapshot) in &rows {
        table.add_row(vec![
            time.format("%Y-%m-%d %H:%M").to_string(),
            format_krw(snapshot.amount),
            format_amount(snapshot.coin_amount),
            format_krw(snapshot.total_amount),
        ]);
    }
    // Unreadable timestamps go last, shown as received
    for snapshot in &undated {
        table.add_row(vec![
            format!("? {}", snapshot.created_at),
            format_krw(snapshot.amount),
            format_amount(snapshot.coin_amount),
            format_krw(snapshot.total_amount),
        ]);
    }

    let mut out = table.render();
    let points = balance_service::chart_points(feed.items());
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        out.push_str(&format!(
            "\nTotal {} → {} ({} points)",
            format_krw(first.total),
            format_krw(last.total),
            points.len()
        ));
    }
    if feed.has_next() {
        out.push_str("\n`balance more` for older history");
    }
    out
}
