use crate::coins;
use crate::commands::surfaced;
use crate::dashboard::Dashboard;
use crate::services::SeriesOutcome;
use crate::utils::Table;

pub fn list(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    if args.first().map(|a| a.eq_ignore_ascii_case("available")) == Some(true) {
        return Ok(format!("Available: {}", coins::available_coins().join(", ")));
    }

    let tracked = dash.tracked_coins();
    if tracked.is_empty() {
        return Ok("No tracked coins. Use `add <COIN>` to start tracking one.".to_string());
    }

    let selection = dash.selection();
    let selected = selection.pivot();
    let mut table = Table::new(&["ID", "Coin"]);
    for coin in &tracked {
        let marker = if Some(coin.name.as_str()) == selected { "*" } else { " " };
        table.add_row(vec![coin.id.to_string(), format!("{} {}", marker, coin.name)]);
    }

    Ok(table.render())
}

pub async fn add(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    let name = args.first().map(|a| a.to_uppercase()).unwrap_or_default();
    dash.add_coin(&name).await.map_err(surfaced)?;
    Ok(format!("✅ Now tracking {}", name))
}

/// Accepts the numeric id or the coin name
pub async fn remove(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    let target = args.first().ok_or("Usage: `remove <ID|COIN>`")?;

    let coin_id = match target.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            let name = target.to_uppercase();
            dash.tracked_coins()
                .into_iter()
                .find(|c| c.name == name)
                .map(|c| c.id)
                .ok_or_else(|| format!("{} is not tracked", name))?
        }
    };

    dash.remove_coin(coin_id).await.map_err(surfaced)?;
    Ok("✅ Removed".to_string())
}

pub async fn select(dash: &Dashboard, args: &[String]) -> Result<String, String> {
    let target = args.first().ok_or("Usage: `select <COIN|none>`")?;

    if target.eq_ignore_ascii_case("none") {
        dash.select_coin(None).await;
        return Ok("Selection cleared".to_string());
    }

    let name = target.to_uppercase();
    if !dash.tracked_coins().iter().any(|c| c.name == name) {
        return Err(format!("{} is not tracked. Use `add {}` first.", name, name));
    }

    Ok(describe(&name, dash.select_coin(Some(&name)).await))
}

pub async fn refresh(dash: &Dashboard) -> Result<String, String> {
    let outcome = dash.refresh_selection().await.map_err(surfaced)?;
    let coin = dash.selection().pivot().map(str::to_string).unwrap_or_default();
    Ok(describe(&coin, Some(outcome)))
}

fn describe(coin: &str, outcome: Option<SeriesOutcome>) -> String {
    match outcome {
        None => format!("{} already selected", coin),
        Some(SeriesOutcome::Applied(n)) => format!("📈 {} selected ({} candles)", coin, n),
        // Failure was notified; a stale result means another selection won
        Some(SeriesOutcome::Failed) | Some(SeriesOutcome::Stale) => String::new(),
    }
}
