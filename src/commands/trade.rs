use std::rc::Rc;

use crate::commands::surfaced;
use crate::dashboard::Dashboard;

pub async fn execute(dash: &Rc<Dashboard>) -> Result<String, String> {
    dash.execute_trade().await.map_err(surfaced)?;
    Ok("🤖 Trade cycle triggered, trade log will reload shortly".to_string())
}
