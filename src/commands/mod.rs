pub mod balance;
pub mod coins;
pub mod help;
pub mod price;
pub mod toasts;
pub mod trade;
pub mod transaction;

use std::future::Future;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::dashboard::Dashboard;
use crate::services::NotificationView;
use crate::utils::DashboardError;

/// What the input loop should do after a line was handled
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// One terminal's command state.
///
/// Commands that talk to the backend run as local tasks and report through
/// `output` when they finish, so the next line can be read right away.
/// Must be used from inside a `LocalSet`.
pub struct Session {
    dash: Rc<Dashboard>,
    view: NotificationView,
    output: mpsc::UnboundedSender<String>,
}

impl Session {
    pub fn new(dash: Rc<Dashboard>, output: mpsc::UnboundedSender<String>) -> Self {
        Session {
            dash,
            view: NotificationView::new(),
            output,
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Flow {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Flow::Continue(String::new());
        }

        let command = parts[0].to_lowercase();
        let args: Vec<String> = parts[1..].iter().map(|a| a.to_string()).collect();

        let result = match command.as_str() {
            "help" | "h" | "?" => Ok(help::execute()),
            "coins" | "ls" => coins::list(&self.dash, &args),
            "add" => self.spawn(move |dash| async move { coins::add(&dash, &args).await }),
            "remove" | "rm" => {
                self.spawn(move |dash| async move { coins::remove(&dash, &args).await })
            }
            "select" | "sel" => {
                self.spawn(move |dash| async move { coins::select(&dash, &args).await })
            }
            "refresh" => self.spawn(|dash| async move { coins::refresh(&dash).await }),
            "price" => price::execute(&self.dash),
            "tx" | "transactions" => {
                self.spawn(move |dash| async move { transaction::execute(&dash, &args).await })
            }
            "more" => self.spawn(|dash| async move { transaction::more(&dash).await }),
            "reason" => transaction::reason(&self.dash, &args),
            "trade" => self.spawn(|dash| async move { trade::execute(&dash).await }),
            "balance" | "bal" => {
                self.spawn(move |dash| async move { balance::execute(&dash, &args).await })
            }
            "toasts" => Ok(toasts::list(&self.dash, &self.view)),
            "dismiss" => toasts::dismiss(&self.dash, &mut self.view, &args),
            "quit" | "exit" | "q" => return Flow::Quit,
            other => Err(format!("Unknown command `{}`. Type `help` for a list.", other)),
        };

        Flow::Continue(render(result))
    }

    /// Run a command in the background; its reply goes to `output`
    fn spawn<F, Fut>(&self, job: F) -> Result<String, String>
    where
        F: FnOnce(Rc<Dashboard>) -> Fut,
        Fut: Future<Output = Result<String, String>> + 'static,
    {
        let output = self.output.clone();
        let job = job(Rc::clone(&self.dash));
        tokio::task::spawn_local(async move {
            let reply = render(job.await);
            if !reply.is_empty() {
                let _ = output.send(reply);
            }
        });
        Ok(String::new())
    }
}

fn render(result: Result<String, String>) -> String {
    match result {
        Ok(output) => output,
        // Empty errors were already reported through the notification bus
        Err(e) if e.is_empty() => String::new(),
        Err(e) => format!("❌ {}", e),
    }
}

/// Dashboard errors reach the user as notifications; the command itself stays quiet
pub(crate) fn surfaced(error: DashboardError) -> String {
    debug!("command failed: {}", error);
    String::new()
}
