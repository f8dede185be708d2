use std::rc::Rc;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use coinboard::api::HttpBackend;
use coinboard::commands::{self, toasts, Flow, Session};
use coinboard::config::Config;
use coinboard::dashboard::Dashboard;
use coinboard::services::NotificationBus;

fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("coinboard=debug".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting coinboard...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let backend = match HttpBackend::new(&config.api_base_url, config.request_timeout) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    // All dashboard state lives on this one thread
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            return;
        }
    };

    let local = LocalSet::new();
    local.block_on(&runtime, run(config, Arc::new(backend)));
}

async fn run(config: Config, backend: Arc<HttpBackend>) {
    let bus = Rc::new(NotificationBus::new());
    let dash = Rc::new(Dashboard::new(backend, bus.clone(), config));

    let mut notifications = bus.subscribe();
    tokio::task::spawn_local(async move {
        loop {
            match notifications.recv().await {
                Ok(notification) => println!("{}", toasts::line(&notification)),
                Err(RecvError::Lagged(missed)) => {
                    warn!("notification printer skipped {} messages", missed)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    dash.start().await;
    println!("{}", commands::help::execute());

    // Replies from commands that finished in the background
    let (output, mut replies) = mpsc::unbounded_channel::<String>();
    tokio::task::spawn_local(async move {
        while let Some(reply) = replies.recv().await {
            println!("{}", reply);
        }
    });

    let mut session = Session::new(Rc::clone(&dash), output);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        debug!("command: {}", line.trim());
        match session.handle_line(&line) {
            Flow::Continue(output) if output.is_empty() => {}
            Flow::Continue(output) => println!("{}", output),
            Flow::Quit => break,
        }
    }

    info!("Shutting down");
}
