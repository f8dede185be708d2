//! Dashboard state and the async operations that drive it
//!
//! Everything runs on one thread. State sits in `RefCell`s that are borrowed
//! only between awaits, so overlapping operations (a slow price fetch and a
//! feed reload, or two rapid selections) interleave safely; the generation
//! tags and in-flight guards in the services decide whose results land.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::Backend;
use crate::config::Config;
use crate::models::{BalanceSnapshot, Coin, Transaction};
use crate::services::{
    coin_service, load_page, reveal_reason, trade_service, NotificationBus, PageOutcome,
    PageRequest, Paginator, ReasonDetail, SelectionCoordinator, SeriesOutcome,
};
use crate::utils::{DashboardError, ValidationError};

pub struct Dashboard {
    backend: Arc<dyn Backend>,
    bus: Rc<NotificationBus>,
    config: Config,
    coins: RefCell<Vec<Coin>>,
    selection: RefCell<SelectionCoordinator>,
    transactions: RefCell<Paginator<Transaction>>,
    balances: RefCell<Paginator<BalanceSnapshot>>,
    executing: Cell<bool>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>, bus: Rc<NotificationBus>, config: Config) -> Self {
        Dashboard {
            backend,
            bus,
            config,
            coins: RefCell::new(Vec::new()),
            selection: RefCell::new(SelectionCoordinator::new()),
            transactions: RefCell::new(Paginator::new("transaction history")),
            balances: RefCell::new(Paginator::new("balance history")),
            executing: Cell::new(false),
        }
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Initial load of everything that does not depend on a selection
    pub async fn start(&self) {
        info!("loading dashboard from {}", self.config.api_base_url);
        tokio::join!(
            self.refresh_coins(),
            self.load_transactions(),
            self.load_balances()
        );
    }

    // Tracked coins

    pub fn tracked_coins(&self) -> Vec<Coin> {
        self.coins.borrow().clone()
    }

    pub async fn refresh_coins(&self) {
        if let Some(coins) = coin_service::fetch_tracked_coins(self.backend.as_ref(), &self.bus).await
        {
            debug!("tracking {} coins", coins.len());
            *self.coins.borrow_mut() = coins;
        }
    }

    pub async fn add_coin(&self, name: &str) -> Result<(), DashboardError> {
        let tracked = self.tracked_coins();
        coin_service::add_coin(self.backend.as_ref(), &self.bus, &tracked, name).await?;
        self.refresh_coins().await;
        Ok(())
    }

    /// Removing the selected coin also clears the selection
    pub async fn remove_coin(&self, coin_id: i64) -> Result<(), DashboardError> {
        let tracked = self.tracked_coins();
        let removed =
            coin_service::remove_coin(self.backend.as_ref(), &self.bus, &tracked, coin_id).await?;

        if self.selection.borrow().pivot() == Some(removed.name.as_str()) {
            self.select_coin(None).await;
        }

        self.refresh_coins().await;
        Ok(())
    }

    // Selection

    pub fn selection(&self) -> Ref<'_, SelectionCoordinator> {
        self.selection.borrow()
    }

    /// Change the selected coin and load its price series.
    ///
    /// Returns None when no fetch was needed (same coin, or deselect).
    pub async fn select_coin(&self, coin: Option<&str>) -> Option<SeriesOutcome> {
        // Generation bump and request creation happen in this one borrow
        let request = self.selection.borrow_mut().select(coin)?;
        let result = self.backend.get_price_series(&request.coin).await;
        Some(self.selection.borrow_mut().complete(&request, result, &self.bus))
    }

    /// Reload the selected coin's series
    pub async fn refresh_selection(&self) -> Result<SeriesOutcome, DashboardError> {
        let request = self.selection.borrow_mut().refresh();
        let Some(request) = request else {
            return Err(coin_service::reject(&self.bus, ValidationError::MissingSelection));
        };
        let result = self.backend.get_price_series(&request.coin).await;
        Ok(self.selection.borrow_mut().complete(&request, result, &self.bus))
    }

    // Trade log

    pub fn transactions(&self) -> Ref<'_, Paginator<Transaction>> {
        self.transactions.borrow()
    }

    pub async fn load_transactions(&self) -> Option<PageOutcome> {
        self.transaction_page(Paginator::begin_first).await
    }

    pub async fn load_more_transactions(&self) -> Option<PageOutcome> {
        self.transaction_page(Paginator::begin_more).await
    }

    /// Empty the trade log. A page still in flight is dropped when it lands.
    pub fn reset_transactions(&self) {
        debug!("resetting transaction history");
        self.transactions.borrow_mut().reset();
    }

    async fn transaction_page(
        &self,
        begin: fn(&mut Paginator<Transaction>) -> Option<PageRequest>,
    ) -> Option<PageOutcome> {
        let backend = self.backend.as_ref();
        let limit = self.config.transaction_page_limit;
        load_page(
            &self.transactions,
            begin,
            move |cursor| async move { backend.get_transactions(cursor.as_ref(), limit).await },
            &self.bus,
        )
        .await
    }

    /// Reason text for one trade log row, if it has any
    pub fn reveal_reason(&self, transaction_id: i64) -> Option<ReasonDetail> {
        self.transactions
            .borrow()
            .items()
            .iter()
            .find(|tx| tx.id == transaction_id)
            .and_then(reveal_reason)
    }

    /// Trigger a trade cycle.
    ///
    /// On success the trade log reload is scheduled on the local task set
    /// after the configured delay; this returns without waiting for it.
    pub async fn execute_trade(self: &Rc<Self>) -> Result<(), DashboardError> {
        if self.executing.get() {
            return Err(coin_service::reject(&self.bus, ValidationError::TradeInProgress));
        }

        self.executing.set(true);
        let result = trade_service::execute_trade_cycle(self.backend.as_ref(), &self.bus).await;
        self.executing.set(false);
        result?;

        let dash = Rc::clone(self);
        tokio::task::spawn_local(async move {
            tokio::time::sleep(dash.config.trade_refresh_delay).await;
            dash.load_transactions().await;
        });
        Ok(())
    }

    pub fn is_executing(&self) -> bool {
        self.executing.get()
    }

    // Balance history

    pub fn balances(&self) -> Ref<'_, Paginator<BalanceSnapshot>> {
        self.balances.borrow()
    }

    pub async fn load_balances(&self) -> Option<PageOutcome> {
        self.balance_page(Paginator::begin_first).await
    }

    pub async fn load_more_balances(&self) -> Option<PageOutcome> {
        self.balance_page(Paginator::begin_more).await
    }

    pub fn reset_balances(&self) {
        debug!("resetting balance history");
        self.balances.borrow_mut().reset();
    }

    async fn balance_page(
        &self,
        begin: fn(&mut Paginator<BalanceSnapshot>) -> Option<PageRequest>,
    ) -> Option<PageOutcome> {
        let backend = self.backend.as_ref();
        let limit = self.config.balance_page_limit;
        load_page(
            &self.balances,
            begin,
            move |cursor| async move { backend.get_balance_history(cursor.as_ref(), limit).await },
            &self.bus,
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{Action, Cursor, OhlcvRow, Page};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::task::LocalSet;

    type SeriesResult = Result<Vec<OhlcvRow>, ApiError>;

    /// Scriptable backend. Price series can be held back with a oneshot
    /// channel to control completion order.
    #[derive(Default)]
    pub(crate) struct MockBackend {
        pub calls: Mutex<Vec<String>>,
        pub coins: Mutex<Vec<Coin>>,
        pub series: Mutex<HashMap<String, oneshot::Receiver<SeriesResult>>>,
        pub transaction_pages: Mutex<VecDeque<Result<Page<Transaction>, ApiError>>>,
        pub balance_pages: Mutex<VecDeque<Result<Page<BalanceSnapshot>, ApiError>>>,
        /// When set, the next transaction fetch waits for this signal
        pub transaction_gate: Mutex<Option<oneshot::Receiver<()>>>,
        pub fail_writes: bool,
    }

    impl MockBackend {
        pub fn with_coins(names: &[&str]) -> Self {
            let coins = names
                .iter()
                .enumerate()
                .map(|(i, name)| Coin {
                    id: i as i64 + 1,
                    name: name.to_string(),
                })
                .collect();
            MockBackend {
                coins: Mutex::new(coins),
                ..Default::default()
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn write_result(&self) -> Result<(), ApiError> {
            if self.fail_writes {
                Err(ApiError::ServerError(500, "boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn list_tracked_coins(&self) -> Result<Vec<Coin>, ApiError> {
            self.record("list".to_string());
            Ok(self.coins.lock().unwrap().clone())
        }

        async fn add_tracked_coin(&self, name: &str) -> Result<(), ApiError> {
            self.record(format!("add:{}", name));
            self.write_result()?;
            let mut coins = self.coins.lock().unwrap();
            let id = coins.len() as i64 + 1;
            coins.push(Coin {
                id,
                name: name.to_string(),
            });
            Ok(())
        }

        async fn remove_tracked_coin(&self, coin_id: i64) -> Result<(), ApiError> {
            self.record(format!("remove:{}", coin_id));
            self.write_result()?;
            self.coins.lock().unwrap().retain(|c| c.id != coin_id);
            Ok(())
        }

        async fn get_price_series(&self, coin_name: &str) -> Result<Vec<OhlcvRow>, ApiError> {
            self.record(format!("series:{}", coin_name));
            let held = self.series.lock().unwrap().remove(coin_name);
            match held {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::RequestError("dropped".to_string()))),
                None => Ok(Vec::new()),
            }
        }

        async fn execute_trade_cycle(&self) -> Result<(), ApiError> {
            self.record("trade".to_string());
            tokio::task::yield_now().await;
            self.write_result()
        }

        async fn get_transactions(
            &self,
            cursor: Option<&Cursor>,
            limit: u32,
        ) -> Result<Page<Transaction>, ApiError> {
            self.record(format!(
                "transactions:{}:{}",
                cursor.map(Cursor::to_string).unwrap_or_default(),
                limit
            ));
            // Stay pending for one poll so callers can overlap
            tokio::task::yield_now().await;
            let gate = self.transaction_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let next = self.transaction_pages.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(Page::new(Vec::new(), None, false)))
        }

        async fn get_balance_history(
            &self,
            cursor: Option<&Cursor>,
            limit: u32,
        ) -> Result<Page<BalanceSnapshot>, ApiError> {
            self.record(format!(
                "balances:{}:{}",
                cursor.map(Cursor::to_string).unwrap_or_default(),
                limit
            ));
            let next = self.balance_pages.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(Page::new(Vec::new(), None, false)))
        }
    }

    pub(crate) fn transaction(id: i64, price: f64, amount: f64) -> Transaction {
        Transaction {
            id,
            coin_id: Some(1),
            coin_name: Some("BTC".to_string()),
            trade_type: None,
            price,
            amount,
            risk_level: Default::default(),
            status: Default::default(),
            timestamp: "2025-11-07 22:45:00".to_string(),
            primary_reason: None,
            fallback_reason: None,
        }
    }

    fn candle(close: f64) -> OhlcvRow {
        OhlcvRow {
            timestamp: "2025-11-07T09:00:00".to_string(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
            value: close,
        }
    }

    fn dashboard(mock: Arc<MockBackend>) -> Rc<Dashboard> {
        let config = Config {
            trade_refresh_delay: Duration::ZERO,
            ..Config::default()
        };
        Rc::new(Dashboard::new(mock, Rc::new(NotificationBus::new()), config))
    }

    #[tokio::test]
    async fn test_late_series_from_previous_selection_is_discarded() {
        let mock = Arc::new(MockBackend::with_coins(&["BTC", "ETH"]));
        let (btc_tx, btc_rx) = oneshot::channel();
        let (eth_tx, eth_rx) = oneshot::channel();
        {
            let mut series = mock.series.lock().unwrap();
            series.insert("BTC".to_string(), btc_rx);
            series.insert("ETH".to_string(), eth_rx);
        }
        let dash = dashboard(mock.clone());

        let driver = async {
            // Both selections have issued their fetch by now
            tokio::task::yield_now().await;
            assert!(eth_tx.send(Ok(vec![candle(2.0)])).is_ok());
            while dash.selection().series().is_empty() {
                tokio::task::yield_now().await;
            }
            // BTC "succeeds" after ETH was applied
            assert!(btc_tx.send(Ok(vec![candle(1.0), candle(1.1)])).is_ok());
        };

        let (btc, eth, ()) = tokio::join!(
            dash.select_coin(Some("BTC")),
            dash.select_coin(Some("ETH")),
            driver
        );

        assert_eq!(btc, Some(SeriesOutcome::Stale));
        assert_eq!(eth, Some(SeriesOutcome::Applied(1)));
        assert_eq!(dash.selection().series(), &[candle(2.0)]);
        assert_eq!(dash.selection().pivot(), Some("ETH"));
        assert_eq!(mock.count("series:"), 2);
        assert!(dash.bus().is_empty());
    }

    #[tokio::test]
    async fn test_reselecting_same_coin_does_not_refetch() {
        let mock = Arc::new(MockBackend::with_coins(&["BTC"]));
        let dash = dashboard(mock.clone());

        assert_eq!(dash.select_coin(Some("BTC")).await, Some(SeriesOutcome::Applied(0)));
        assert_eq!(dash.select_coin(Some("BTC")).await, None);
        assert_eq!(mock.count("series:"), 1);

        // Explicit refresh is the way to refetch
        assert_eq!(dash.refresh_selection().await.ok(), Some(SeriesOutcome::Applied(0)));
        assert_eq!(mock.count("series:"), 2);
    }

    #[tokio::test]
    async fn test_refresh_without_selection_is_rejected() {
        let mock = Arc::new(MockBackend::default());
        let dash = dashboard(mock.clone());

        let err = dash.refresh_selection().await.expect_err("nothing selected");
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::MissingSelection)
        ));
        assert_eq!(mock.count("series:"), 0);
        assert_eq!(dash.bus().destructive_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected_without_a_request() {
        let mock = Arc::new(MockBackend::with_coins(&["BTC", "ETH"]));
        let dash = dashboard(mock.clone());
        dash.start().await;

        let err = dash.add_coin("BTC").await.expect_err("BTC already tracked");
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::AlreadyTracked(ref name)) if name == "BTC"
        ));
        assert_eq!(mock.count("add:"), 0);
        assert_eq!(dash.bus().destructive_count(), 1);
    }

    #[tokio::test]
    async fn test_add_coin_refetches_confirmed_list() {
        let mock = Arc::new(MockBackend::with_coins(&["BTC"]));
        let dash = dashboard(mock.clone());
        dash.refresh_coins().await;

        dash.add_coin("XRP").await.expect("XRP can be added");

        let names: Vec<String> = dash.tracked_coins().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["BTC", "XRP"]);
        assert_eq!(mock.count("list"), 2);
        assert_eq!(dash.bus().destructive_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_local_list_alone() {
        let mock = Arc::new(MockBackend {
            fail_writes: true,
            ..MockBackend::with_coins(&["BTC"])
        });
        let dash = dashboard(mock.clone());
        dash.refresh_coins().await;

        let err = dash.add_coin("ETH").await.expect_err("server rejects");
        assert!(matches!(err, DashboardError::Fetch(_)));
        assert_eq!(dash.tracked_coins().len(), 1);
        assert_eq!(mock.count("list"), 1);
        assert_eq!(dash.bus().destructive_count(), 1);
    }

    #[tokio::test]
    async fn test_removing_selected_coin_clears_selection() {
        let mock = Arc::new(MockBackend::with_coins(&["BTC", "ETH"]));
        let dash = dashboard(mock.clone());
        dash.refresh_coins().await;
        dash.select_coin(Some("BTC")).await;

        dash.remove_coin(1).await.expect("BTC removed");

        assert_eq!(dash.selection().pivot(), None);
        assert_eq!(dash.tracked_coins().len(), 1);

        let err = dash.remove_coin(42).await.expect_err("unknown id");
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::UnknownCoin(42))
        ));
        assert_eq!(mock.count("remove:"), 1);
    }

    #[tokio::test]
    async fn test_transaction_feed_pages_and_derives_totals() {
        let mock = Arc::new(MockBackend::default());
        let mut reasoned = transaction(2, 50.0, 1.0);
        reasoned.primary_reason = Some("RSI divergence, sell into strength".to_string());
        {
            let mut pages = mock.transaction_pages.lock().unwrap();
            pages.push_back(Ok(Page::new(
                vec![transaction(1, 100.0, 2.0)],
                Some(Cursor::from("5")),
                true,
            )));
            pages.push_back(Ok(Page::new(vec![reasoned], None, false)));
        }
        let dash = dashboard(mock.clone());

        assert_eq!(dash.load_transactions().await, Some(PageOutcome::Replaced(1)));
        assert_eq!(dash.transactions().items()[0].total_value(), 200.0);
        assert!(dash.transactions().has_next());

        assert_eq!(dash.load_more_transactions().await, Some(PageOutcome::Appended(1)));
        let ids: Vec<i64> = dash.transactions().items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!dash.transactions().has_next());

        let calls = mock.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["transactions::20", "transactions:5:20"]);

        let detail = dash.reveal_reason(2).expect("row 2 has a reason");
        assert_eq!(detail.action, Action::Sell);
        assert!(dash.reveal_reason(1).is_none());
    }

    #[tokio::test]
    async fn test_overlapping_first_loads_issue_one_fetch() {
        let mock = Arc::new(MockBackend::default());
        let dash = dashboard(mock.clone());

        let (first, second) = tokio::join!(dash.load_transactions(), dash.load_transactions());

        assert_eq!(first, Some(PageOutcome::Replaced(0)));
        assert_eq!(second, None);
        assert_eq!(mock.count("transactions:"), 1);
    }

    #[tokio::test]
    async fn test_trade_cycle_reloads_feed() {
        let mock = Arc::new(MockBackend::default());
        mock.transaction_pages
            .lock()
            .unwrap()
            .push_back(Ok(Page::new(vec![transaction(9, 1.0, 1.0)], None, false)));
        let dash = dashboard(mock.clone());

        LocalSet::new()
            .run_until(async {
                dash.execute_trade().await.expect("trade triggered");
                assert!(!dash.is_executing());

                while dash.transactions().is_empty() {
                    tokio::task::yield_now().await;
                }
            })
            .await;

        assert_eq!(mock.count("trade"), 1);
        assert_eq!(mock.count("transactions:"), 1);
        assert_eq!(dash.bus().len(), 1);
    }

    #[tokio::test]
    async fn test_trade_returns_before_delayed_reload() {
        let mock = Arc::new(MockBackend::default());
        let config = Config {
            trade_refresh_delay: Duration::from_secs(60),
            ..Config::default()
        };
        let dash = Rc::new(Dashboard::new(
            mock.clone(),
            Rc::new(NotificationBus::new()),
            config,
        ));

        let started = std::time::Instant::now();
        LocalSet::new()
            .run_until(async {
                dash.execute_trade().await.expect("trade triggered");
            })
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(mock.count("transactions:"), 0);
    }

    #[tokio::test]
    async fn test_second_trade_while_running_is_rejected() {
        let mock = Arc::new(MockBackend::default());
        let dash = dashboard(mock.clone());

        let (first, second) = LocalSet::new()
            .run_until(async { tokio::join!(dash.execute_trade(), dash.execute_trade()) })
            .await;

        let rejected = [&first, &second]
            .into_iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(DashboardError::Validation(ValidationError::TradeInProgress))
                )
            })
            .count();
        assert!(first.is_ok() || second.is_ok());
        assert_eq!(rejected, 1);
        assert_eq!(mock.count("trade"), 1);
        assert_eq!(dash.bus().destructive_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_trade_cycle_does_not_reload() {
        let mock = Arc::new(MockBackend {
            fail_writes: true,
            ..MockBackend::default()
        });
        let dash = dashboard(mock.clone());

        let err = dash.execute_trade().await.expect_err("server fails");
        assert!(matches!(err, DashboardError::Fetch(_)));
        assert_eq!(mock.count("transactions:"), 0);
        assert_eq!(dash.bus().destructive_count(), 1);
        assert!(!dash.is_executing());
    }

    #[tokio::test]
    async fn test_reset_drops_page_in_flight() {
        let mock = Arc::new(MockBackend::default());
        {
            let mut pages = mock.transaction_pages.lock().unwrap();
            pages.push_back(Ok(Page::new(
                vec![transaction(1, 1.0, 1.0)],
                Some(Cursor::from("5")),
                true,
            )));
            pages.push_back(Ok(Page::new(vec![transaction(2, 1.0, 1.0)], None, false)));
        }
        let dash = dashboard(mock.clone());
        dash.load_transactions().await;

        let (gate_tx, gate_rx) = oneshot::channel();
        *mock.transaction_gate.lock().unwrap() = Some(gate_rx);

        let driver = async {
            while !dash.transactions().is_loading() {
                tokio::task::yield_now().await;
            }
            dash.reset_transactions();
            assert!(gate_tx.send(()).is_ok());
        };
        let (more, ()) = tokio::join!(dash.load_more_transactions(), driver);

        assert_eq!(more, Some(PageOutcome::Stale));
        assert!(dash.transactions().is_empty());
        assert!(!dash.transactions().has_next());
        assert!(dash.bus().is_empty());

        // Starts over from the first page
        assert_eq!(dash.load_transactions().await, Some(PageOutcome::Replaced(0)));
        let calls = mock.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec!["transactions::20", "transactions:5:20", "transactions::20"]
        );
    }

    #[tokio::test]
    async fn test_balance_feed_uses_its_own_state() {
        let mock = Arc::new(MockBackend::default());
        mock.balance_pages.lock().unwrap().push_back(Err(ApiError::Timeout("10s".to_string())));
        let dash = dashboard(mock.clone());

        assert_eq!(dash.load_balances().await, Some(PageOutcome::Failed));
        assert_eq!(dash.load_transactions().await, Some(PageOutcome::Replaced(0)));
        assert_eq!(dash.bus().destructive_count(), 1);
        assert_eq!(mock.count("balances::100"), 1);
    }
}
