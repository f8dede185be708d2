//! Incremental loading of cursor-paged collections
//!
//! [`Paginator`] is a plain state machine: `begin_*` decides whether a fetch
//! may be issued and hands back a [`PageRequest`], and `complete` folds the
//! fetch result back in. Keeping the I/O outside lets the transaction feed and
//! the balance feed share one implementation, and lets the dashboard run the
//! fetch without holding a borrow across the await (see [`load_page`]).

use std::cell::RefCell;
use std::future::Future;

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::{Cursor, NewNotification, Page};
use crate::services::notifications::NotificationBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    First,
    More,
}

/// A fetch the paginator has agreed to issue
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub kind: PageKind,
    /// None for the first page
    pub cursor: Option<Cursor>,
    session: u64,
}

/// What `complete` did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Replaced(usize),
    Appended(usize),
    Failed,
    /// The feed was reset after the request was issued; result dropped
    Stale,
}

pub struct Paginator<T> {
    label: &'static str,
    items: Vec<T>,
    cursor: Option<Cursor>,
    has_next: bool,
    in_flight: bool,
    /// Bumped by `reset` so results from before the reset are ignored
    session: u64,
}

impl<T> Paginator<T> {
    /// `label` names the collection in logs and error notifications
    pub fn new(label: &'static str) -> Self {
        Paginator {
            label,
            items: Vec::new(),
            cursor: None,
            has_next: false,
            in_flight: false,
            session: 0,
        }
    }

    /// Accumulated items in arrival order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Start loading the first page. None while another fetch is in flight.
    ///
    /// The accumulated items are only replaced once the page arrives, so a
    /// failed reload keeps what is already on screen.
    pub fn begin_first(&mut self) -> Option<PageRequest> {
        if self.in_flight {
            debug!("{}: first page already loading", self.label);
            return None;
        }

        self.in_flight = true;
        Some(PageRequest {
            kind: PageKind::First,
            cursor: None,
            session: self.session,
        })
    }

    /// Start loading the page after the stored cursor.
    /// None if there is no next page, a fetch is in flight, or no cursor to resume from.
    pub fn begin_more(&mut self) -> Option<PageRequest> {
        if !self.has_next || self.in_flight {
            return None;
        }

        let Some(cursor) = self.cursor.clone() else {
            warn!("{}: server reported more pages without a cursor", self.label);
            return None;
        };

        self.in_flight = true;
        Some(PageRequest {
            kind: PageKind::More,
            cursor: Some(cursor),
            session: self.session,
        })
    }

    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Page<T>, ApiError>,
        bus: &NotificationBus,
    ) -> PageOutcome {
        if request.session != self.session {
            debug!("{}: dropping page from before reset", self.label);
            return PageOutcome::Stale;
        }

        self.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("{}: failed to load page: {}", self.label, e);
                bus.emit(
                    NewNotification::destructive("Error")
                        .with_body(format!("Failed to load {}: {}", self.label, e.user_message())),
                );
                return PageOutcome::Failed;
            }
        };

        self.cursor = page.next_cursor;
        self.has_next = page.has_next;
        let count = page.items.len();

        match request.kind {
            PageKind::First => {
                self.items = page.items;
                debug!("{}: loaded first page ({} items)", self.label, count);
                PageOutcome::Replaced(count)
            }
            PageKind::More => {
                self.items.extend(page.items);
                debug!(
                    "{}: appended {} items ({} total)",
                    self.label,
                    count,
                    self.items.len()
                );
                PageOutcome::Appended(count)
            }
        }
    }

    /// Empty the feed and forget any fetch in flight
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.has_next = false;
        self.in_flight = false;
        self.session += 1;
    }
}

/// Run one paginator step: begin, fetch, complete.
///
/// `begin` is `Paginator::begin_first` or `Paginator::begin_more`. The
/// `RefCell` is only borrowed before and after the fetch, never across it,
/// so other tasks on the same thread can read the feed meanwhile.
/// Returns None when `begin` declined to issue a fetch.
pub async fn load_page<T, F, Fut>(
    feed: &RefCell<Paginator<T>>,
    begin: fn(&mut Paginator<T>) -> Option<PageRequest>,
    fetch: F,
    bus: &NotificationBus,
) -> Option<PageOutcome>
where
    F: FnOnce(Option<Cursor>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let request = begin(&mut feed.borrow_mut())?;
    let result = fetch(request.cursor.clone()).await;
    let outcome = feed.borrow_mut().complete(request, result, bus);
    Some(outcome)
}
