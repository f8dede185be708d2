//! The selected-coin pivot and its price series
//!
//! Every pivot change bumps a generation counter, and each series fetch is
//! tagged with the generation it was issued under. A result is applied only
//! if its tag still matches the current generation when it arrives; anything
//! else (success or failure) belongs to a selection the user already left and
//! is dropped without a trace in the UI. Overlapping fetches are allowed to
//! run to completion on the wire.

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::{NewNotification, OhlcvRow};
use crate::services::notifications::NotificationBus;

/// A price-series fetch issued for one selection epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub coin: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Idle,
    Active { coin: &'a str, generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    Applied(usize),
    Failed,
    /// Issued under an older generation; dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    pivot: Option<String>,
    generation: u64,
    series: Vec<OhlcvRow>,
    loading: bool,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Selection<'_> {
        match &self.pivot {
            Some(coin) => Selection::Active {
                coin,
                generation: self.generation,
            },
            None => Selection::Idle,
        }
    }

    pub fn pivot(&self) -> Option<&str> {
        self.pivot.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Series for the current pivot; empty while loading or when idle
    pub fn series(&self) -> &[OhlcvRow] {
        &self.series
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Change the pivot. Returns the one fetch to issue, if any.
    ///
    /// Re-selecting the current pivot does nothing. Selecting `None` goes
    /// idle and issues no fetch. Either way the previous series is cleared
    /// right away so it can never be shown under the new selection.
    pub fn select(&mut self, pivot: Option<&str>) -> Option<SeriesRequest> {
        if self.pivot.as_deref() == pivot {
            return None;
        }

        self.generation += 1;
        self.series.clear();
        self.pivot = pivot.map(str::to_string);

        match pivot {
            Some(coin) => {
                debug!("selected {} (generation {})", coin, self.generation);
                self.loading = true;
                Some(SeriesRequest {
                    coin: coin.to_string(),
                    generation: self.generation,
                })
            }
            None => {
                debug!("selection cleared (generation {})", self.generation);
                self.loading = false;
                None
            }
        }
    }

    /// Refetch the current pivot under a new generation
    pub fn refresh(&mut self) -> Option<SeriesRequest> {
        let coin = self.pivot.clone()?;
        self.generation += 1;
        self.loading = true;
        Some(SeriesRequest {
            coin,
            generation: self.generation,
        })
    }

    pub fn complete(
        &mut self,
        request: &SeriesRequest,
        result: Result<Vec<OhlcvRow>, ApiError>,
        bus: &NotificationBus,
    ) -> SeriesOutcome {
        if request.generation != self.generation {
            debug!(
                "dropping stale series for {} (generation {}, current {})",
                request.coin, request.generation, self.generation
            );
            return SeriesOutcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(rows) => {
                let count = rows.len();
                self.series = rows;
                SeriesOutcome::Applied(count)
            }
            Err(e) => {
                warn!("failed to load price series for {}: {}", request.coin, e);
                self.series.clear();
                bus.emit(NewNotification::destructive("Error").with_body(format!(
                    "Failed to load price data for {}: {}",
                    request.coin,
                    e.user_message()
                )));
                SeriesOutcome::Failed
            }
        }
    }
}
