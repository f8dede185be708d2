pub mod balance_service;
pub mod classifier;
pub mod coin_service;
pub mod notifications;
pub mod paginator;
pub mod price_service;
pub mod selection;
pub mod trade_service;

pub use classifier::{classify, classify_transaction, reveal_reason, Rationale, ReasonDetail};
pub use notifications::{NotificationBus, NotificationView};
pub use paginator::{load_page, PageKind, PageOutcome, PageRequest, Paginator};
pub use selection::{Selection, SelectionCoordinator, SeriesOutcome, SeriesRequest};
