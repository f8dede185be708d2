pub mod backend;

pub use backend::{ApiError, Backend, HttpBackend};
