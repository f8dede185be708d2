pub mod api;
pub mod coins;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod services;
pub mod utils;
