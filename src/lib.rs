//! Basecamp booking and administration server
//!
//! REST JSON API behind an outdoor-education centre: public program
//! registration with pricing, QR confirmations and email receipts, plus the
//! staff portals for registrations, leads, accounts and vendors.

use std::sync::Arc;

pub mod api;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
