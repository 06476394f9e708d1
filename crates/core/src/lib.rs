//! `stockguard-core` — data shapes shared by every StockGuard client surface.
//!
//! This crate contains **pure data** (no HTTP, no storage, no rendering).
//! Everything here mirrors what the backend sends or accepts; the client
//! enforces no inventory invariants of its own.

pub mod account;
pub mod dashboard;
pub mod error;
pub mod item;

pub use account::{
    Credentials, PasswordReset, PasswordResetRequest, ProfileUpdate, Registration, Role,
};
pub use dashboard::DashboardSummary;
pub use error::{DomainError, DomainResult};
pub use item::{InventoryItem, Listing, NamedRecord, StockLevel};
