//! `stockguard-client`
//!
//! **Responsibility:** talk to the StockGuard backend and turn its responses
//! into views.
//!
//! This crate provides:
//! - An HTTP client bound to an explicit [`SessionContext`] (bearer token, username)
//! - One parameterised query-and-render cycle with last-request-wins ordering
//! - Session handlers (login, logout, registration, password reset, profile)
//! - The periodic dashboard refresher and the two chart panels
//!
//! The client is a **thin shell**: the backend is the authority on every rule.
//! Views, notifiers and navigation are traits so the same logic drives a
//! terminal, a browser page (`wasm32`) or a test double.

pub mod account;
pub mod api;
pub mod charts;
pub mod config;
pub mod cycle;
pub mod dashboard;
pub mod inventory;
pub mod navigation;
pub mod notify;
pub mod page;
pub mod render;
pub mod routes;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use account::AccountService;
pub use api::{ApiClient, ApiError, ApiResult, BodyEncoding, QueryParams};
pub use charts::{ChartKind, ChartPanel, ChartSpec, ChartView, PanelContent, Rgba};
pub use config::{ClientConfig, ConfigError};
pub use cycle::{CycleOutcome, NetworkFailurePolicy, QueryCycle, RequestSequence, Ticket};
pub use dashboard::{MemorySummary, SummaryView, refresh_once};
#[cfg(not(target_arch = "wasm32"))]
pub use dashboard::{DashboardRefresher, RefreshHandle};
pub use inventory::{
    DateRange, InventoryApi, InventoryFilter, ReportKind, ReportRequest, SearchPanel, SearchQuery,
};
pub use navigation::{HistoryNavigator, Navigator, Page};
pub use notify::{DialogNotifier, FlashBoard, Notice, NoticeLevel, Notifier};
pub use page::{PageLayout, timer_millis};
pub use render::{
    Card, CardField, CardTemplate, DateLocale, InventoryCardTemplate, MemoryResults, NameTemplate,
    ResultsView,
};
pub use routes::{Auth, Endpoint, Method};
pub use session::{MemorySessionStore, SessionContext, SessionError, SessionKey, SessionStore};
#[cfg(not(target_arch = "wasm32"))]
pub use session::FileSessionStore;
