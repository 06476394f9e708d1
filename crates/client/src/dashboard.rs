//! Periodic dashboard summary refresh.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(target_arch = "wasm32"))]
use std::{sync::Arc, time::Duration};

use stockguard_core::DashboardSummary;

use crate::api::{ApiClient, ApiResult, QueryParams};
use crate::routes;

/// The four summary text fields.
pub trait SummaryView: Send + Sync {
    fn show(&self, summary: &DashboardSummary);
}

/// Summary fields held in memory.
#[derive(Debug, Default)]
pub struct MemorySummary {
    labels: Mutex<Option<[String; 4]>>,
    updates: AtomicUsize,
}

impl MemorySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Option<[String; 4]> {
        self.labels.lock().ok().and_then(|l| l.clone())
    }

    /// Number of successful refreshes shown so far.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl SummaryView for MemorySummary {
    fn show(&self, summary: &DashboardSummary) {
        if let Ok(mut labels) = self.labels.lock() {
            *labels = Some(summary.labels());
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fetch the summary once and show it.
pub async fn refresh_once<V: SummaryView + ?Sized>(
    client: &ApiClient,
    view: &V,
) -> ApiResult<DashboardSummary> {
    let summary: DashboardSummary = client
        .get_json(&routes::DASHBOARD_DATA, &QueryParams::new())
        .await?;
    view.show(&summary);
    Ok(summary)
}

/// Timer that refreshes the summary on a fixed interval.
///
/// The first refresh happens immediately. Failures are logged and do not
/// change the schedule. In the browser the page drives [`refresh_once`] from
/// `setInterval` instead.
#[cfg(not(target_arch = "wasm32"))]
pub struct DashboardRefresher {
    client: ApiClient,
    interval: Duration,
    shutdown: Arc<tokio::sync::Notify>,
}

#[cfg(not(target_arch = "wasm32"))]
impl DashboardRefresher {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(client: ApiClient) -> Self {
        Self::with_interval(client, Self::DEFAULT_INTERVAL)
    }

    pub fn with_interval(client: ApiClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            shutdown: Arc::new(tokio::sync::Notify::new()),
        }
    }

    /// Spawn the refresh loop.
    pub fn start<V>(self, view: Arc<V>) -> RefreshHandle
    where
        V: SummaryView + ?Sized + 'static,
    {
        let shutdown = self.shutdown.clone();
        let client = self.client;
        let period = self.interval;

        let task = tokio::spawn(async move {
            tracing::info!(interval_secs = period.as_secs_f64(), "dashboard refresh started");

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::info!("dashboard refresh received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        match refresh_once(&client, view.as_ref()).await {
                            Ok(summary) => {
                                tracing::debug!(total_items = summary.total_items, "dashboard refreshed");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "dashboard refresh failed");
                            }
                        }
                    }
                }
            }

            tracing::info!("dashboard refresh stopped");
        });

        RefreshHandle {
            shutdown: self.shutdown,
            task,
        }
    }
}

/// Running refresh loop.
#[cfg(not(target_arch = "wasm32"))]
pub struct RefreshHandle {
    shutdown: Arc<tokio::sync::Notify>,
    task: tokio::task::JoinHandle<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RefreshHandle {
    /// Ask the loop to stop after the refresh in flight, if any.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Stop the loop and wait for it to finish.
    pub async fn stop(self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "dashboard refresh task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
