//! Typed helpers for the inventory routes, and the dashboard search panel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chrono::NaiveDate;

use stockguard_core::{
    DashboardSummary, DomainError, DomainResult, InventoryItem, Listing, NamedRecord, StockLevel,
};

use crate::api::{ApiClient, ApiResult, BodyEncoding, QueryParams};
use crate::cycle::{CycleOutcome, NetworkFailurePolicy, QueryCycle, RequestSequence};
use crate::notify::Notifier;
use crate::render::{DateLocale, InventoryCardTemplate, NameTemplate, ResultsView};
use crate::routes::{self, Endpoint};

/// Free-text search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new().with("query", self.query.as_str())
    }
}

/// The three filter inputs, plus optional paging. Blank fields are still sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub material: String,
    pub product_name: String,
    pub location: String,
    /// 1-based page; the backend defaults to 1.
    pub page: Option<u32>,
    /// Rows per page; the backend defaults to 10.
    pub per_page: Option<u32>,
}

impl InventoryFilter {
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("material", self.material.as_str())
            .with("product_name", self.product_name.as_str())
            .with("location", self.location.as_str());
        if let Some(page) = self.page {
            params.push("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            params.push("per_page", per_page.to_string());
        }
        params
    }
}

/// Downloadable spreadsheet reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportKind {
    ExpiringSoon,
    BelowThreshold,
    InventoryLevels,
    UserActivity,
    /// Stock taken out over a date range.
    InventoryTaken,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::ExpiringSoon,
        ReportKind::BelowThreshold,
        ReportKind::InventoryLevels,
        ReportKind::UserActivity,
        ReportKind::InventoryTaken,
    ];

    pub fn endpoint(&self) -> Endpoint {
        match self {
            ReportKind::ExpiringSoon => routes::EXPIRING_SOON,
            ReportKind::BelowThreshold => routes::BELOW_THRESHOLD,
            ReportKind::InventoryLevels => routes::REPORT_INVENTORY_LEVELS,
            ReportKind::UserActivity => routes::REPORT_USER_ACTIVITY,
            ReportKind::InventoryTaken => routes::REPORT_INVENTORY_TAKEN,
        }
    }

    /// Name as typed on the command line and used in the route.
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::ExpiringSoon => "expiring_soon",
            ReportKind::BelowThreshold => "below_threshold",
            ReportKind::InventoryLevels => "inventory_levels",
            ReportKind::UserActivity => "user_activity",
            ReportKind::InventoryTaken => "inventory_taken",
        }
    }

    /// File name the backend suggests for the attachment.
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::ExpiringSoon => "expiring_soon_report.xlsx",
            ReportKind::BelowThreshold => "low_inventory_report.xlsx",
            ReportKind::InventoryLevels => "inventory_levels_report.xlsx",
            ReportKind::UserActivity => "user_activity_report.xlsx",
            ReportKind::InventoryTaken => "inventory_taken_report.xlsx",
        }
    }
}

impl core::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "expiring_soon" | "expiring" => Ok(ReportKind::ExpiringSoon),
            "below_threshold" | "low" => Ok(ReportKind::BelowThreshold),
            "inventory_levels" | "levels" => Ok(ReportKind::InventoryLevels),
            "user_activity" | "users" => Ok(ReportKind::UserActivity),
            "inventory_taken" | "taken" => Ok(ReportKind::InventoryTaken),
            other => Err(format!("unknown report `{other}`")),
        }
    }
}

/// Inclusive date range, sent as `YYYY-MM-DD`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A report to download. Only [`ReportKind::InventoryTaken`] takes a range,
/// and it requires one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    kind: ReportKind,
    period: Option<DateRange>,
}

impl ReportRequest {
    pub fn new(kind: ReportKind, period: Option<DateRange>) -> DomainResult<Self> {
        match (kind, period) {
            (ReportKind::InventoryTaken, None) => Err(DomainError::validation(
                "Please provide both start date and end date",
            )),
            (ReportKind::InventoryTaken, Some(_)) | (_, None) => Ok(Self { kind, period }),
            (other, Some(_)) => Err(DomainError::validation(format!(
                "the {} report does not take a date range",
                other.name()
            ))),
        }
    }

    /// One of the reports without a date range.
    pub fn plain(kind: ReportKind) -> DomainResult<Self> {
        Self::new(kind, None)
    }

    pub fn inventory_taken(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            kind: ReportKind::InventoryTaken,
            period: Some(DateRange { start, end }),
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn period(&self) -> Option<DateRange> {
        self.period
    }
}

#[derive(Debug, Serialize)]
struct TakenReportForm {
    start_date: NaiveDate,
    end_date: NaiveDate,
    download: &'static str,
}

#[derive(Debug, Deserialize)]
struct TotalBody {
    total: u64,
}

#[derive(Debug, Serialize)]
struct MaterialLookup<'a> {
    material: &'a str,
}

/// Plain request helpers; no rendering.
#[derive(Debug, Clone)]
pub struct InventoryApi {
    client: ApiClient,
}

impl InventoryApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<NamedRecord>> {
        let listing: Listing<NamedRecord> =
            self.client.get_json(&routes::SEARCH, &query.to_params()).await?;
        Ok(listing.into_items())
    }

    pub async fn filter(&self, filter: &InventoryFilter) -> ApiResult<Vec<InventoryItem>> {
        let listing: Listing<InventoryItem> = self
            .client
            .get_json(&routes::INVENTORY, &filter.to_params())
            .await?;
        Ok(listing.into_items())
    }

    pub async fn expiring_soon(&self) -> ApiResult<Vec<StockLevel>> {
        self.stock_levels(&routes::EXPIRING_SOON).await
    }

    pub async fn below_threshold(&self) -> ApiResult<Vec<StockLevel>> {
        self.stock_levels(&routes::BELOW_THRESHOLD).await
    }

    async fn stock_levels(&self, endpoint: &Endpoint) -> ApiResult<Vec<StockLevel>> {
        let listing: Listing<StockLevel> =
            self.client.get_json(endpoint, &QueryParams::new()).await?;
        Ok(listing.into_items())
    }

    /// Number of inventory rows.
    pub async fn total(&self) -> ApiResult<u64> {
        let body: TotalBody = self
            .client
            .get_json(&routes::INVENTORY_TOTAL, &QueryParams::new())
            .await?;
        Ok(body.total)
    }

    /// Look up one item by its material code.
    pub async fn by_material(&self, code: &str) -> ApiResult<InventoryItem> {
        let endpoint = routes::INVENTORY_BY_MATERIAL;
        self.client
            .send_json(
                &endpoint,
                endpoint.path,
                &MaterialLookup { material: code },
                BodyEncoding::Json,
            )
            .await
    }

    /// Spreadsheet bytes of a report.
    ///
    /// Ranged reports are posted as a form; the rest are a GET with
    /// `download=true`.
    pub async fn download_report(&self, request: &ReportRequest) -> ApiResult<Vec<u8>> {
        let kind = request.kind();
        let endpoint = kind.endpoint();
        let bytes = match request.period() {
            Some(range) => {
                let form = TakenReportForm {
                    start_date: range.start,
                    end_date: range.end,
                    download: "true",
                };
                self.client
                    .send_for_bytes(&endpoint, endpoint.path, &form, BodyEncoding::Form)
                    .await?
            }
            None => {
                let params = QueryParams::new().with("download", "true");
                self.client.get_bytes(&endpoint, &params).await?
            }
        };
        tracing::info!(report = kind.file_name(), bytes = bytes.len(), "report downloaded");
        Ok(bytes)
    }

    /// Notification feed; contents are opaque to the client.
    pub async fn notifications(&self) -> ApiResult<Vec<Value>> {
        let items: Vec<Value> = self
            .client
            .get_json(&routes::NOTIFICATIONS, &QueryParams::new())
            .await?;
        tracing::info!(count = items.len(), "notifications fetched");
        Ok(items)
    }

    pub async fn dashboard_summary(&self) -> ApiResult<DashboardSummary> {
        self.client
            .get_json(&routes::DASHBOARD_DATA, &QueryParams::new())
            .await
    }
}

/// Search box and filter form rendering into one results container.
///
/// Both cycles share one [`RequestSequence`]: whichever was issued last wins.
#[derive(Debug, Clone)]
pub struct SearchPanel {
    search: QueryCycle<NameTemplate>,
    filter: QueryCycle<InventoryCardTemplate>,
}

impl SearchPanel {
    pub fn new(client: ApiClient, locale: DateLocale, failures: NetworkFailurePolicy) -> Self {
        let sequence = RequestSequence::shared();
        Self {
            search: QueryCycle::new(client.clone(), routes::SEARCH, NameTemplate)
                .with_locale(locale)
                .with_sequence(Arc::clone(&sequence))
                .with_network_failures(failures),
            filter: QueryCycle::new(client, routes::INVENTORY, InventoryCardTemplate)
                .with_locale(locale)
                .with_sequence(sequence)
                .with_network_failures(failures),
        }
    }

    pub async fn search<V>(&self, query: &SearchQuery, view: &V, notifier: &dyn Notifier) -> CycleOutcome
    where
        V: ResultsView + ?Sized,
    {
        self.search.run(query.to_params(), view, notifier).await
    }

    pub async fn filter<V>(
        &self,
        filter: &InventoryFilter,
        view: &V,
        notifier: &dyn Notifier,
    ) -> CycleOutcome
    where
        V: ResultsView + ?Sized,
    {
        self.filter.run(filter.to_params(), view, notifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_sends_three_empty_params() {
        let params = InventoryFilter::default().to_params();
        assert_eq!(
            params.as_pairs(),
            [
                ("material".to_string(), String::new()),
                ("product_name".to_string(), String::new()),
                ("location".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn search_params() {
        assert_eq!(SearchQuery::new("thinner").to_params().get("query"), Some("thinner"));
        assert_eq!(SearchQuery::default().to_params().get("query"), Some(""));
    }

    #[test]
    fn paging_is_appended_only_when_set() {
        let filter = InventoryFilter {
            page: Some(2),
            per_page: Some(25),
            ..Default::default()
        };
        let params = filter.to_params();
        assert_eq!(params.len(), 5);
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("per_page"), Some("25"));

        let first_page = InventoryFilter {
            page: Some(1),
            ..Default::default()
        };
        assert_eq!(first_page.to_params().get("per_page"), None);
    }

    #[test]
    fn report_kinds() {
        assert_eq!("expiring-soon".parse::<ReportKind>().unwrap(), ReportKind::ExpiringSoon);
        assert_eq!("user-activity".parse::<ReportKind>().unwrap(), ReportKind::UserActivity);
        assert!("weekly".parse::<ReportKind>().is_err());
        assert_eq!(ReportKind::BelowThreshold.endpoint().path, "/inventory/below_threshold");
        assert_eq!(ReportKind::BelowThreshold.file_name(), "low_inventory_report.xlsx");

        for kind in ReportKind::ALL {
            assert_eq!(kind.name().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn only_inventory_taken_takes_a_range() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let range = DateRange {
            start: day(1),
            end: day(31),
        };

        assert!(ReportRequest::plain(ReportKind::InventoryLevels).is_ok());
        assert!(ReportRequest::plain(ReportKind::InventoryTaken).is_err());
        assert!(ReportRequest::new(ReportKind::UserActivity, Some(range)).is_err());

        let ranged = ReportRequest::new(ReportKind::InventoryTaken, Some(range)).unwrap();
        assert_eq!(ranged, ReportRequest::inventory_taken(day(1), day(31)));
        assert_eq!(ranged.period(), Some(range));
    }
}
