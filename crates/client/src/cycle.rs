//! The query-and-render cycle.
//!
//! One GET, one render: criteria become query parameters, the JSON listing
//! becomes cards, and the results view is replaced wholesale. Every target
//! view owns a [`RequestSequence`]; a response is rendered only if its ticket
//! is still the latest one issued for that target.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use stockguard_core::Listing;

use crate::api::{ApiClient, ApiError, QueryParams};
use crate::notify::{Notice, Notifier};
use crate::render::{CardTemplate, DateLocale, ResultsView, render_records};
use crate::routes::Endpoint;

/// Text shown for failures the backend did not describe.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Monotonic ticket for one issued request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Ticket dispenser for one render target.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

/// Whether transport and decode failures reach the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NetworkFailurePolicy {
    /// Log only.
    #[default]
    LogOnly,
    /// Log and show [`GENERIC_FAILURE`].
    Notify,
}

impl core::str::FromStr for NetworkFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "log-only" => Ok(NetworkFailurePolicy::LogOnly),
            "notify" | "alert" => Ok(NetworkFailurePolicy::Notify),
            other => Err(format!("expected `log` or `notify`, got `{other}`")),
        }
    }
}

/// What one invocation did to its view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// View replaced with this many cards.
    Rendered(usize),
    /// A newer request was issued for the same target; response dropped.
    Superseded,
    /// Backend answered non-2xx; view untouched, message shown.
    Rejected { status: u16, message: String },
    /// Transport or decode failure; view untouched.
    Failed(String),
}

/// Request-and-render for one endpoint and card template.
#[derive(Debug, Clone)]
pub struct QueryCycle<T> {
    client: ApiClient,
    endpoint: Endpoint,
    template: T,
    locale: DateLocale,
    sequence: Arc<RequestSequence>,
    network_failures: NetworkFailurePolicy,
}

impl<T: CardTemplate> QueryCycle<T> {
    pub fn new(client: ApiClient, endpoint: Endpoint, template: T) -> Self {
        Self {
            client,
            endpoint,
            template,
            locale: DateLocale::default(),
            sequence: RequestSequence::shared(),
            network_failures: NetworkFailurePolicy::default(),
        }
    }

    pub fn with_locale(mut self, locale: DateLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Share ordering with other cycles rendering into the same view.
    pub fn with_sequence(mut self, sequence: Arc<RequestSequence>) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_network_failures(mut self, policy: NetworkFailurePolicy) -> Self {
        self.network_failures = policy;
        self
    }

    pub fn sequence(&self) -> &Arc<RequestSequence> {
        &self.sequence
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Issue the request and, if still current, render the response into `view`.
    pub async fn run<V>(&self, params: QueryParams, view: &V, notifier: &dyn Notifier) -> CycleOutcome
    where
        V: ResultsView + ?Sized,
    {
        let ticket = self.sequence.issue();
        tracing::debug!(
            path = self.endpoint.path,
            ticket = ticket.value(),
            params = params.len(),
            "query cycle started"
        );

        let result = self
            .client
            .get_json::<Listing<T::Record>>(&self.endpoint, &params)
            .await;

        if !self.sequence.is_latest(ticket) {
            tracing::debug!(
                path = self.endpoint.path,
                ticket = ticket.value(),
                "discarding superseded response"
            );
            return CycleOutcome::Superseded;
        }

        match result {
            Ok(listing) => {
                let records = listing.into_items();
                let rendered = render_records(view, &self.template, self.locale, &records);
                tracing::debug!(path = self.endpoint.path, rendered, "query cycle rendered");
                CycleOutcome::Rendered(rendered)
            }
            Err(ApiError::Http { status, message }) => {
                tracing::warn!(path = self.endpoint.path, status, %message, "query rejected");
                notifier.notify(Notice::error(message.clone()));
                CycleOutcome::Rejected { status, message }
            }
            Err(err) => {
                tracing::error!(path = self.endpoint.path, error = %err, "query failed");
                if self.network_failures == NetworkFailurePolicy::Notify {
                    notifier.notify(Notice::error(GENERIC_FAILURE));
                }
                CycleOutcome::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_and_only_the_last_is_latest() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(second > first);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            "notify".parse::<NetworkFailurePolicy>().unwrap(),
            NetworkFailurePolicy::Notify
        );
        assert_eq!(
            "LOG".parse::<NetworkFailurePolicy>().unwrap(),
            NetworkFailurePolicy::LogOnly
        );
        assert!("ignore".parse::<NetworkFailurePolicy>().is_err());
    }
}
