//! Entry points exported to the page script.
//!
//! ```js
//! import init, { StockGuardPage } from "./stockguard_client.js";
//! await init();
//! const page = new StockGuardPage("http://localhost:5000");
//! page.attach();
//! page.loadCharts();
//! page.startDashboard();
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use stockguard_core::{Credentials, Registration, Role};

use crate::account::AccountService;
use crate::api::ApiClient;
use crate::browser::{
    AlertDialog, ChartJsView, DomResults, DomSummary, FlashBanner, LocalStorageStore,
    WindowNavigator, document, window,
};
use crate::charts::ChartPanel;
use crate::config::ClientConfig;
use crate::cycle::CycleOutcome;
use crate::dashboard::refresh_once;
use crate::inventory::{InventoryFilter, SearchPanel, SearchQuery};
use crate::page::{PageLayout, timer_millis};
use crate::session::SessionContext;

const FLASH_TTL_MS: i32 = 5_000;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `value` of an input or select, empty when the element is missing.
fn field_value(id: &str) -> String {
    document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| js_sys::Reflect::get(&el, &JsValue::from_str("value")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

fn outcome_value(outcome: &CycleOutcome) -> JsValue {
    match outcome {
        CycleOutcome::Rendered(n) => JsValue::from_f64(*n as f64),
        _ => JsValue::NULL,
    }
}

struct Timer {
    id: i32,
    _tick: Closure<dyn FnMut()>,
}

struct PageState {
    client: ApiClient,
    panel: SearchPanel,
    accounts: AccountService,
    layout: PageLayout,
    refresh_interval: Duration,
    timer: RefCell<Option<Timer>>,
}

impl PageState {
    async fn search(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let view = DomResults::by_id(self.layout.results)
            .ok_or_else(|| js_error("results container missing"))?;
        let query = SearchQuery::new(field_value(self.layout.search_input));
        let outcome = self.panel.search(&query, &view, &AlertDialog).await;
        Ok(outcome_value(&outcome))
    }

    async fn filter(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let view = DomResults::by_id(self.layout.results)
            .ok_or_else(|| js_error("results container missing"))?;
        let filter = InventoryFilter {
            material: field_value(self.layout.filter_material),
            product_name: field_value(self.layout.filter_product_name),
            location: field_value(self.layout.filter_location),
            ..Default::default()
        };
        let outcome = self.panel.filter(&filter, &view, &AlertDialog).await;
        Ok(outcome_value(&outcome))
    }

    async fn login(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let credentials = Credentials::new(
            field_value(self.layout.username),
            field_value(self.layout.password),
        );
        self.accounts.login(&credentials).await.map_err(js_error)?;
        Ok(JsValue::UNDEFINED)
    }

    async fn logout(self: Rc<Self>) -> Result<JsValue, JsValue> {
        self.accounts.logout().await.map_err(js_error)?;
        Ok(JsValue::UNDEFINED)
    }

    async fn register(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let role: Role = field_value(self.layout.reg_role).parse().map_err(js_error)?;
        let registration = Registration {
            username: field_value(self.layout.reg_username),
            email: field_value(self.layout.reg_email),
            password: field_value(self.layout.reg_password),
            confirm_password: field_value(self.layout.reg_confirm_password),
            role,
        };
        self.accounts.register(&registration).await.map_err(js_error)?;
        Ok(JsValue::UNDEFINED)
    }

    async fn load_charts(self: Rc<Self>) -> Result<JsValue, JsValue> {
        for panel in [ChartPanel::EXPIRING_SOON, ChartPanel::BELOW_THRESHOLD] {
            // Failures are logged by the panel and leave it untouched.
            let _ = panel.load(&self.client, &ChartJsView).await;
        }
        Ok(JsValue::UNDEFINED)
    }

    fn stop_timer(&self) {
        if let Some(timer) = self.timer.borrow_mut().take() {
            if let Some(w) = window() {
                w.clear_interval_with_handle(timer.id);
            }
            tracing::info!("dashboard refresh stopped");
        }
    }
}

async fn refresh(client: ApiClient, view: Rc<DomSummary>) {
    if let Err(e) = refresh_once(&client, view.as_ref()).await {
        tracing::warn!(error = %e, "dashboard refresh failed");
    }
}

/// One dashboard page: search panel, account forms, charts and summary.
#[wasm_bindgen]
pub struct StockGuardPage {
    state: Rc<PageState>,
}

#[wasm_bindgen]
impl StockGuardPage {
    #[wasm_bindgen(constructor)]
    pub fn new(api_url: Option<String>) -> StockGuardPage {
        let mut config = ClientConfig::default();
        if let Some(url) = api_url {
            config.api_url = url;
        }
        let layout = PageLayout::STANDARD;

        let client = ApiClient::new(config.api_url, SessionContext::new(LocalStorageStore));
        let panel = SearchPanel::new(client.clone(), config.locale, config.network_failures);
        let accounts = AccountService::new(
            client.clone(),
            Arc::new(WindowNavigator),
            Arc::new(AlertDialog),
            Arc::new(FlashBanner::new(layout.flash, FLASH_TTL_MS)),
        )
        .with_encoding(config.login_encoding);

        StockGuardPage {
            state: Rc::new(PageState {
                client,
                panel,
                accounts,
                layout,
                refresh_interval: config.refresh_interval,
                timer: RefCell::new(None),
            }),
        }
    }

    /// Search with the search box; resolves to the card count, or `null`
    /// when nothing was rendered.
    pub fn search(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).search())
    }

    /// Filter with the three filter inputs.
    pub fn filter(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).filter())
    }

    pub fn login(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).login())
    }

    pub fn logout(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).logout())
    }

    pub fn register(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).register())
    }

    #[wasm_bindgen(js_name = loadCharts)]
    pub fn load_charts(&self) -> Promise {
        future_to_promise(Rc::clone(&self.state).load_charts())
    }

    /// Refresh the summary now and then every `interval_ms` (default 60 s).
    ///
    /// A running refresh is replaced.
    #[wasm_bindgen(js_name = startDashboard)]
    pub fn start_dashboard(&self, interval_ms: Option<u32>) -> Result<(), JsValue> {
        let state = &self.state;
        state.stop_timer();

        let period = interval_ms
            .map(|ms| Duration::from_millis(u64::from(ms)))
            .unwrap_or(state.refresh_interval);
        let view = Rc::new(DomSummary::new(state.layout.clone()));

        spawn_local(refresh(state.client.clone(), Rc::clone(&view)));

        let client = state.client.clone();
        let tick = Closure::<dyn FnMut()>::new(move || {
            spawn_local(refresh(client.clone(), Rc::clone(&view)));
        });
        let w = window().ok_or_else(|| js_error("no window"))?;
        let id = w.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            timer_millis(period),
        )?;

        tracing::info!(interval_ms = timer_millis(period), "dashboard refresh started");
        *state.timer.borrow_mut() = Some(Timer { id, _tick: tick });
        Ok(())
    }

    #[wasm_bindgen(js_name = stopDashboard)]
    pub fn stop_dashboard(&self) {
        self.state.stop_timer();
    }

    /// Bind the page's buttons and forms to this page. Missing elements are
    /// skipped.
    pub fn attach(&self) -> Result<(), JsValue> {
        let layout = &self.state.layout;
        self.bind(layout.search_button, "click", |s| spawn_ignored(s.search()))?;
        self.bind(layout.filter_button, "click", |s| spawn_ignored(s.filter()))?;
        self.bind(layout.login_form, "submit", |s| spawn_ignored(s.login()))?;
        self.bind(layout.register_form, "submit", |s| spawn_ignored(s.register()))?;
        self.bind(layout.logout_button, "click", |s| spawn_ignored(s.logout()))?;
        Ok(())
    }
}

impl StockGuardPage {
    fn bind<F>(&self, id: &str, event: &str, action: F) -> Result<(), JsValue>
    where
        F: Fn(Rc<PageState>) + 'static,
    {
        let Some(element) = document().and_then(|d| d.get_element_by_id(id)) else {
            tracing::debug!(id, "element not on this page");
            return Ok(());
        };
        let state = Rc::clone(&self.state);
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
            e.prevent_default();
            action(Rc::clone(&state));
        });
        element.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        // Listeners live as long as the page.
        listener.forget();
        Ok(())
    }
}

/// Account and cycle failures have already been shown to the user.
fn spawn_ignored<F>(future: F)
where
    F: std::future::Future<Output = Result<JsValue, JsValue>> + 'static,
{
    spawn_local(async move {
        if let Err(e) = future.await {
            tracing::debug!(error = ?e, "page action failed");
        }
    });
}
