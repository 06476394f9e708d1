//! Browser bindings: the views, notifiers, navigator and session store of the
//! dashboard pages, backed by the DOM.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Window};

use stockguard_core::DashboardSummary;

use crate::charts::{ChartPanel, ChartSpec, ChartView};
use crate::dashboard::SummaryView;
use crate::navigation::{Navigator, Page};
use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::page::PageLayout;
use crate::render::{Card, ResultsView};
use crate::session::{SessionError, SessionKey, SessionResult, SessionStore};

pub(crate) fn window() -> Option<Window> {
    web_sys::window()
}

pub(crate) fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// Results container (`#searchResults`): one column per card.
pub struct DomResults {
    container: Element,
}

impl DomResults {
    pub fn new(container: Element) -> Self {
        Self { container }
    }

    pub fn by_id(id: &str) -> Option<Self> {
        document()?.get_element_by_id(id).map(Self::new)
    }

    fn build(&self, card: &Card) -> Result<Element, JsValue> {
        let doc = document().ok_or_else(|| JsValue::from_str("no document"))?;

        let column = doc.create_element("div")?;
        column.set_class_name("column is-one-quarter");
        let boxed = doc.create_element("div")?;
        boxed.set_class_name("box");

        if card.fields.is_empty() {
            boxed.set_text_content(Some(&card.title));
        } else {
            let title = doc.create_element("h3")?;
            title.set_class_name("title is-5");
            title.set_text_content(Some(&card.title));
            boxed.append_child(&title)?;
            for field in &card.fields {
                let line = doc.create_element("p")?;
                line.set_text_content(Some(&format!("{}: {}", field.label, field.value)));
                boxed.append_child(&line)?;
            }
        }

        column.append_child(&boxed)?;
        Ok(column)
    }
}

impl ResultsView for DomResults {
    fn clear(&self) {
        self.container.set_inner_html("");
    }

    fn append(&self, card: Card) {
        let appended = self
            .build(&card)
            .and_then(|node| self.container.append_child(&node).map(|_| ()));
        if let Err(e) = appended {
            tracing::error!(error = ?e, title = %card.title, "failed to append card");
        }
    }
}

/// The four summary fields, located by the layout's selectors.
#[derive(Debug, Default)]
pub struct DomSummary {
    layout: PageLayout,
}

impl DomSummary {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }
}

impl SummaryView for DomSummary {
    fn show(&self, summary: &DashboardSummary) {
        let Some(doc) = document() else {
            return;
        };
        for (selector, text) in self.layout.summary_selectors.iter().zip(summary.labels()) {
            match doc.query_selector(selector) {
                Ok(Some(node)) => node.set_text_content(Some(&text)),
                _ => tracing::warn!(selector, "summary field missing"),
            }
        }
    }
}

/// `window.alert`.
#[derive(Debug, Default)]
pub struct AlertDialog;

impl Notifier for AlertDialog {
    fn notify(&self, notice: Notice) {
        match window() {
            Some(w) => {
                let _ = w.alert_with_message(&notice.text);
            }
            None => tracing::warn!(text = %notice.text, "no window for alert"),
        }
    }
}

/// Flash banner in a fixed element, cleared after `ttl_ms`.
#[derive(Debug)]
pub struct FlashBanner {
    element_id: &'static str,
    ttl_ms: i32,
}

impl FlashBanner {
    pub fn new(element_id: &'static str, ttl_ms: i32) -> Self {
        Self { element_id, ttl_ms }
    }
}

impl Notifier for FlashBanner {
    fn notify(&self, notice: Notice) {
        let Some(banner) = document().and_then(|d| d.get_element_by_id(self.element_id)) else {
            tracing::warn!(id = self.element_id, text = %notice.text, "flash element missing");
            return;
        };

        let class = match notice.level {
            NoticeLevel::Error => "notification is-danger",
            NoticeLevel::Success => "notification is-success",
            NoticeLevel::Info => "notification is-info",
        };
        banner.set_class_name(class);
        banner.set_text_content(Some(&notice.text));

        let target = banner.clone();
        let clear = Closure::once_into_js(move || {
            target.set_text_content(None);
            target.set_class_name("notification is-hidden");
        });
        if let Some(w) = window() {
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                clear.unchecked_ref(),
                self.ttl_ms,
            );
        }
    }
}

/// `window.location.href = path`.
#[derive(Debug, Default)]
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn navigate(&self, page: Page) {
        if let Some(w) = window() {
            if let Err(e) = w.location().set_href(page.path()) {
                tracing::error!(error = ?e, page = page.path(), "navigation failed");
            }
        }
    }
}

/// `window.localStorage`, shared with any page using the same keys.
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage(&self) -> SessionResult<web_sys::Storage> {
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(SessionError::Unavailable)
    }
}

impl SessionStore for LocalStorageStore {
    fn load(&self, key: SessionKey) -> SessionResult<Option<String>> {
        self.storage()?
            .get_item(key.storage_key())
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn save(&self, key: SessionKey, value: &str) -> SessionResult<()> {
        self.storage()?
            .set_item(key.storage_key(), value)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: SessionKey) -> SessionResult<()> {
        self.storage()?
            .remove_item(key.storage_key())
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }
}

/// Chart panels drawn with the page's global `Chart` (Chart.js).
#[derive(Debug, Default)]
pub struct ChartJsView;

impl ChartJsView {
    fn construct(panel: &ChartPanel, spec: &ChartSpec) -> Result<(), JsValue> {
        let w = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let canvas = document()
            .and_then(|d| d.get_element_by_id(panel.canvas_id))
            .ok_or_else(|| JsValue::from_str("canvas missing"))?;
        let ctor: js_sys::Function = js_sys::Reflect::get(&w, &JsValue::from_str("Chart"))?.dyn_into()?;
        let config = js_sys::JSON::parse(&spec.to_chartjs().to_string())?;
        let args = js_sys::Array::of2(&canvas, &config);
        js_sys::Reflect::construct(&ctor, &args)?;
        Ok(())
    }
}

impl ChartView for ChartJsView {
    fn draw(&self, panel: &ChartPanel, spec: &ChartSpec) {
        if let Err(e) = Self::construct(panel, spec) {
            tracing::error!(error = ?e, panel = panel.canvas_id, "chart construction failed");
        }
    }

    fn replace_with_text(&self, panel: &ChartPanel, text: &str) {
        let parent = document()
            .and_then(|d| d.get_element_by_id(panel.canvas_id))
            .and_then(|canvas| canvas.parent_element());
        match parent {
            Some(parent) => {
                parent.set_inner_html("");
                let message = document().and_then(|d| d.create_element("p").ok());
                if let Some(message) = message {
                    message.set_text_content(Some(text));
                    let _ = parent.append_child(&message);
                }
            }
            None => tracing::warn!(panel = panel.canvas_id, "chart panel missing"),
        }
    }
}
