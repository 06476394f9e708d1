//! The two chart panels: products expiring soon (pie) and products below the
//! stock threshold (line).
//!
//! A panel is loaded once. An empty list replaces the panel with a fixed
//! message; anything else becomes a [`ChartSpec`], serialisable to a
//! Chart.js configuration.

use rand::Rng;
use serde::Serialize;
use serde_json::{Value, json};

use stockguard_core::{Listing, StockLevel};

use crate::api::{ApiClient, ApiResult, QueryParams};
use crate::routes::{self, Endpoint};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Line,
}

/// CSS `rgba(...)` color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Random opaque-ish color; channels in `0..255`.
    pub fn random<R: Rng>(rng: &mut R, a: f32) -> Self {
        Self::new(
            rng.random_range(0..255),
            rng.random_range(0..255),
            rng.random_range(0..255),
            a,
        )
    }
}

impl core::fmt::Display for Rgba {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

const PIE_BORDER: Rgba = Rgba::new(0, 0, 0, 0.1);
const LINE_FILL: Rgba = Rgba::new(54, 162, 235, 0.2);
const LINE_BORDER: Rgba = Rgba::new(54, 162, 235, 1.0);

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub background: Vec<Rgba>,
    pub border: Vec<Rgba>,
    pub border_width: u32,
    pub fill: bool,
    pub tension: f32,
}

impl ChartSpec {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Chart.js `new Chart(ctx, config)` configuration.
    pub fn to_chartjs(&self) -> Value {
        // Pie colors are per slice; the line dataset takes a single color.
        let (background, border) = match self.kind {
            ChartKind::Pie => (json!(self.background), json!(self.border)),
            ChartKind::Line => (
                self.background.first().map(|c| json!(c)).unwrap_or(Value::Null),
                self.border.first().map(|c| json!(c)).unwrap_or(Value::Null),
            ),
        };

        let mut dataset = json!({
            "label": "Total Litres",
            "data": self.values,
            "backgroundColor": background,
            "borderColor": border,
            "borderWidth": self.border_width,
        });

        let mut options = json!({
            "responsive": true,
            "plugins": {
                "legend": { "position": "top" },
            },
            "scales": {
                "x": { "display": false },
            },
        });

        match self.kind {
            ChartKind::Pie => {
                options["plugins"]["legend"] = json!({
                    "position": "right",
                    "labels": { "font": { "size": 14 }, "color": "#333" },
                });
                options["animation"] = json!({ "animateScale": true, "animateRotate": true });
            }
            ChartKind::Line => {
                dataset["fill"] = json!(self.fill);
                dataset["tension"] = json!(self.tension);
                options["scales"]["y"] = json!({ "beginAtZero": true });
            }
        }

        json!({
            "type": self.kind,
            "data": {
                "labels": self.labels,
                "datasets": [dataset],
            },
            "options": options,
        })
    }
}

/// What a panel ends up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Chart(ChartSpec),
    Empty(&'static str),
}

/// Where panels are drawn.
pub trait ChartView {
    fn draw(&self, panel: &ChartPanel, spec: &ChartSpec);

    /// Replace the whole panel with a text message.
    fn replace_with_text(&self, panel: &ChartPanel, text: &str);
}

/// A chart panel bound to its data route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChartPanel {
    /// DOM id of the panel's canvas.
    pub canvas_id: &'static str,
    pub kind: ChartKind,
    pub endpoint: Endpoint,
    pub empty_text: &'static str,
}

impl ChartPanel {
    pub const EXPIRING_SOON: ChartPanel = ChartPanel {
        canvas_id: "expiringSoonChart",
        kind: ChartKind::Pie,
        endpoint: routes::EXPIRING_SOON,
        empty_text: "No products expiring soon.",
    };

    pub const BELOW_THRESHOLD: ChartPanel = ChartPanel {
        canvas_id: "belowThresholdChart",
        kind: ChartKind::Line,
        endpoint: routes::BELOW_THRESHOLD,
        empty_text: "No products below threshold.",
    };

    /// Turn stock levels into panel content. Pie colors are drawn from `rng`.
    pub fn build<R: Rng>(&self, levels: &[StockLevel], rng: &mut R) -> PanelContent {
        if levels.is_empty() {
            return PanelContent::Empty(self.empty_text);
        }

        let labels = levels.iter().map(|l| l.product_name.clone()).collect();
        let values = levels.iter().map(|l| l.total_litres).collect();

        let spec = match self.kind {
            ChartKind::Pie => ChartSpec {
                kind: ChartKind::Pie,
                labels,
                values,
                background: levels.iter().map(|_| Rgba::random(&mut *rng, 0.6)).collect(),
                border: vec![PIE_BORDER; levels.len()],
                border_width: 2,
                fill: false,
                tension: 0.0,
            },
            ChartKind::Line => ChartSpec {
                kind: ChartKind::Line,
                labels,
                values,
                background: vec![LINE_FILL],
                border: vec![LINE_BORDER],
                border_width: 1,
                fill: true,
                tension: 0.4,
            },
        };
        PanelContent::Chart(spec)
    }

    /// Fetch the panel's data and draw it.
    ///
    /// On failure the panel is left as it was.
    pub async fn load<V: ChartView + ?Sized>(
        &self,
        client: &ApiClient,
        view: &V,
    ) -> ApiResult<PanelContent> {
        let listing: Listing<StockLevel> = match client
            .get_json(&self.endpoint, &QueryParams::new())
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(panel = self.canvas_id, error = %e, "chart data fetch failed");
                return Err(e);
            }
        };

        let content = self.build(&listing.into_items(), &mut rand::rng());
        match &content {
            PanelContent::Chart(spec) => {
                tracing::debug!(panel = self.canvas_id, entries = spec.len(), "drawing chart");
                view.draw(self, spec);
            }
            PanelContent::Empty(text) => view.replace_with_text(self, text),
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn level(name: &str, litres: f64) -> StockLevel {
        StockLevel {
            product_name: name.to_string(),
            total_litres: litres,
        }
    }

    #[test]
    fn empty_data_becomes_message() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            ChartPanel::EXPIRING_SOON.build(&[], &mut rng),
            PanelContent::Empty("No products expiring soon.")
        );
        assert_eq!(
            ChartPanel::BELOW_THRESHOLD.build(&[], &mut rng),
            PanelContent::Empty("No products below threshold.")
        );
    }

    #[test]
    fn pie_gets_one_color_per_entry() {
        let mut rng = StdRng::seed_from_u64(7);
        let levels = [level("Primer", 10.0), level("Thinner", 4.5), level("Topcoat", 30.0)];

        let PanelContent::Chart(spec) = ChartPanel::EXPIRING_SOON.build(&levels, &mut rng) else {
            panic!("expected a chart");
        };

        assert_eq!(spec.kind, ChartKind::Pie);
        assert_eq!(spec.labels, ["Primer", "Thinner", "Topcoat"]);
        assert_eq!(spec.values, [10.0, 4.5, 30.0]);
        assert_eq!(spec.background.len(), 3);
        assert!(spec.background.iter().all(|c| c.a == 0.6));
        assert_eq!(spec.border, vec![PIE_BORDER; 3]);
        assert_eq!(spec.border_width, 2);
    }

    #[test]
    fn line_uses_fixed_styling() {
        let mut rng = StdRng::seed_from_u64(7);
        let PanelContent::Chart(spec) =
            ChartPanel::BELOW_THRESHOLD.build(&[level("Primer", 10.0)], &mut rng)
        else {
            panic!("expected a chart");
        };

        let config = spec.to_chartjs();
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"], json!(["Primer"]));
        let dataset = &config["data"]["datasets"][0];
        assert_eq!(dataset["label"], "Total Litres");
        assert_eq!(dataset["backgroundColor"], "rgba(54, 162, 235, 0.2)");
        assert_eq!(dataset["borderColor"], "rgba(54, 162, 235, 1)");
        assert_eq!(dataset["fill"], true);
        assert_eq!(config["options"]["scales"]["y"]["beginAtZero"], true);
        assert_eq!(config["options"]["scales"]["x"]["display"], false);
        assert_eq!(config["options"]["plugins"]["legend"]["position"], "top");
    }

    #[test]
    fn pie_config_lists_colors_per_slice() {
        let mut rng = StdRng::seed_from_u64(3);
        let PanelContent::Chart(spec) =
            ChartPanel::EXPIRING_SOON.build(&[level("A", 1.0), level("B", 2.0)], &mut rng)
        else {
            panic!("expected a chart");
        };

        let config = spec.to_chartjs();
        assert_eq!(config["type"], "pie");
        let colors = config["data"]["datasets"][0]["backgroundColor"].as_array().unwrap();
        assert_eq!(colors.len(), 2);
        assert!(colors[0].as_str().unwrap().starts_with("rgba("));
        assert!(colors[0].as_str().unwrap().ends_with(", 0.6)"));
        assert_eq!(config["options"]["plugins"]["legend"]["position"], "right");
    }

    #[test]
    fn rgba_display() {
        assert_eq!(Rgba::new(0, 0, 0, 0.1).to_string(), "rgba(0, 0, 0, 0.1)");
        assert_eq!(LINE_BORDER.to_string(), "rgba(54, 162, 235, 1)");
    }
}
