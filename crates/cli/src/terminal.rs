//! Terminal renditions of the client's views.

use std::io::Write;

use stockguard_client::{
    Card, ChartPanel, ChartSpec, ChartView, Navigator, Notice, NoticeLevel, Notifier, Page,
    SummaryView,
};
use stockguard_core::DashboardSummary;

const BAR_WIDTH: usize = 40;

/// Prints notices as they arrive; errors go to stderr.
#[derive(Debug, Default)]
pub struct StatusLine;

impl Notifier for StatusLine {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {}", notice.text),
            NoticeLevel::Info | NoticeLevel::Success => println!("{}", notice.text),
        }
    }
}

/// Reports page changes instead of performing them.
#[derive(Debug, Default)]
pub struct PageHint;

impl Navigator for PageHint {
    fn navigate(&self, page: Page) {
        tracing::debug!(page = page.path(), "navigate");
        println!("-> {page}");
    }
}

pub fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No results.");
        return;
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for card in cards {
        let _ = writeln!(out, "{card}\n");
    }
}

/// One summary line per refresh.
#[derive(Debug, Default)]
pub struct SummaryLine;

impl SummaryView for SummaryLine {
    fn show(&self, summary: &DashboardSummary) {
        println!("{}", summary.labels().join(" | "));
    }
}

/// Charts as horizontal bars.
#[derive(Debug, Default)]
pub struct BarCharts;

impl ChartView for BarCharts {
    fn draw(&self, panel: &ChartPanel, spec: &ChartSpec) {
        println!("[{}]", panel.canvas_id);
        for line in bar_lines(spec, BAR_WIDTH) {
            println!("{line}");
        }
    }

    fn replace_with_text(&self, panel: &ChartPanel, text: &str) {
        println!("[{}]\n{text}", panel.canvas_id);
    }
}

/// `label | ####  value` rows, bars scaled to the largest value.
pub fn bar_lines(spec: &ChartSpec, width: usize) -> Vec<String> {
    let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = spec.values.iter().copied().fold(0.0_f64, f64::max);

    spec.labels
        .iter()
        .zip(&spec.values)
        .map(|(label, value)| {
            let len = if max > 0.0 {
                ((value / max) * width as f64).round() as usize
            } else {
                0
            };
            format!("{label:<label_width$} | {:<width$} {value}", "#".repeat(len))
        })
        .collect()
}
