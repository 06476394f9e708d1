//! Cards, card templates and results views.

use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;

use stockguard_core::{InventoryItem, NamedRecord};

/// Date rendering convention for a locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DateLocale {
    /// `1/31/2024`
    #[default]
    EnUs,
    /// `31/01/2024`
    EnGb,
    /// `31.01.2024`
    DeDe,
    /// `2024-01-31`
    Iso,
}

impl DateLocale {
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateLocale::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
            DateLocale::EnGb => date.format("%d/%m/%Y").to_string(),
            DateLocale::DeDe => date.format("%d.%m.%Y").to_string(),
            DateLocale::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl core::str::FromStr for DateLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" | "us" => Ok(DateLocale::EnUs),
            "en-gb" | "gb" | "uk" => Ok(DateLocale::EnGb),
            "de-de" | "de" => Ok(DateLocale::DeDe),
            "iso" | "iso-8601" => Ok(DateLocale::Iso),
            other => Err(format!("unsupported locale `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub label: &'static str,
    pub value: String,
}

/// One rendered result: a title and labelled fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub fields: Vec<CardField>,
}

impl Card {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(CardField {
            label,
            value: value.into(),
        });
        self
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

impl core::fmt::Display for Card {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.title)?;
        for field in &self.fields {
            write!(f, "\n  {}: {}", field.label, field.value)?;
        }
        Ok(())
    }
}

/// Projection of a decoded record onto a card.
pub trait CardTemplate {
    type Record: DeserializeOwned;

    fn card(&self, record: &Self::Record, locale: DateLocale) -> Card;
}

/// Plain box with the record's name.
#[derive(Debug, Copy, Clone, Default)]
pub struct NameTemplate;

impl CardTemplate for NameTemplate {
    type Record = NamedRecord;

    fn card(&self, record: &NamedRecord, _locale: DateLocale) -> Card {
        Card::titled(record.name.clone())
    }
}

/// Full inventory card.
#[derive(Debug, Copy, Clone, Default)]
pub struct InventoryCardTemplate;

impl CardTemplate for InventoryCardTemplate {
    type Record = InventoryItem;

    fn card(&self, item: &InventoryItem, locale: DateLocale) -> Card {
        Card::titled(item.product_name.clone())
            .with_field("Material", item.material.clone())
            .with_field("Location", item.location.clone())
            .with_field("Total Litres", item.total_litres.to_string())
            .with_field("Date Received", locale.format(item.date_received))
            .with_field("Best Before", locale.format(item.best_before_date))
    }
}

/// Container the cycle renders into.
///
/// Methods take `&self`: implementations own their interior mutability
/// (DOM nodes already behave this way).
pub trait ResultsView {
    fn clear(&self);

    fn append(&self, card: Card);
}

/// Replace the view's contents with one card per record, in order.
pub fn render_records<T, V>(view: &V, template: &T, locale: DateLocale, records: &[T::Record]) -> usize
where
    T: CardTemplate,
    V: ResultsView + ?Sized,
{
    view.clear();
    for record in records {
        view.append(template.card(record, locale));
    }
    records.len()
}

/// Results held in memory (headless use, tests).
#[derive(Debug, Default)]
pub struct MemoryResults {
    cards: Mutex<Vec<Card>>,
}

impl MemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated view.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Mutex::new(cards),
        }
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cards.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultsView for MemoryResults {
    fn clear(&self) {
        if let Ok(mut cards) = self.cards.lock() {
            cards.clear();
        }
    }

    fn append(&self, card: Card) {
        if let Ok(mut cards) = self.cards.lock() {
            cards.push(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str) -> InventoryItem {
        InventoryItem {
            id: None,
            product_name: name.to_string(),
            material: "Solvent".to_string(),
            location: "A1".to_string(),
            total_litres: 20.0,
            date_received: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            best_before_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        }
    }

    #[test]
    fn date_locales() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(DateLocale::EnUs.format(date), "1/31/2025");
        assert_eq!(DateLocale::EnGb.format(date), "31/01/2025");
        assert_eq!(DateLocale::DeDe.format(date), "31.01.2025");
        assert_eq!(DateLocale::Iso.format(date), "2025-01-31");
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("en_GB".parse::<DateLocale>().unwrap(), DateLocale::EnGb);
        assert_eq!("EN-us".parse::<DateLocale>().unwrap(), DateLocale::EnUs);
        assert!("fr-FR".parse::<DateLocale>().is_err());
    }

    #[test]
    fn inventory_card_shows_every_attribute() {
        let card = InventoryCardTemplate.card(&item("HEMPEL THINNER"), DateLocale::EnGb);
        assert_eq!(card.title, "HEMPEL THINNER");
        assert_eq!(card.field("Material"), Some("Solvent"));
        assert_eq!(card.field("Location"), Some("A1"));
        assert_eq!(card.field("Total Litres"), Some("20"));
        assert_eq!(card.field("Date Received"), Some("01/01/2024"));
        assert_eq!(card.field("Best Before"), Some("31/01/2025"));
    }

    #[test]
    fn name_card_is_title_only() {
        let card = NameTemplate.card(
            &NamedRecord {
                name: "Primer".to_string(),
            },
            DateLocale::Iso,
        );
        assert_eq!(card, Card::titled("Primer"));
        assert_eq!(card.to_string(), "Primer");
    }

    #[test]
    fn display_lists_fields() {
        let card = Card::titled("X").with_field("Location", "B2");
        assert_eq!(card.to_string(), "X\n  Location: B2");
    }

    #[test]
    fn empty_records_clear_the_view() {
        let view = MemoryResults::with_cards(vec![Card::titled("stale")]);
        let rendered = render_records(&view, &InventoryCardTemplate, DateLocale::EnUs, &[]);
        assert_eq!(rendered, 0);
        assert!(view.is_empty());
    }

    proptest! {
        #[test]
        fn renders_one_card_per_record_in_order(
            names in proptest::collection::vec("[A-Z][A-Z ]{0,12}", 0..20),
            stale in 0usize..5,
        ) {
            let view = MemoryResults::with_cards(vec![Card::titled("stale"); stale]);
            let records: Vec<_> = names.iter().map(|n| item(n)).collect();

            let rendered = render_records(&view, &InventoryCardTemplate, DateLocale::EnUs, &records);

            let titles: Vec<_> = view.cards().into_iter().map(|c| c.title).collect();
            prop_assert_eq!(rendered, names.len());
            prop_assert_eq!(titles, names);
        }
    }
}
